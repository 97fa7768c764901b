use anyhow::{ensure, Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use super::schema::{ClientConfig, ENV_BASE_URL, ENV_LOG, ENV_TIMEOUT};

/// Reads the client settings at `path`. A missing file is created with the
/// defaults. Whatever is returned has passed [`validate`].
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let config = match fs::read_to_string(path) {
        Ok(content) => toml::from_str::<ClientConfig>(&content)
            .with_context(|| format!("{} is not a valid homeserve config", path.display()))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let config = ClientConfig::default();
            save_config(path, &config)?;
            config
        }
        Err(e) => return Err(e).with_context(|| format!("Cannot read {}", path.display())),
    };

    validate(&config).with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(config)
}

/// Written to a sibling `.tmp` file first, then renamed over `path`.
pub fn save_config(path: &Path, config: &ClientConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create config directory {}", parent.display()))?;
    }

    let body = toml::to_string_pretty(config).context("Cannot serialize client settings")?;
    let content = format!("{}{}", header(), body);

    let staging = path.with_extension("toml.tmp");
    fs::write(&staging, content)
        .with_context(|| format!("Cannot write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Cannot move settings into {}", path.display()))?;

    Ok(())
}

/// Rejects settings no client can be built from.
pub fn validate(config: &ClientConfig) -> Result<()> {
    let base = url::Url::parse(&config.api.base_url)
        .with_context(|| format!("api.base_url {:?} is not a URL", config.api.base_url))?;
    ensure!(
        matches!(base.scheme(), "http" | "https"),
        "api.base_url must use http or https, not {}",
        base.scheme()
    );
    ensure!(config.api.timeout_seconds > 0, "api.timeout_seconds must be at least 1");
    Ok(())
}

fn header() -> String {
    format!(
        "# homeserve client settings\n# {}, {} and {} override these at startup.\n\n",
        ENV_BASE_URL, ENV_TIMEOUT, ENV_LOG
    )
}
