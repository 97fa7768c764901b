use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use homeserve::api::{Paging, UploadFile};
use homeserve::config::{load_config, validate, ClientConfig};
use homeserve::logging;
use homeserve::models::ReportStatus;
use homeserve::services::reports::ReportFilters;
use homeserve::services::{Backend, ReadResource, StatusFilter};
use homeserve::state::Session;

#[derive(Parser)]
#[command(name = "homeserve", version, about = "Operator CLI for the home-service marketplace API")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bearer token for authenticated calls
    #[arg(long, env = "HOMESERVE_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and print the access token
    Login {
        email: String,
        #[arg(long, env = "HOMESERVE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Inspect and resolve customer reports
    Reports {
        #[command(subcommand)]
        action: ReportsCommand,
    },
    /// List provinces, or the districts of one province
    Provinces {
        #[arg(long)]
        province: Option<String>,
    },
    /// Look up a company by tax code
    Tax { code: String },
    /// Upload an image through a presigned URL and print its durable URL
    Upload { path: PathBuf },
}

#[derive(Subcommand)]
enum ReportsCommand {
    List {
        /// Status, or `all`
        #[arg(long, default_value = "all")]
        status: StatusFilter<ReportStatus>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Only reports filed by the signed-in user
        #[arg(long)]
        mine: bool,
    },
    Show {
        id: String,
    },
    Resolve {
        id: String,
        #[arg(long, default_value = "RESOLVED")]
        status: ReportStatus,
        #[arg(long)]
        note: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok(); // Ignore error if already installed

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = load_config(&config_path)?;
    config.apply_env_overrides();
    validate(&config).context("Invalid settings after environment overrides")?;
    logging::init(&config.logging);

    let backend = connect(&config, cli.token.clone())?;
    run(&backend, cli.command).await
}

fn default_config_path() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "homeserve", "homeserve") {
        Ok(proj_dirs.config_dir().join("config.toml"))
    } else {
        Ok(std::env::current_dir()?.join("homeserve.toml"))
    }
}

fn connect(config: &ClientConfig, token: Option<String>) -> Result<Backend> {
    let session = Session::new();
    session.set_token(token);

    let client = config
        .api
        .client_builder()
        .session(session)
        .on_auth_error(|| warn!("session rejected by the server, run `homeserve login` again"))
        .build()
        .with_context(|| format!("Invalid API base URL: {}", config.api.base_url))?;

    Ok(Backend::new(client))
}

async fn run(backend: &Backend, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            backend.auth.sign_in(&email, &password).await?;
            if let Some(token) = backend.client.session().token() {
                println!("{}", token);
            }
        }
        Command::Reports { action } => run_reports(backend, action).await?,
        Command::Provinces { province: None } => print_json(&backend.provinces.list().await?)?,
        Command::Provinces {
            province: Some(code),
        } => print_json(&backend.provinces.districts(&code).await?)?,
        Command::Tax { code } => match backend.tax.lookup(&code).await? {
            Some(info) => print_json(&info)?,
            None => anyhow::bail!("No company registered under tax code {}", code),
        },
        Command::Upload { path } => {
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let url = backend.medias.upload_presigned(file).await?;
            println!("{}", url);
        }
    }

    Ok(())
}

async fn run_reports(backend: &Backend, action: ReportsCommand) -> Result<()> {
    match action {
        ReportsCommand::List {
            status,
            search,
            page,
            limit,
            mine,
        } => {
            let filters = ReportFilters {
                status,
                report_type: None,
                search,
                paging: Paging { page, limit },
            };
            let reports = if mine {
                backend.reports.list_mine(Some(&filters)).await?
            } else {
                backend.reports.list(Some(&filters)).await?
            };
            for report in &reports.items {
                println!("{}\t{}\t{}\t{}", report.id, report.status, report.report_type, report.title);
            }
            if let Some(total) = reports.meta.total {
                println!("{} of {} reports", reports.len(), total);
            }
        }
        ReportsCommand::Show { id } => print_json(&backend.reports.detail(&id).await?)?,
        ReportsCommand::Resolve { id, status, note } => {
            print_json(&backend.reports.resolve(&id, status, &note).await?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
