pub mod loader;
pub mod schema;

pub use loader::{load_config, save_config, validate};
pub use schema::{ApiSettings, ClientConfig, LoggingSettings};
