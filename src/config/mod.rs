// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod profile;
mod settings;

pub use loader::{load_config, load_config_with_env};
pub use profile::{default_profiles, BackendProfile};
pub use settings::{Config, FailurePolicy};
