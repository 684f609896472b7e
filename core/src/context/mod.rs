mod character;
mod config;

pub use character::{DEFAULT_INFRASTRUCTURE_TOKENS, character_name, character_name_from_path};
pub use config::{APP_NAME, AppConfig, default_spell_table, resolve_log_path};
