//! TOML settings loading and creation.

mod file;
mod template;


pub use file::{create_default_settings, load_from_path, load_or_default, parse_settings};
pub use template::default_settings_toml;
