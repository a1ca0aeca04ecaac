/// Tolerant JSON extraction from model output.
pub mod json;
/// `yit.toml` configuration.
pub mod toml_config;
