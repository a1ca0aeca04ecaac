//! Init command implementation
//!
//! Scaffolds a working directory for yit-forge: a `yit.toml` with every
//! default spelled out, a `settings.json` draft template, `.env.example`
//! and a `.gitignore`.

use super::output::Output;
use crate::types::GenSettings;
use crate::utils::toml_config::YitConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (yit.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Skip the settings.json template
    pub no_settings: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing yit-forge workspace");

    let base_path = &config.path;

    let config_path = base_path.join("yit.toml");
    if config_path.exists() && !config.force {
        output.warning("yit.toml already exists!");
        output.tip("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let projects = base_path.join("projects");
    if projects.exists() {
        output.kept("projects/", "already exists");
    } else {
        if let Err(e) = fs::create_dir_all(&projects) {
            output.error(&format!("Failed to create projects: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.wrote("directory", "projects/");
    }

    let toml_content = match generate_yit_toml() {
        Ok(content) => content,
        Err(e) => {
            output.error(&format!("Failed to render yit.toml: {}", e));
            return InitResult::Error(e);
        }
    };
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create yit.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.wrote("config", "yit.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.wrote("env", ".env.example");

    if !config.no_settings {
        let settings_path = base_path.join("settings.json");
        match generate_settings_template() {
            Ok(content) => {
                if let Err(e) = write_file(&settings_path, &content, config.force) {
                    output.warning(&format!("Failed to create settings.json: {}", e));
                } else {
                    output.wrote("settings", "settings.json");
                }
            }
            Err(e) => output.warning(&format!("Failed to render settings.json: {}", e)),
        }
    }

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.wrote("file", ".gitignore");
        }
    }

    output.done("Workspace initialized");

    output.section("Next steps");
    output.next_step(
        1,
        "Set your Gemini API key:",
        &["cp .env.example .env", "# edit .env and set GEMINI_API_KEY"],
    );
    output.next_step(
        2,
        "Investigate a topic:",
        &["yit-forge investigate \"Dropshipping\" -o projects/dropshipping.json"],
    );
    output.tip("Edit settings.json and pass it with --settings to shape the draft");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_yit_toml() -> Result<String, String> {
    let body = YitConfig::default().to_toml().map_err(|e| e.to_string())?;
    Ok(format!(
        "# yit-forge configuration\n\
         # The API key is read from the variable named by api.api_key_env.\n\n{}",
        body
    ))
}

fn generate_settings_template() -> Result<String, String> {
    let settings = GenSettings::default().with_case_study_count(7);
    serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())
}

fn generate_env_example() -> String {
    r#"# yit-forge Environment Variables
# ===============================
# Copy this file to .env and fill in the values.

# REQUIRED: Gemini API key
GEMINI_API_KEY=your-api-key-here

# Optional: Logging filter (overrides logging.level in yit.toml)
RUST_LOG=info,yit=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# yit-forge
/projects/
.env
.env.local

# Rust
/target/

# OS
.DS_Store
"#
    .to_string()
}
