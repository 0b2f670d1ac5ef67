//! Configuration persistence using toml_edit to preserve formatting and comments.

use super::Config;
use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

/// Save the entire config to a TOML file.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    // Convert config to TOML string and parse as document
    let new_content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    let new_doc: DocumentMut = new_content
        .parse()
        .with_context(|| "Failed to parse serialized config")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, new_doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Update just the tools section of the config file, leaving the rest of the
/// document untouched.
pub fn update_tools(path: &Path, tools: &super::ToolsConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let tools_toml = toml::to_string(&ToolsWrapper {
        tools: tools.clone(),
    })
    .with_context(|| "Failed to serialize tools")?;
    let tools_doc: DocumentMut = tools_toml
        .parse()
        .with_context(|| "Failed to parse serialized tools")?;

    if let Some(tools_item) = tools_doc.get("tools") {
        doc["tools"] = tools_item.clone();
    } else {
        doc.remove("tools");
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

// Wrapper struct for serialization
#[derive(serde::Serialize)]
struct ToolsWrapper {
    tools: super::ToolsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.capture.default_sample_count = 7;
        save_config(&path, &config).unwrap();

        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.capture.default_sample_count, 7);
    }

    #[test]
    fn test_update_tools_preserves_other_sections() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.capture.default_sample_count = 9;
        save_config(&path, &config).unwrap();

        let mut tools = config.tools.clone();
        tools.timeout_secs = 5;
        update_tools(&path, &tools).unwrap();

        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.tools.timeout_secs, 5);
        assert_eq!(reloaded.capture.default_sample_count, 9);
    }
}
