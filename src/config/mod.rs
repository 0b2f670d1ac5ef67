pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./framevault.toml",
        "~/.config/framevault/config.toml",
        "/etc/framevault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration invariants that serde defaults cannot express.
fn validate_config(config: &Config) -> Result<()> {
    if config.storage.database_path.trim().is_empty() {
        anyhow::bail!("storage.database_path must not be empty");
    }
    if config.storage.screenshots_dir.trim().is_empty() {
        anyhow::bail!("storage.screenshots_dir must not be empty");
    }
    if config.capture.default_sample_count == 0 {
        anyhow::bail!("capture.default_sample_count must be at least 1");
    }
    if config.tools.timeout_secs == 0 {
        anyhow::bail!("tools.timeout_secs must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_parses_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
database_path = "/var/lib/framevault/catalog.sqlite"
screenshots_dir = "/var/lib/framevault/screenshots"

[capture]
default_sample_count = 5

[tools]
timeout_secs = 10
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.storage.database_path,
            "/var/lib/framevault/catalog.sqlite"
        );
        assert_eq!(config.capture.default_sample_count, 5);
        assert_eq!(config.tools.timeout_secs, 10);
    }

    #[test]
    fn test_load_config_applies_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.capture.default_sample_count, 3);
        assert!(config.tools.ffmpeg_path.is_none());
    }

    #[test]
    fn test_load_config_rejects_zero_sample_count() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[capture]\ndefault_sample_count = 0\n").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        assert!(load_config(Path::new("/nonexistent/config.toml")).is_err());
    }
}
