//! YAML file I/O for settings

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read and parse a YAML file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_yaml<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let value = serde_yaml::from_str::<T>(&contents)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    Ok(Some(value))
}

/// Load a YAML file, falling back to `T::default()` when missing or invalid
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    log::info!("load_config: Loading from {:?}", path);

    match read_yaml(path) {
        Ok(Some(value)) => {
            log::info!("load_config: Loaded config from {:?}", path);
            value
        }
        Ok(None) => {
            log::info!("load_config: Config file doesn't exist, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Serialize to YAML, creating parent directories as needed
pub fn write_yaml<T>(value: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(value).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Settings {
        level: u32,
        label: String,
    }

    #[test]
    fn test_missing_file_is_none() {
        let value: Option<Settings> = read_yaml(Path::new("/nonexistent/chainsmith/config.yaml")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "level: [not a number").unwrap();

        assert!(read_yaml::<Settings>(&path).is_err());
        assert_eq!(load_or_default::<Settings>(&path), Settings::default());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let settings = Settings { level: 7, label: "seven".to_string() };

        write_yaml(&settings, &path).unwrap();
        assert_eq!(load_or_default::<Settings>(&path), settings);
    }
}
