use anyhow::{Context, Result};
use aquaforge_core::detection::DetectionCapability;
use aquaforge_schemas::settings::Settings;
use std::{fs, path::Path};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "aquaforge.yaml";

/// Everything a command needs, fixed once the process has started.
pub struct AppContext {
    pub settings: Settings,
    pub capability: DetectionCapability,
}

impl AppContext {
    pub fn init(config_path: Option<&Path>) -> Result<Self> {
        let settings = load_settings(config_path)?;
        let capability = DetectionCapability::for_build();
        debug!(?capability, model = %settings.model.path.display(), "application context ready");
        Ok(Self { settings, capability })
    }
}

/// Loads settings from YAML.
///
/// An explicitly requested file must exist; the default file is optional and
/// built-in defaults apply when it is absent.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };

    if !required && !path.exists() {
        debug!("no '{}' found, using built-in settings", DEFAULT_CONFIG_PATH);
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;
    let settings: Settings = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    info!(path = %path.display(), "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaforge_schemas::settings::ChannelOrder;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("aquaforge-{}-{}.yaml", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let path = temp_file(
            "settings",
            "model:\n  path: models/bloom.onnx\n  channel_order: rgb\n  confidence_threshold: 0.4\noutput_dir: out\n",
        );
        let settings = load_settings(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.model.path, PathBuf::from("models/bloom.onnx"));
        assert_eq!(settings.model.channel_order, ChannelOrder::Rgb);
        assert_eq!(settings.model.confidence_threshold, 0.4);
        assert_eq!(settings.model.input_size, 640);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("aquaforge-does-not-exist.yaml");
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let path = temp_file("broken", "model: [not, a, map\n");
        let err = load_settings(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Failed to parse YAML"));
    }
}
