use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::split::SplitPolicyKind;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "subtitles.srt";
pub const DEFAULT_ZOOM_PX_PER_SECOND: f32 = 50.0;

/// Session-wide editor settings.
///
/// Missing fields in a settings file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Waveform zoom consumed by the view; the engine only carries it.
    pub zoom_px_per_second: f32,
    pub export_file_name: String,
    pub split_policy: SplitPolicyKind,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            zoom_px_per_second: DEFAULT_ZOOM_PX_PER_SECOND,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            split_policy: SplitPolicyKind::default(),
        }
    }
}

impl EditorSettings {
    /// Reads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&raw).map_err(|source| {
            EngineError::SettingsSerialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_EXPORT_FILE_NAME, EditorSettings};
    use crate::split::SplitPolicyKind;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "split_policy": "line_boundary" }"#).expect("valid json");
        assert_eq!(settings.split_policy, SplitPolicyKind::LineBoundary);
        assert_eq!(settings.export_file_name, DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(settings.zoom_px_per_second, 50.0);
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").expect("write settings");

        let error = EditorSettings::load(&path).expect_err("invalid json must fail");
        assert!(error.to_string().starts_with("invalid settings file"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "export_file_name": "fixed.srt", "zoom_px_per_second": 80.0 }"#)
            .expect("write settings");

        let settings = EditorSettings::load(&path).expect("load settings");
        assert_eq!(settings.export_file_name, "fixed.srt");
        assert_eq!(settings.zoom_px_per_second, 80.0);
    }
}
