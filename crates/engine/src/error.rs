use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands and track operations.
///
/// Malformed timing data is never reported here: timecodes degrade to zero
/// and unparseable caption blocks are skipped.
#[derive(Debug)]
pub enum EngineError {
    RecordIndexOutOfRange {
        index: usize,
        len: usize,
    },
    RegionNotFound {
        region: String,
    },
    StoreIo {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    StoreSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    SettingsSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    Media {
        path: PathBuf,
        reason: String,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordIndexOutOfRange { index, len } => {
                write!(f, "caption index {index} is out of range for {len} records")
            }
            Self::RegionNotFound { region } => write!(f, "region not bound: {region}"),
            Self::StoreIo {
                context,
                path,
                source,
            } => write!(f, "{context}: {} ({source})", path.display()),
            Self::StoreSerialization { path, source } => {
                write!(
                    f,
                    "session serialization/deserialization failed at {} ({source})",
                    path.display()
                )
            }
            Self::SettingsIo { path, source } => {
                write!(f, "failed to read settings: {} ({source})", path.display())
            }
            Self::SettingsSerialization { path, source } => {
                write!(f, "invalid settings file {} ({source})", path.display())
            }
            Self::Media { path, reason } => {
                write!(f, "media source rejected {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreIo { source, .. } => Some(source),
            Self::StoreSerialization { source, .. } => Some(source),
            Self::SettingsIo { source, .. } => Some(source),
            Self::SettingsSerialization { source, .. } => Some(source),
            _ => None,
        }
    }
}
