//! UI-agnostic caption timing engine.

pub mod api;
pub mod error;
pub mod export;
pub mod media;
pub mod regions;
pub mod settings;
pub mod split;
pub mod srt;
pub mod store;
pub mod sync;
pub mod time;
pub mod track;

pub use api::{
    Command, Engine, EngineErrorEvent, EngineErrorKind, Event, RecordSummary, TrackSnapshot,
};
pub use error::{EngineError, Result};
pub use export::ExportArtifact;
pub use media::{FixedPosition, MediaSource};
pub use settings::EditorSettings;
pub use srt::{ParseReport, parse_srt, parse_srt_report, serialize_srt};
pub use time::{Seconds, TimecodeParse, format_timecode, parse_timecode, timecode_to_seconds};
pub use track::{CaptionPatch, CaptionRecord, CaptionTrack};
