use std::path::PathBuf;

use crate::error::{EngineError, Result};
use crate::export::{ExportArtifact, build_export};
use crate::media::MediaSource;
use crate::regions::{RegionId, RegionTable};
use crate::settings::EditorSettings;
use crate::srt::{parse_srt_report, serialize_srt};
use crate::store::{MemorySessionStore, SessionStore, StoredSession};
use crate::sync::{PlayWindow, active_index, play_window};
use crate::time::{Seconds, parse_timecode};
use crate::track::{CaptionPatch, CaptionTrack};
use tracing::{debug, info, warn};

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replaces the track with parsed caption text.
    ImportTrack {
        name: String,
        text: String,
    },
    ImportMedia {
        path: PathBuf,
    },
    AddLine,
    UpdateRecord {
        index: usize,
        patch: CaptionPatch,
    },
    DeleteRecord {
        index: usize,
    },
    /// Sets the caption start to the current playback position.
    ///
    /// Ignored while no media is loaded.
    SetStartFromPlayhead {
        index: usize,
    },
    /// Sets the caption end to the current playback position.
    ///
    /// Ignored while no media is loaded.
    SetEndFromPlayhead {
        index: usize,
    },
    /// Splits the caption at the current playback position.
    ///
    /// Ignored while no media is loaded or when the position is not strictly
    /// inside the caption.
    ///
    /// # Example
    /// ```
    /// use engine::{Command, Engine, FixedPosition};
    ///
    /// let mut engine = Engine::new(FixedPosition::at(1.5));
    /// engine
    ///     .handle_command(Command::ImportTrack {
    ///         name: "demo.srt".to_string(),
    ///         text: "1\n00:00:01,000 --> 00:00:02,000\nHello world\n".to_string(),
    ///     })
    ///     .unwrap();
    /// engine.handle_command(Command::SplitAtPlayhead { index: 0 }).unwrap();
    /// assert_eq!(engine.track().len(), 2);
    /// ```
    SplitAtPlayhead {
        index: usize,
    },
    MergeWithNext {
        index: usize,
    },
    /// Plays one caption window and pauses when playback reaches its end.
    PlayRecord {
        index: usize,
    },
    /// Seeks to the caption start and keeps playing past its end.
    PlayFromStart {
        index: usize,
    },
    Pause,
    /// Playback position update reported by the media source.
    PlaybackTick {
        offset: Seconds,
    },
    BindRegion {
        index: usize,
        region: RegionId,
    },
    /// A bound region was dragged or resized in the waveform view.
    RegionMoved {
        region: RegionId,
        start: Seconds,
        end: Seconds,
    },
    Export,
    SaveSession,
    RestoreSession,
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TrackChanged(TrackSnapshot),
    MediaChanged { path: PathBuf },
    ActiveRecordChanged { index: Option<usize> },
    PlaybackStarted { index: usize, window: PlayWindow },
    PlaybackStopped { offset: Seconds },
    RegionBound { index: usize, region: RegionId },
    Exported(ExportArtifact),
    SessionSaved,
    SessionRestored { name: String },
    Error(EngineErrorEvent),
}

/// User-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    IndexOutOfRange,
    RegionNotFound,
    Other,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::RecordIndexOutOfRange { .. } => Self::IndexOutOfRange,
            EngineError::RegionNotFound { .. } => Self::RegionNotFound,
            _ => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Immutable track snapshot consumed by views.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub name: String,
    pub records: Vec<RecordSummary>,
}

/// Snapshot representation of one caption.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub position: usize,
    pub start: String,
    pub end: String,
    pub text: String,
    pub start_seconds: Seconds,
    pub end_seconds: Seconds,
    /// False when either boundary did not parse cleanly and reads as zero.
    pub timing_clean: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ArmedWindow {
    index: usize,
    window: PlayWindow,
}

/// Caption editing engine driving one session.
#[derive(Debug)]
pub struct Engine<M, S = MemorySessionStore> {
    media: M,
    store: S,
    settings: EditorSettings,
    name: String,
    track: CaptionTrack,
    media_path: Option<PathBuf>,
    regions: RegionTable,
    armed: Option<ArmedWindow>,
    active: Option<usize>,
}

impl<M> Engine<M>
where
    M: MediaSource,
{
    /// Creates an engine with default settings and an in-memory session store.
    pub fn new(media: M) -> Self {
        Self::with_store(media, MemorySessionStore::default(), EditorSettings::default())
    }
}

impl<M, S> Engine<M, S>
where
    M: MediaSource,
    S: SessionStore,
{
    pub fn with_store(media: M, store: S, settings: EditorSettings) -> Self {
        Self {
            media,
            store,
            settings,
            name: String::new(),
            track: CaptionTrack::default(),
            media_path: None,
            regions: RegionTable::default(),
            armed: None,
            active: None,
        }
    }

    pub fn track(&self) -> &CaptionTrack {
        &self.track
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::ImportTrack { name, text } => self.import_track(name, &text),
            Command::ImportMedia { path } => self.import_media(path),
            Command::AddLine => {
                let next = self.track.add_line();
                Ok(self.replace_track(next, "line added"))
            }
            Command::UpdateRecord { index, patch } => {
                let next = self.track.update(index, patch)?;
                Ok(self.replace_track(next, "record updated"))
            }
            Command::DeleteRecord { index } => {
                let next = self.track.delete(index);
                Ok(self.replace_track(next, "record deleted"))
            }
            Command::SetStartFromPlayhead { index } => {
                self.edit_at_playhead(index, |track, offset| track.set_start(index, offset))
            }
            Command::SetEndFromPlayhead { index } => {
                self.edit_at_playhead(index, |track, offset| track.set_end(index, offset))
            }
            Command::SplitAtPlayhead { index } => {
                let policy = self.settings.split_policy;
                self.edit_at_playhead(index, move |track, offset| {
                    track.split_at_with(index, offset, &policy)
                })
            }
            Command::MergeWithNext { index } => {
                let next = self.track.merge_with_next(index);
                Ok(self.replace_track(next, "records merged"))
            }
            Command::PlayRecord { index } => self.play(index, true),
            Command::PlayFromStart { index } => self.play(index, false),
            Command::Pause => Ok(self.pause()),
            Command::PlaybackTick { offset } => Ok(self.playback_tick(offset)),
            Command::BindRegion { index, region } => Ok(self.bind_region(index, region)),
            Command::RegionMoved { region, start, end } => self.region_moved(&region, start, end),
            Command::Export => Ok(vec![Event::Exported(self.export())]),
            Command::SaveSession => self.save_session(),
            Command::RestoreSession => self.restore_session(),
        }
    }

    /// Applies one command, reporting a failure as [`Event::Error`] instead
    /// of returning it.
    pub fn dispatch(&mut self, command: Command) -> Vec<Event> {
        match self.handle_command(command) {
            Ok(events) => events,
            Err(error) => {
                warn!(%error, "command failed");
                vec![Event::Error(EngineErrorEvent::from_error(&error))]
            }
        }
    }

    /// Builds the export artifact for the current track.
    pub fn export(&self) -> ExportArtifact {
        let artifact = build_export(&self.track, &self.settings.export_file_name);
        info!(
            file_name = %artifact.file_name,
            record_count = self.track.len(),
            "track exported"
        );
        artifact
    }

    /// Creates an immutable snapshot for views.
    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            name: self.name.clone(),
            records: self
                .track
                .records
                .iter()
                .enumerate()
                .map(|(position, record)| {
                    let start = parse_timecode(&record.start);
                    let end = parse_timecode(&record.end);
                    RecordSummary {
                        position,
                        start: record.start.clone(),
                        end: record.end.clone(),
                        text: record.text.clone(),
                        start_seconds: start.seconds(),
                        end_seconds: end.seconds(),
                        timing_clean: start.is_clean() && end.is_clean(),
                    }
                })
                .collect(),
        }
    }

    fn import_track(&mut self, name: String, text: &str) -> Result<Vec<Event>> {
        let report = parse_srt_report(text);
        if report.skipped_blocks > 0 {
            warn!(
                name = %name,
                skipped_blocks = report.skipped_blocks,
                "imported track had malformed blocks"
            );
        }
        self.name = name;
        Ok(self.replace_track(report.track, "track imported"))
    }

    fn import_media(&mut self, path: PathBuf) -> Result<Vec<Event>> {
        self.media.open(&path)?;
        self.armed = None;
        self.media_path = Some(path.clone());
        info!(path = %path.display(), "media imported");

        let mut events = vec![Event::MediaChanged { path }];
        events.extend(self.refresh_active());
        Ok(events)
    }

    fn edit_at_playhead<F>(&mut self, index: usize, edit: F) -> Result<Vec<Event>>
    where
        F: FnOnce(&CaptionTrack, Seconds) -> Result<CaptionTrack>,
    {
        let Some(offset) = self.media.position() else {
            debug!(index, "playhead edit ignored: no media loaded");
            return Ok(Vec::new());
        };
        let next = edit(&self.track, offset)?;
        if next == self.track {
            return Ok(Vec::new());
        }
        Ok(self.replace_track(next, "playhead edit applied"))
    }

    fn play(&mut self, index: usize, stop_at_end: bool) -> Result<Vec<Event>> {
        if self.media.position().is_none() {
            debug!(index, "play ignored: no media loaded");
            return Ok(Vec::new());
        }
        let record = self
            .track
            .get(index)
            .ok_or(EngineError::RecordIndexOutOfRange {
                index,
                len: self.track.len(),
            })?;
        let window = play_window(record);

        self.media.seek(window.start);
        self.media.play();
        self.armed = stop_at_end.then_some(ArmedWindow { index, window });
        debug!(
            index,
            start = window.start,
            end = window.end,
            stop_at_end,
            "playback started"
        );

        let mut events = vec![Event::PlaybackStarted { index, window }];
        if let Some(event) = self.update_active(window.start) {
            events.push(event);
        }
        Ok(events)
    }

    fn pause(&mut self) -> Vec<Event> {
        let Some(offset) = self.media.position() else {
            return Vec::new();
        };
        self.media.pause();
        self.armed = None;
        vec![Event::PlaybackStopped { offset }]
    }

    fn playback_tick(&mut self, offset: Seconds) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(event) = self.update_active(offset) {
            events.push(event);
        }

        let reached_end = self
            .armed
            .filter(|armed| armed.window.should_stop(offset));
        if let Some(armed) = reached_end {
            self.media.pause();
            self.armed = None;
            debug!(index = armed.index, offset, "playback reached window end");
            events.push(Event::PlaybackStopped { offset });
        }
        events
    }

    fn bind_region(&mut self, index: usize, region: RegionId) -> Vec<Event> {
        if !self.regions.bind(index, region.clone()) {
            debug!(index, region = %region, "region bind ignored: no caption at position");
            return Vec::new();
        }
        vec![Event::RegionBound { index, region }]
    }

    fn region_moved(
        &mut self,
        region: &RegionId,
        start: Seconds,
        end: Seconds,
    ) -> Result<Vec<Event>> {
        let index = self
            .regions
            .position_of(region)
            .ok_or_else(|| EngineError::RegionNotFound {
                region: region.to_string(),
            })?;
        let next = self.track.set_start(index, start)?.set_end(index, end)?;
        Ok(self.replace_track(next, "region moved"))
    }

    fn save_session(&mut self) -> Result<Vec<Event>> {
        let session = StoredSession {
            name: self.name.clone(),
            track_text: serialize_srt(&self.track.records),
            media_path: self.media_path.clone(),
        };
        self.store.save(&session)?;
        Ok(vec![Event::SessionSaved])
    }

    fn restore_session(&mut self) -> Result<Vec<Event>> {
        let Some(session) = self.store.load()? else {
            debug!("restore ignored: no stored session");
            return Ok(Vec::new());
        };

        let mut events = vec![Event::SessionRestored {
            name: session.name.clone(),
        }];
        if let Some(path) = session.media_path {
            match self.import_media(path) {
                Ok(media_events) => events.extend(media_events),
                Err(error) => warn!(%error, "stored media could not be reopened"),
            }
        }
        events.extend(self.import_track(session.name, &session.track_text)?);
        Ok(events)
    }

    fn replace_track(&mut self, track: CaptionTrack, reason: &'static str) -> Vec<Event> {
        self.track = track;
        self.regions.reset(self.track.len());
        info!(record_count = self.track.len(), "{reason}");

        let mut events = vec![Event::TrackChanged(self.snapshot())];
        events.extend(self.refresh_active());
        events
    }

    fn refresh_active(&mut self) -> Option<Event> {
        let offset = self.media.position()?;
        self.update_active(offset)
    }

    fn update_active(&mut self, offset: Seconds) -> Option<Event> {
        let index = active_index(&self.track, offset);
        if index == self.active {
            return None;
        }
        self.active = index;
        Some(Event::ActiveRecordChanged { index })
    }
}
