use crate::time::Seconds;
use crate::track::{CaptionRecord, CaptionTrack};

/// `[start, end)` offsets during which a caption is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayWindow {
    pub start: Seconds,
    pub end: Seconds,
}

impl PlayWindow {
    /// Returns true once playback reached the window end.
    pub fn should_stop(&self, offset: Seconds) -> bool {
        offset >= self.end
    }
}

/// Finds the first caption whose play window contains `offset`.
///
/// Records are scanned in stored order, so the lowest index wins when
/// windows overlap.
///
/// # Example
/// ```
/// use engine::sync::active_index;
/// use engine::track::{CaptionRecord, CaptionTrack};
///
/// let track = CaptionTrack::new(vec![
///     CaptionRecord::new("00:00:00,000", "00:00:02,000", "a"),
///     CaptionRecord::new("00:00:01,000", "00:00:03,000", "b"),
/// ]);
/// assert_eq!(active_index(&track, 1.5), Some(0));
/// assert_eq!(active_index(&track, 2.5), Some(1));
/// assert_eq!(active_index(&track, 3.0), None);
/// ```
pub fn active_index(track: &CaptionTrack, offset: Seconds) -> Option<usize> {
    track
        .records
        .iter()
        .position(|record| record.contains(offset))
}

/// Computes the numeric play window of one caption.
pub fn play_window(record: &CaptionRecord) -> PlayWindow {
    PlayWindow {
        start: record.start_seconds(),
        end: record.end_seconds(),
    }
}
