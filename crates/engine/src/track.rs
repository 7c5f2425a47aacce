use crate::error::{EngineError, Result};
use crate::split::{CharacterMidpoint, SplitPolicy};
use crate::time::{Seconds, ZERO_TIMECODE, format_timecode, timecode_to_seconds};
use tracing::{debug, warn};

/// Separator placed between texts when two captions are merged.
pub const MERGE_SEPARATOR: &str = "\n";

/// One timed caption.
///
/// Boundaries are kept as text because users edit them directly; numeric
/// offsets are derived through [`crate::time`] whenever arithmetic is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRecord {
    /// Index number read from imported text. Not identity: export renumbers.
    pub sequence: Option<u64>,
    pub start: String,
    pub end: String,
    pub text: String,
}

/// Partial update applied by [`CaptionTrack::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionPatch {
    pub start: Option<String>,
    pub end: Option<String>,
    pub text: Option<String>,
}

/// Ordered captions of one editing session.
///
/// Order follows user edits only: overlapping and out-of-order records are
/// kept as they are. Every edit returns a new track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTrack {
    pub records: Vec<CaptionRecord>,
}

impl CaptionRecord {
    /// Creates a record without an imported sequence number.
    pub fn new(start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sequence: None,
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }

    pub fn start_seconds(&self) -> Seconds {
        timecode_to_seconds(&self.start)
    }

    pub fn end_seconds(&self) -> Seconds {
        timecode_to_seconds(&self.end)
    }

    /// Text lines for multi-line display.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Returns true when `offset` lies in `[start, end)`.
    pub fn contains(&self, offset: Seconds) -> bool {
        self.start_seconds() <= offset && offset < self.end_seconds()
    }

    fn apply(&self, patch: CaptionPatch) -> Self {
        Self {
            sequence: self.sequence,
            start: patch.start.unwrap_or_else(|| self.start.clone()),
            end: patch.end.unwrap_or_else(|| self.end.clone()),
            text: patch.text.unwrap_or_else(|| self.text.clone()),
        }
    }
}

impl CaptionTrack {
    pub fn new(records: Vec<CaptionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CaptionRecord> {
        self.records.get(index)
    }

    /// Appends an empty, zero-length caption at `00:00:00,000`.
    ///
    /// # Example
    /// ```
    /// use engine::track::CaptionTrack;
    ///
    /// let track = CaptionTrack::default().add_line();
    /// assert_eq!(track.len(), 1);
    /// assert_eq!(track.records[0].start, "00:00:00,000");
    /// assert_eq!(track.records[0].text, "");
    /// ```
    pub fn add_line(&self) -> Self {
        let mut records = self.records.clone();
        records.push(CaptionRecord::new(ZERO_TIMECODE, ZERO_TIMECODE, ""));
        debug!(record_count = records.len(), "line added");
        Self { records }
    }

    /// Replaces fields of the record at `index`.
    pub fn update(&self, index: usize, patch: CaptionPatch) -> Result<Self> {
        let current = self.checked(index)?;
        let mut records = self.records.clone();
        records[index] = current.apply(patch);
        Ok(Self { records })
    }

    /// Removes the record at `index`. Out-of-range indices leave the track unchanged.
    pub fn delete(&self, index: usize) -> Self {
        if index >= self.records.len() {
            debug!(index, record_count = self.records.len(), "delete ignored: out of range");
            return self.clone();
        }
        let mut records = self.records.clone();
        records.remove(index);
        Self { records }
    }

    /// Rewrites the start boundary of the record at `index` to `offset`.
    ///
    /// The new start may land after the record's end; inverted intervals are
    /// kept as given.
    pub fn set_start(&self, index: usize, offset: Seconds) -> Result<Self> {
        self.update(
            index,
            CaptionPatch {
                start: Some(format_timecode(offset)),
                ..CaptionPatch::default()
            },
        )
    }

    /// Rewrites the end boundary of the record at `index` to `offset`.
    pub fn set_end(&self, index: usize, offset: Seconds) -> Result<Self> {
        self.update(
            index,
            CaptionPatch {
                end: Some(format_timecode(offset)),
                ..CaptionPatch::default()
            },
        )
    }

    /// Absorbs the record after `index` into the record at `index`.
    ///
    /// The merged record keeps its start, takes the next record's end, and
    /// appends the next text after [`MERGE_SEPARATOR`]. Returns an unchanged
    /// track when `index` has no successor.
    ///
    /// # Example
    /// ```
    /// use engine::track::{CaptionRecord, CaptionTrack};
    ///
    /// let track = CaptionTrack::new(vec![
    ///     CaptionRecord::new("00:00:01,000", "00:00:02,000", "Hello"),
    ///     CaptionRecord::new("00:00:02,000", "00:00:03,000", "world"),
    /// ]);
    /// let merged = track.merge_with_next(0);
    /// assert_eq!(merged.len(), 1);
    /// assert_eq!(merged.records[0].end, "00:00:03,000");
    /// assert_eq!(merged.records[0].text, "Hello\nworld");
    /// ```
    pub fn merge_with_next(&self, index: usize) -> Self {
        if index + 1 >= self.records.len() {
            debug!(index, record_count = self.records.len(), "merge ignored: no next record");
            return self.clone();
        }

        let mut records = self.records.clone();
        let next = records.remove(index + 1);
        let current = &mut records[index];
        current.end = next.end;
        current.text = format!("{}{MERGE_SEPARATOR}{}", current.text, next.text);

        debug!(index, record_count = records.len(), "merge accepted");
        Self { records }
    }

    /// Splits the record at `index` at `offset` using [`CharacterMidpoint`].
    pub fn split_at(&self, index: usize, offset: Seconds) -> Result<Self> {
        self.split_at_with(index, offset, &CharacterMidpoint)
    }

    /// Splits the record at `index` at `offset`.
    ///
    /// Returns an unchanged track unless `offset` lies strictly inside the
    /// record's `(start, end)` interval. The left record ends at `offset`; a
    /// new record starting at `offset` and ending at the original end is
    /// inserted right after it. `policy` divides the text.
    pub fn split_at_with(
        &self,
        index: usize,
        offset: Seconds,
        policy: &dyn SplitPolicy,
    ) -> Result<Self> {
        let current = self.checked(index)?;
        let start = current.start_seconds();
        let end = current.end_seconds();
        if !(start < offset && offset < end) {
            warn!(index, offset, start, end, "split ignored: offset outside caption");
            return Ok(self.clone());
        }

        let (left_text, right_text) = policy.split_text(&current.text);
        let at = format_timecode(offset);
        let left = CaptionRecord {
            end: at.clone(),
            text: left_text,
            ..current.clone()
        };
        let right = CaptionRecord {
            sequence: None,
            start: at,
            end: current.end.clone(),
            text: right_text,
        };

        debug!(
            index,
            offset,
            left_end = %left.end,
            right_start = %right.start,
            right_end = %right.end,
            "split accepted"
        );

        let mut records = self.records.clone();
        records[index] = left;
        records.insert(index + 1, right);
        Ok(Self { records })
    }

    fn checked(&self, index: usize) -> Result<&CaptionRecord> {
        self.records
            .get(index)
            .ok_or(EngineError::RecordIndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }
}
