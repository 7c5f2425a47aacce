//! Reading and writing the SubRip caption interchange text.
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! First caption
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second caption
//! on two lines
//! ```

use crate::track::{CaptionRecord, CaptionTrack};
use tracing::{debug, warn};

/// Arrow that separates the two timecodes of a timing line.
pub const TIMING_SEPARATOR: &str = "-->";

/// Parsed track plus the number of malformed blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub track: CaptionTrack,
    pub skipped_blocks: usize,
}

/// Parses caption interchange text, skipping blocks it cannot read.
///
/// # Example
/// ```
/// use engine::srt::parse_srt;
///
/// let track = parse_srt("1\n00:00:01,000 --> 00:00:02,500\nHello world\n");
/// assert_eq!(track.len(), 1);
/// assert_eq!(track.records[0].start, "00:00:01,000");
/// assert_eq!(track.records[0].end, "00:00:02,500");
/// assert_eq!(track.records[0].text, "Hello world");
/// ```
pub fn parse_srt(text: &str) -> CaptionTrack {
    parse_srt_report(text).track
}

/// Parses caption interchange text and reports skipped blocks.
///
/// Lines that are not a bare index number are ignored. An index line whose
/// next line has no `-->` is treated as a malformed block: only the index
/// line is consumed and scanning resumes on the following line, so the scan
/// position advances on every iteration and parsing terminates on any input.
pub fn parse_srt_report(text: &str) -> ParseReport {
    let normalized = text.replace('\r', "");
    let lines: Vec<&str> = normalized.trim().split('\n').collect();

    let mut records = Vec::new();
    let mut skipped_blocks = 0;
    let mut i = 0;

    while i < lines.len() {
        let Some(sequence) = parse_index_line(lines[i]) else {
            i += 1;
            continue;
        };
        let index_line = i;
        i += 1;

        let Some((start, end)) = lines.get(i).and_then(|line| split_timing_line(line)) else {
            warn!(line = index_line + 1, "skipping caption block without timing line");
            skipped_blocks += 1;
            continue;
        };
        i += 1;

        let mut text_lines = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            text_lines.push(lines[i].trim());
            i += 1;
        }

        records.push(CaptionRecord {
            sequence,
            start,
            end,
            text: text_lines.join("\n"),
        });

        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
    }

    debug!(
        record_count = records.len(),
        skipped_blocks,
        line_count = lines.len(),
        "caption text parsed"
    );

    ParseReport {
        track: CaptionTrack { records },
        skipped_blocks,
    }
}

/// Writes records as caption interchange text, numbering blocks from 1.
///
/// Stored sequence numbers are ignored.
///
/// # Example
/// ```
/// use engine::srt::serialize_srt;
/// use engine::track::CaptionRecord;
///
/// let text = serialize_srt(&[
///     CaptionRecord::new("00:00:01,000", "00:00:02,000", "One"),
///     CaptionRecord::new("00:00:03,000", "00:00:04,000", "Two"),
/// ]);
/// assert_eq!(
///     text,
///     "1\n00:00:01,000 --> 00:00:02,000\nOne\n\n2\n00:00:03,000 --> 00:00:04,000\nTwo\n"
/// );
/// ```
pub fn serialize_srt(records: &[CaptionRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            format!(
                "{}\n{} {TIMING_SEPARATOR} {}\n{}\n",
                position + 1,
                record.start,
                record.end,
                record.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns `Some(sequence)` for a bare digit line. Digit runs too long for
/// `u64` still count as index lines but carry no sequence number.
fn parse_index_line(line: &str) -> Option<Option<u64>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(trimmed.parse::<u64>().ok())
}

/// Takes the first two arrow-separated fields; anything after a second
/// arrow is dropped.
fn split_timing_line(line: &str) -> Option<(String, String)> {
    let mut fields = line.trim().split(TIMING_SEPARATOR);
    let start = fields.next()?;
    let end = fields.next()?;
    Some((start.trim().to_string(), end.trim().to_string()))
}
