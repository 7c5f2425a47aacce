use engine::{CaptionRecord, CaptionTrack, parse_srt, serialize_srt};
use proptest::prelude::*;

fn sample_text() -> String {
    [
        "3",
        "00:00:01,000 --> 00:00:02,500",
        "Hello world",
        "",
        "7",
        "00:00:03,000 --> 00:00:05,000",
        "Two lines",
        "of caption text",
        "",
        "8",
        "00:00:04,500 --> 00:00:04,000",
        "Overlapping and inverted",
        "",
        "9",
        "01:59:59,999 --> 02:00:00,000",
        "",
    ]
    .join("\n")
}

fn timecode() -> impl Strategy<Value = String> {
    (0u64..100, 0u64..60, 0u64..60, 0u64..1000)
        .prop_map(|(h, m, s, ms)| format!("{h:02}:{m:02}:{s:02},{ms:03}"))
}

fn caption_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z][A-Za-z0-9 ,.!?']{0,30}[A-Za-z.!?]", 0..4)
        .prop_map(|lines| lines.join("\n"))
}

fn caption_records() -> impl Strategy<Value = Vec<CaptionRecord>> {
    let record = (timecode(), timecode(), caption_text())
        .prop_map(|(start, end, text)| CaptionRecord::new(start, end, text));
    prop::collection::vec(record, 0..12)
}

proptest! {
    #[test]
    fn reparse_numbers_blocks_in_order_and_keeps_fields(records in caption_records()) {
        let reparsed = parse_srt(&serialize_srt(&records));

        prop_assert_eq!(reparsed.len(), records.len());
        for (position, (before, after)) in records.iter().zip(&reparsed.records).enumerate() {
            prop_assert_eq!(after.sequence, Some(position as u64 + 1));
            prop_assert_eq!(&after.start, &before.start);
            prop_assert_eq!(&after.end, &before.end);
            prop_assert_eq!(&after.text, &before.text);
        }
    }
}

#[test]
fn serialize_is_stable_after_one_normalization() {
    let once = serialize_srt(&parse_srt(&sample_text()).records);
    let twice = serialize_srt(&parse_srt(&once).records);
    assert_eq!(once, twice);
}

#[test]
fn edited_track_survives_export_and_reimport() {
    let track = parse_srt(&sample_text())
        .split_at(1, 4.0)
        .expect("split inside second caption")
        .merge_with_next(2)
        .add_line()
        .set_end(4, 0.5)
        .expect("set end on added line");

    let reparsed = parse_srt(&serialize_srt(&track.records));
    let strip = |track: &CaptionTrack| -> Vec<(String, String, String)> {
        track
            .records
            .iter()
            .map(|record| (record.start.clone(), record.end.clone(), record.text.clone()))
            .collect()
    };
    assert_eq!(strip(&reparsed), strip(&track));
}
