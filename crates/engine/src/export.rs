use crate::srt::serialize_srt;
use crate::track::CaptionTrack;

/// Serialized caption file handed to the save-file collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Builds the export artifact for the current track.
pub fn build_export(track: &CaptionTrack, file_name: &str) -> ExportArtifact {
    ExportArtifact {
        file_name: file_name.to_string(),
        contents: serialize_srt(&track.records),
    }
}

#[cfg(test)]
mod tests {
    use super::build_export;
    use crate::track::{CaptionRecord, CaptionTrack};

    #[test]
    fn export_renumbers_and_keeps_file_name() {
        let mut record = CaptionRecord::new("00:00:01,000", "00:00:02,000", "x");
        record.sequence = Some(9);
        let artifact = build_export(&CaptionTrack::new(vec![record]), "subtitles.srt");

        assert_eq!(artifact.file_name, "subtitles.srt");
        assert_eq!(artifact.contents, "1\n00:00:01,000 --> 00:00:02,000\nx\n");
    }
}
