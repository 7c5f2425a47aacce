use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use engine::store::{FileSessionStore, MemorySessionStore, SessionStore};
use engine::sync::active_index;
use engine::{Command, EditorSettings, Engine, Event, FixedPosition, parse_srt, parse_srt_report};
use tracing::{debug, info, warn};

use crate::CliCommand;

/// Where an edit reads from and writes to.
struct EditTarget<'a> {
    input: Option<&'a Path>,
    output: Option<&'a Path>,
    session: Option<&'a Path>,
}

pub(crate) fn run(
    command: CliCommand,
    settings: EditorSettings,
    session: Option<&Path>,
) -> anyhow::Result<()> {
    let (input, output, media, edit_command) = match &command {
        CliCommand::Check { input } => return check(input),
        CliCommand::Active { input, at } => return active(input, *at),
        CliCommand::ClearSession => return clear_session(session),
        CliCommand::Normalize { input, output } => (input, output, FixedPosition::unloaded(), None),
        CliCommand::Add { input, output } => (
            input,
            output,
            FixedPosition::unloaded(),
            Some(Command::AddLine),
        ),
        CliCommand::Delete {
            input,
            index,
            output,
        } => (
            input,
            output,
            FixedPosition::unloaded(),
            Some(Command::DeleteRecord { index: *index }),
        ),
        CliCommand::Merge {
            input,
            index,
            output,
        } => (
            input,
            output,
            FixedPosition::unloaded(),
            Some(Command::MergeWithNext { index: *index }),
        ),
        CliCommand::Split {
            input,
            index,
            at,
            output,
        } => (
            input,
            output,
            FixedPosition::at(*at),
            Some(Command::SplitAtPlayhead { index: *index }),
        ),
        CliCommand::SetStart {
            input,
            index,
            at,
            output,
        } => (
            input,
            output,
            FixedPosition::at(*at),
            Some(Command::SetStartFromPlayhead { index: *index }),
        ),
        CliCommand::SetEnd {
            input,
            index,
            at,
            output,
        } => (
            input,
            output,
            FixedPosition::at(*at),
            Some(Command::SetEndFromPlayhead { index: *index }),
        ),
    };

    let target = EditTarget {
        input: input.as_deref(),
        output: output.as_deref(),
        session,
    };
    match session {
        Some(dir) => edit(
            Engine::with_store(media, FileSessionStore::new(dir), settings),
            target,
            edit_command,
        ),
        None => edit(
            Engine::with_store(media, MemorySessionStore::default(), settings),
            target,
            edit_command,
        ),
    }
}

fn check(input: &Path) -> anyhow::Result<()> {
    let report = parse_srt_report(&read_input(input)?);
    let invalid = report
        .track
        .records
        .iter()
        .filter(|record| {
            !engine::parse_timecode(&record.start).is_clean()
                || !engine::parse_timecode(&record.end).is_clean()
        })
        .count();

    println!(
        "{}: {} captions, {} skipped blocks, {} with unreadable timecodes",
        input.display(),
        report.track.len(),
        report.skipped_blocks,
        invalid
    );
    Ok(())
}

fn active(input: &Path, at: f64) -> anyhow::Result<()> {
    let track = parse_srt(&read_input(input)?);
    match active_index(&track, at) {
        Some(index) => println!("{index}\t{}", track.records[index].text.replace('\n', " / ")),
        None => println!("none"),
    }
    Ok(())
}

fn edit<S: SessionStore>(
    mut engine: Engine<FixedPosition, S>,
    target: EditTarget<'_>,
    command: Option<Command>,
) -> anyhow::Result<()> {
    match (target.input, target.session) {
        (Some(input), _) => {
            let text = read_input(input)?;
            apply(
                &mut engine,
                Command::ImportTrack {
                    name: input.display().to_string(),
                    text,
                },
            )?;
        }
        (None, Some(dir)) => {
            if apply(&mut engine, Command::RestoreSession)?.is_empty() {
                bail!("no stored session in {}", dir.display());
            }
            debug!(dir = %dir.display(), "continuing stored session");
        }
        (None, None) => bail!("an input file or --session is required"),
    }

    if let Some(command) = command {
        if apply(&mut engine, command.clone())?.is_empty() {
            warn!(?command, "edit left the track unchanged");
        }
    }

    if target.session.is_some() {
        apply(&mut engine, Command::SaveSession)?;
    }

    let artifact = engine.export();
    write_output(target.output, &artifact.contents)?;
    let written_to = target
        .output
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    info!(
        output = %written_to,
        record_count = engine.track().len(),
        "captions written"
    );
    Ok(())
}

/// Runs one command, turning a reported failure into an error.
fn apply<S: SessionStore>(
    engine: &mut Engine<FixedPosition, S>,
    command: Command,
) -> anyhow::Result<Vec<Event>> {
    let events = engine.dispatch(command);
    let failure = events.iter().find_map(|event| match event {
        Event::Error(error) => Some(format!("{} ({:?})", error.message, error.kind)),
        _ => None,
    });
    if let Some(message) = failure {
        bail!("{message}");
    }
    Ok(events)
}

fn clear_session(session: Option<&Path>) -> anyhow::Result<()> {
    let Some(dir) = session else {
        bail!("clear-session needs --session");
    };
    let mut store = FileSessionStore::new(dir);
    store.clear()?;
    info!(path = %store.path().display(), "session cleared");
    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read caption file {}", input.display()))
}

fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::run;
    use crate::CliCommand;
    use engine::EditorSettings;

    const SAMPLE: &str = "5\n00:00:01,000 --> 00:00:03,000\nHello world\n\n6\n00:00:04,000 --> 00:00:06,000\nBye\n";

    fn caption_count(path: &Path) -> usize {
        std::fs::read_to_string(path)
            .expect("read output")
            .matches("-->")
            .count()
    }

    #[test]
    fn split_writes_renumbered_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.srt");
        let output = dir.path().join("out.srt");
        std::fs::write(&input, SAMPLE).expect("write input");

        run(
            CliCommand::Split {
                input: Some(input),
                index: 0,
                at: 2.0,
                output: Some(output.clone()),
            },
            EditorSettings::default(),
            None,
        )
        .expect("split should succeed");

        let written = std::fs::read_to_string(output).expect("read output");
        assert_eq!(
            written,
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n\
             2\n00:00:02,000 --> 00:00:03,000\nworld\n\n\
             3\n00:00:04,000 --> 00:00:06,000\nBye\n"
        );
    }

    #[test]
    fn set_start_out_of_range_reports_engine_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.srt");
        let output = dir.path().join("out.srt");
        std::fs::write(&input, SAMPLE).expect("write input");

        let error = run(
            CliCommand::SetStart {
                input: Some(input),
                index: 5,
                at: 1.0,
                output: Some(output.clone()),
            },
            EditorSettings::default(),
            None,
        )
        .expect_err("index 5 is out of range");
        assert!(error.to_string().contains("out of range"));
        assert!(error.to_string().contains("IndexOutOfRange"));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_reports_path() {
        let error = run(
            CliCommand::Check {
                input: "does-not-exist.srt".into(),
            },
            EditorSettings::default(),
            None,
        )
        .expect_err("missing file must fail");
        assert!(error.to_string().contains("does-not-exist.srt"));
    }

    #[test]
    fn edit_without_input_or_session_fails() {
        let error = run(
            CliCommand::Add {
                input: None,
                output: None,
            },
            EditorSettings::default(),
            None,
        )
        .expect_err("nothing to edit");
        assert!(error.to_string().contains("--session"));
    }

    #[test]
    fn session_carries_edits_between_runs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let session = dir.path().join("session");
        let input = dir.path().join("in.srt");
        let first = dir.path().join("first.srt");
        let second = dir.path().join("second.srt");
        std::fs::write(&input, SAMPLE).expect("write input");

        run(
            CliCommand::Add {
                input: Some(input),
                output: Some(first.clone()),
            },
            EditorSettings::default(),
            Some(&session),
        )
        .expect("first edit");
        assert!(session.join("current.json").exists());
        assert_eq!(caption_count(&first), 3);

        run(
            CliCommand::Delete {
                input: None,
                index: 0,
                output: Some(second.clone()),
            },
            EditorSettings::default(),
            Some(&session),
        )
        .expect("edit continues from the session");

        let written = std::fs::read_to_string(&second).expect("read output");
        assert_eq!(caption_count(&second), 2);
        assert!(written.starts_with("1\n00:00:04,000 --> 00:00:06,000\nBye\n"));
    }

    #[test]
    fn cleared_session_cannot_be_continued() {
        let dir = tempfile::tempdir().expect("temp dir");
        let session = dir.path().join("session");
        let input = dir.path().join("in.srt");
        std::fs::write(&input, SAMPLE).expect("write input");

        run(
            CliCommand::Normalize {
                input: Some(input),
                output: Some(dir.path().join("out.srt")),
            },
            EditorSettings::default(),
            Some(&session),
        )
        .expect("normalize");
        run(CliCommand::ClearSession, EditorSettings::default(), Some(&session))
            .expect("clear");
        assert!(!session.join("current.json").exists());

        let error = run(
            CliCommand::Normalize {
                input: None,
                output: Some(dir.path().join("again.srt")),
            },
            EditorSettings::default(),
            Some(&session),
        )
        .expect_err("session was cleared");
        assert!(error.to_string().contains("no stored session"));
    }

    #[test]
    fn clear_session_requires_a_directory() {
        let result = run(CliCommand::ClearSession, EditorSettings::default(), None);
        assert!(result.is_err());
    }
}
