//! Integration tests for the conversion library against recorded fixtures

use std::io::Cursor;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use scriptlog::transcript::transforms::OverwritePolicy;
use scriptlog::{
    ConvertError, Converter, ExtractionMode, InputRole, TimingScript, TranscriptConfig,
};

use super::helpers::{fixtures_dir, temp_fixture, write_session, FIXTURE_START};

fn tokyo_config() -> TranscriptConfig {
    TranscriptConfig {
        start: DateTime::parse_from_rfc3339(FIXTURE_START).unwrap().with_timezone(&Utc),
        time_zone: chrono_tz::Asia::Tokyo,
        ..TranscriptConfig::default()
    }
}

fn convert_fixture(config: TranscriptConfig) -> String {
    let capture = fixtures_dir().join("session");
    let timing = fixtures_dir().join("session.timing");
    let mut out = Vec::new();

    Converter::new(config)
        .unwrap()
        .convert_files(&capture, &timing, &mut out)
        .unwrap();

    String::from_utf8(out).unwrap()
}

fn convert_bytes(config: TranscriptConfig, timing: &str, capture: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    Converter::new(config)
        .unwrap()
        .convert(TimingScript::parse_str(timing), Cursor::new(capture.to_vec()), &mut out)
        .unwrap();

    String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
}

// ============================================================================
// Fixture Session
// ============================================================================

#[test]
fn full_session_transcript() {
    let transcript = convert_fixture(tokyo_config());

    insta::assert_snapshot!(transcript, @r###"
    00:00:02,2025/09/03 21:34:03,AAAA,user@host:~$ ls -la
    00:00:02,2025/09/03 21:34:03,AAAA,total 8
    00:00:02,2025/09/03 21:34:03,AAAA,.
    00:00:05,2025/09/03 21:34:06,AAAA,user@host:~$ echo ✓ done
    00:00:05,2025/09/03 21:34:06,AAAA,✓ done
    00:00:05,2025/09/03 21:34:06,AAAA,user@host:~$ fetch
    00:00:06,2025/09/03 21:34:07,AAAA,100%
    00:00:07,2025/09/03 21:34:08,AAAA,user@host:~$ exit
    "###);
}

#[test]
fn commands_only_transcript() {
    let transcript = convert_fixture(TranscriptConfig {
        extraction_mode: ExtractionMode::PromptCommand,
        prefix_prompt: false,
        ..tokyo_config()
    });

    insta::assert_snapshot!(transcript, @r###"
    00:00:02,2025/09/03 21:34:03,AAAA,ls -la
    00:00:05,2025/09/03 21:34:06,AAAA,echo ✓ done
    00:00:05,2025/09/03 21:34:06,AAAA,fetch
    00:00:07,2025/09/03 21:34:08,AAAA,exit
    "###);
}

#[test]
fn raw_mode_keeps_escape_parameters() {
    let transcript = convert_fixture(TranscriptConfig {
        strip_control_sequences: false,
        ..tokyo_config()
    });

    assert!(transcript.contains("[01;32muser@host[00m"));
    assert!(!transcript.contains('\x1b'));
}

#[test]
fn every_record_has_four_fields_and_the_tag() {
    let transcript = convert_fixture(TranscriptConfig {
        tag: "HOST1".to_string(),
        ..tokyo_config()
    });

    for record in transcript.lines() {
        let fields: Vec<&str> = record.splitn(4, ',').collect();
        assert_eq!(fields.len(), 4, "record: {record}");
        assert_eq!(fields[2], "HOST1");
        assert_eq!(fields[0].len(), 8);
    }
}

#[test]
fn skip_until_marker_drops_session_prefix() {
    let transcript = convert_fixture(TranscriptConfig {
        skip_until_marker: Some("total".to_string()),
        ..tokyo_config()
    });

    let first = transcript.lines().next().unwrap();
    assert!(first.ends_with(",."), "first record: {first}");
}

// ============================================================================
// Behavioural Properties
// ============================================================================

#[test]
fn two_entries_hello_bye() {
    let records = convert_bytes(tokyo_config(), "0.5 6\n1.0 3\n", b"hello\nbye");

    assert_eq!(
        records,
        vec![
            "00:00:00,2025/09/03 21:34:01,AAAA,hello",
            "00:00:01,2025/09/03 21:34:02,AAAA,bye",
        ]
    );
}

#[test]
fn backspaces_cancel_typed_characters() {
    for n in 1..6 {
        let capture = format!("keep\n{}{}\n", "z".repeat(n), "\x08".repeat(n));
        let config = TranscriptConfig {
            filters: scriptlog::transcript::transforms::FilterConfig::disabled(),
            ..tokyo_config()
        };
        let records = convert_bytes(config, &format!("0 {}\n", capture.len()), capture.as_bytes());

        assert_eq!(records.len(), 2);
        assert!(records[1].ends_with("AAAA,"), "n = {n}: {}", records[1]);
    }
}

#[test]
fn shorter_redraw_preserves_tail() {
    let records = convert_bytes(tokyo_config(), "0.1 5\n0.1 1\n0.1 3\n", b"ABCDE\rXY\n");
    assert!(records[0].ends_with(",XYCDE"));

    let last_segment = TranscriptConfig {
        overwrite_policy: OverwritePolicy::LastSegment,
        ..tokyo_config()
    };
    let records = convert_bytes(last_segment, "0.1 5\n0.1 1\n0.1 3\n", b"ABCDE\rXY\n");
    assert!(records[0].ends_with(",XY"));
}

#[test]
fn split_csi_is_fully_removed() {
    let records = convert_bytes(tokyo_config(), "0.1 3\n0.1 2\n0.1 4\n", b"\x1b[31mred\n");
    assert_eq!(records.len(), 1);
    assert!(records[0].ends_with(",red"));
}

#[test]
fn untimed_trailing_bytes_are_ignored() {
    let records = convert_bytes(tokyo_config(), "0.1 6\n", b"hello\nnever shown\n");
    assert_eq!(records, vec!["00:00:00,2025/09/03 21:34:01,AAAA,hello"]);
}

#[test]
fn timing_with_only_comments_and_garbage_yields_nothing() {
    let records = convert_bytes(tokyo_config(), "# header\n\nnot a line\n1.0\n", b"content\n");
    assert!(records.is_empty());
}

#[test]
fn caret_notation_capture_converts_like_raw_escapes() {
    let caret = TranscriptConfig {
        caret_notation: true,
        ..tokyo_config()
    };
    let decoded = convert_bytes(caret, "0.1 9\n0.2 8\n", b"^[[1mbold^[[0m^M\n");
    let escaped = convert_bytes(tokyo_config(), "0.1 5\n0.2 9\n", b"\x1b[1mbold\x1b[0m\r\n");

    assert_eq!(decoded, escaped);
    assert_eq!(decoded, vec!["00:00:00,2025/09/03 21:34:01,AAAA,bold"]);
}

#[test]
fn commas_in_content_are_not_escaped() {
    let records = convert_bytes(tokyo_config(), "0 9\n", b"a, b, c\r\n");
    assert_eq!(records, vec!["00:00:00,2025/09/03 21:34:01,AAAA,a, b, c"]);
}

// ============================================================================
// Input Errors
// ============================================================================

#[test]
fn missing_timing_is_reported_before_any_output() {
    let temp_dir = TempDir::new().unwrap();
    let capture = temp_dir.path().join("session");
    std::fs::write(&capture, b"data\n").unwrap();

    let mut out = Vec::new();
    let err = Converter::new(tokyo_config())
        .unwrap()
        .convert_files(&capture, &temp_dir.path().join("session.timing"), &mut out)
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::InputUnavailable {
            role: InputRole::Timing,
            ..
        }
    ));
    assert!(out.is_empty());
}

#[test]
fn copied_fixture_converts_like_committed_one() {
    let (temp_dir, capture) = temp_fixture("session");
    let timing = temp_dir.path().join("session.timing");

    let mut out = Vec::new();
    let stats = Converter::new(tokyo_config())
        .unwrap()
        .convert_files(&capture, &timing, &mut out)
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), convert_fixture(tokyo_config()));
    assert_eq!(stats.entries, 14);
    assert_eq!(stats.bytes, 320);
    assert_eq!(stats.records, 8);
    assert!(!stats.capture_ended_early);
}

#[test]
fn truncated_capture_still_converts() {
    let temp_dir = TempDir::new().unwrap();
    let capture = write_session(
        temp_dir.path(),
        "cut",
        b"first\nsecond",
        "0.5 6\n0.5 100\n0.5 10\n",
    );

    let mut out = Vec::new();
    let stats = Converter::new(tokyo_config())
        .unwrap()
        .convert_files(&capture, &temp_dir.path().join("cut.timing"), &mut out)
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "00:00:00,2025/09/03 21:34:01,AAAA,first",
            "00:00:01,2025/09/03 21:34:02,AAAA,second",
        ]
    );
    assert!(stats.capture_ended_early);
    assert_eq!(stats.entries, 2);
}
