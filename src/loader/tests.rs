use super::*;
use chrono::TimeZone;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

const SAMPLE_EXPORT: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<?xml-stylesheet type="text/xsl" href="sms.xsl"?>
<smses count="3">
  <sms protocol="0" address="+15551234" date="1700000000123" type="1" body="Hi there, are you free?" time="Nov 14, 2023 10:13:20 PM" />
  <sms protocol="0" address="+15551234" date="1700000060999" type="2" body="Yes! 5 min" time="Nov 14, 2023 10:14:20 PM" />
  <sms protocol="0" address="+15559876" date="1700000120000" type="3" body="draft" time="Nov 14, 2023 10:15:20 PM" />
</smses>
"#;

fn record(index: usize) -> SourceRecord {
    SourceRecord {
        index,
        address: Some("+15550000".to_string()),
        type_code: Some("1".to_string()),
        body: Some("hello world".to_string()),
        date: Some("1700000000000".to_string()),
        time: Some("raw time".to_string()),
    }
}

#[test]
fn parse_document_reads_each_child_in_order() {
    let records = parse_document(SAMPLE_EXPORT).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].index, 0);
    assert_eq!(records[0].address.as_deref(), Some("+15551234"));
    assert_eq!(records[1].type_code.as_deref(), Some("2"));
    assert_eq!(records[2].body.as_deref(), Some("draft"));
    assert_eq!(records[2].time.as_deref(), Some("Nov 14, 2023 10:15:20 PM"));
}

#[test]
fn parse_document_rejects_invalid_xml() {
    let err = parse_document("<smses><sms address=\"1\"></smses>").unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse SMS export as XML"));
}

#[test]
fn build_messages_maps_types_and_lengths() {
    let records = parse_document(SAMPLE_EXPORT).unwrap();
    let outcome = build_messages(&records, &Tokenizer::default(), LoadPolicy::Strict).unwrap();

    let types: Vec<_> = outcome.messages.iter().map(|m| m.message_type).collect();
    assert_eq!(
        types,
        vec![
            MessageType::Received,
            MessageType::Sent,
            MessageType::Unknown
        ]
    );

    let first = &outcome.messages[0];
    assert_eq!(first.phone_number, "+15551234");
    assert_eq!(first.message_length, 23);
    assert_eq!(first.tokens, vec!["hi", "there,", "free?"]);
    assert_eq!(first.date_raw, "Nov 14, 2023 10:13:20 PM");
    assert!(outcome.skipped.is_empty());
}

#[test]
fn timestamp_truncates_milliseconds() {
    let records = parse_document(SAMPLE_EXPORT).unwrap();
    let outcome = build_messages(&records, &Tokenizer::default(), LoadPolicy::Strict).unwrap();

    let expected = Local.timestamp_opt(1_700_000_060, 0).unwrap();
    assert_eq!(outcome.messages[1].timestamp, expected);
}

#[test]
fn message_length_counts_code_points() {
    let mut rec = record(0);
    rec.body = Some("héllo 👋".to_string());
    let message = build_message(&rec, &Tokenizer::default()).unwrap();
    assert_eq!(message.message_length, 7);
}

#[test]
fn missing_type_is_unknown_and_missing_time_is_empty() {
    let mut rec = record(0);
    rec.type_code = None;
    rec.time = None;
    let message = build_message(&rec, &Tokenizer::default()).unwrap();
    assert_eq!(message.message_type, MessageType::Unknown);
    assert_eq!(message.date_raw, "");
}

#[test]
fn missing_required_attributes_are_malformed() {
    for strip in ["address", "body", "date"] {
        let mut rec = record(4);
        match strip {
            "address" => rec.address = None,
            "body" => rec.body = None,
            _ => rec.date = None,
        }
        let err = build_message(&rec, &Tokenizer::default()).unwrap_err();
        assert_eq!(
            err,
            StatsError::malformed(4, format!("missing `{strip}` attribute"))
        );
    }
}

#[test]
fn non_integer_date_is_malformed() {
    let mut rec = record(2);
    rec.date = Some("yesterday".to_string());
    let err = build_message(&rec, &Tokenizer::default()).unwrap_err();
    assert!(matches!(err, StatsError::MalformedRecord { index: 2, .. }));
    assert!(err.to_string().contains("not an integer"));
}

#[test]
fn unrepresentable_date_is_malformed() {
    let mut rec = record(0);
    rec.date = Some(i64::MAX.to_string());
    let err = build_message(&rec, &Tokenizer::default()).unwrap_err();
    match err {
        StatsError::MalformedRecord { index, reason } => {
            assert_eq!(index, 0);
            assert!(reason.contains("out of range"), "unexpected reason: {reason}");
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[test]
fn negative_dates_truncate_toward_zero() {
    let mut rec = record(0);
    rec.date = Some("-1500".to_string());
    let message = build_message(&rec, &Tokenizer::default()).unwrap();
    assert_eq!(message.timestamp, Local.timestamp_opt(-1, 0).unwrap());
}

#[test]
fn strict_policy_aborts_whole_batch() {
    let mut bad = record(1);
    bad.date = None;
    let records = vec![record(0), bad, record(2)];

    let err = build_messages(&records, &Tokenizer::default(), LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, StatsError::MalformedRecord { index: 1, .. }));
}

#[test]
fn skip_policy_keeps_good_records_and_reports_bad_ones() {
    let mut bad = record(1);
    bad.date = Some("12abc".to_string());
    let records = vec![record(0), bad, record(2)];

    let outcome =
        build_messages(&records, &Tokenizer::default(), LoadPolicy::SkipMalformed).unwrap();
    assert_eq!(outcome.messages.len(), 2);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(matches!(
        outcome.skipped[0],
        StatsError::MalformedRecord { index: 1, .. }
    ));
}

#[test]
fn load_file_reads_export_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sms.xml");
    let mut file = File::create(&path).unwrap();
    file.write_all(SAMPLE_EXPORT.as_bytes()).unwrap();

    let outcome = load_file(&path, &Tokenizer::default(), LoadPolicy::Strict).unwrap();
    assert_eq!(outcome.messages.len(), 3);
}

#[test]
fn load_file_reports_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.xml");

    let err = load_file(&path, &Tokenizer::default(), LoadPolicy::Strict).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read SMS export"));
}
