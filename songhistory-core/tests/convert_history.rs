use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use songhistory_core::convert::{
    resolve_projected_datetime, service_for, HistoryConverter, Service, EPOCH_CUTOVER,
};
use songhistory_core::extract::ProjectionRecord;
use songhistory_core::ignore::IgnoreList;

/// A record old enough that the SQLite-rendered text is authoritative.
fn record(text: &str, song_id: i64, title: &str, author: &str) -> ProjectionRecord {
    ProjectionRecord {
        projected_text: text.to_string(),
        projected_epoch: 1000,
        song_id,
        title: title.to_string(),
        author: author.to_string(),
    }
}

fn converter(prefixes: &[&str]) -> HistoryConverter {
    HistoryConverter::new(IgnoreList::from_prefixes(
        prefixes.iter().map(|p| p.to_string()).collect(),
    ))
}

fn sunday_at(hour: u32, min: u32) -> NaiveDateTime {
    // 2014-06-15 was a Sunday.
    NaiveDate::from_ymd_opt(2014, 6, 15)
        .expect("valid date")
        .and_hms_opt(hour, min, 0)
        .expect("valid time")
}

#[test]
fn service_windows_match_the_assumed_projection_times() {
    assert_eq!(service_for(&sunday_at(9, 27)), None);
    assert_eq!(service_for(&sunday_at(9, 28)), Some(Service::NineThirty));
    assert_eq!(service_for(&sunday_at(11, 0)), Some(Service::NineThirty));
    assert_eq!(service_for(&sunday_at(11, 1)), None);
    assert_eq!(service_for(&sunday_at(11, 13)), Some(Service::ElevenFifteen));
    assert_eq!(service_for(&sunday_at(13, 0)), Some(Service::ElevenFifteen));
    assert_eq!(service_for(&sunday_at(13, 1)), None);
    assert_eq!(service_for(&sunday_at(18, 28)), Some(Service::SixThirty));
    assert_eq!(service_for(&sunday_at(21, 0)), Some(Service::SixThirty));
    assert_eq!(service_for(&sunday_at(21, 1)), None);
}

#[test]
fn service_is_only_assigned_on_sundays() {
    // 2014-06-14 was a Saturday.
    let saturday = NaiveDate::from_ymd_opt(2014, 6, 14)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time");
    assert_eq!(service_for(&saturday), None);
}

#[test]
fn old_records_trust_the_rendered_text() {
    let resolved = resolve_projected_datetime("2014-06-15 10:30:00", 1000).expect("resolves");
    assert_eq!(resolved, sunday_at(10, 30));
}

#[test]
fn recent_records_trust_the_epoch_in_local_time() {
    let epoch = EPOCH_CUTOVER + 86_400;
    let resolved = resolve_projected_datetime("ignored", epoch).expect("resolves");
    let expected = Local
        .timestamp_opt(epoch, 0)
        .single()
        .expect("unambiguous local time")
        .naive_local();
    assert_eq!(resolved, expected);
}

#[test]
fn garbage_text_on_an_old_record_is_an_error() {
    assert!(resolve_projected_datetime("not a datetime", 1000).is_err());
}

#[test]
fn csv_has_header_and_one_row_per_service_song() {
    let records = vec![
        record("2014-06-15 09:30:00", 1, "Amazing Grace", "John Newton"),
        record("2014-06-15 09:40:00", 2, "Be Thou My Vision", "Eleanor Hull"),
    ];
    let csv = converter(&[]).convert(&records).expect("converts");

    let mut lines = csv.content.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Service,Time Projected,Title,Author")
    );
    assert_eq!(
        lines.next(),
        Some("15/06/2014,9:30am,09:30:00,Amazing Grace,John Newton")
    );
    assert_eq!(
        lines.next(),
        Some("15/06/2014,9:30am,09:40:00,Be Thou My Vision,Eleanor Hull")
    );
    assert_eq!(lines.next(), None);
    assert_eq!(csv.song_count, 2);
}

#[test]
fn rows_outside_sunday_services_are_dropped() {
    let records = vec![
        // Monday morning.
        record("2014-06-16 09:30:00", 1, "Amazing Grace", "John Newton"),
        // Sunday afternoon, between services.
        record("2014-06-15 14:00:00", 1, "Amazing Grace", "John Newton"),
    ];
    let csv = converter(&[]).convert(&records).expect("converts");
    assert_eq!(csv.song_count, 0);
    assert_eq!(csv.content.lines().count(), 1, "header only");
}

#[test]
fn ignored_prefix_skips_authorless_titles_only() {
    let records = vec![
        record("2014-06-15 09:30:00", 1, "Reading: Psalm 23", ""),
        record("2014-06-15 09:35:00", 2, "Reading the Signs", "A. Author"),
    ];
    let csv = converter(&["reading"]).convert(&records).expect("converts");
    assert_eq!(csv.song_count, 1);
    assert!(csv.content.contains("Reading the Signs"));
    assert!(!csv.content.contains("Psalm 23"));
}

#[test]
fn repeats_within_one_service_count_once() {
    let records = vec![
        record("2014-06-15 09:30:00", 1, "Amazing Grace", "John Newton"),
        record("2014-06-15 09:45:00", 1, "Amazing Grace", "John Newton"),
    ];
    let csv = converter(&[]).convert(&records).expect("converts");
    assert_eq!(csv.song_count, 1);
}

#[test]
fn the_same_song_in_different_services_counts_each_time() {
    let records = vec![
        record("2014-06-15 09:30:00", 1, "Amazing Grace", "John Newton"),
        record("2014-06-15 11:20:00", 1, "Amazing Grace", "John Newton"),
        // The following Sunday (2014-06-22).
        record("2014-06-22 09:30:00", 1, "Amazing Grace", "John Newton"),
    ];
    let csv = converter(&[]).convert(&records).expect("converts");
    assert_eq!(csv.song_count, 3);
}

#[test]
fn special_characters_are_scrubbed() {
    let records = vec![record(
        "2014-06-15 09:30:00",
        1,
        "Amazing* Grace#",
        "John @Newton",
    )];
    let csv = converter(&[]).convert(&records).expect("converts");
    assert!(csv.content.contains("Amazing Grace"));
    assert!(csv.content.contains("John Newton"));
    assert!(!csv.content.contains('*'));
    assert!(!csv.content.contains('@'));
}

#[test]
fn titles_with_commas_are_quoted() {
    let records = vec![record(
        "2014-06-15 09:30:00",
        1,
        "10,000 Reasons (Bless the Lord)",
        "Matt Redman",
    )];
    let csv = converter(&[]).convert(&records).expect("converts");
    assert!(csv
        .content
        .contains("\"10,000 Reasons (Bless the Lord)\""));
}
