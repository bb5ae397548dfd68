use chrono::{NaiveDate, NaiveDateTime, Weekday};
use songhistory_core::trigger::TriggerWindow;

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(hour, min, 0)
        .expect("valid time")
}

#[test]
fn default_window_is_sunday_from_seven_pm() {
    let window = TriggerWindow::default();
    assert_eq!(window.weekday, Weekday::Sun);
    assert_eq!(window.from_hour, Some(19));

    // 2015-03-01 was a Sunday.
    assert!(window.permits(at(2015, 3, 1, 19, 0)));
    assert!(window.permits(at(2015, 3, 1, 23, 59)));
    assert!(!window.permits(at(2015, 3, 1, 18, 59)));
}

#[test]
fn wrong_weekday_never_permits() {
    let window = TriggerWindow::default();
    // 2015-03-02 was a Monday.
    assert!(!window.permits(at(2015, 3, 2, 19, 30)));
    assert!(!window.permits(at(2015, 3, 7, 19, 30)));
}

#[test]
fn no_from_hour_means_the_whole_day() {
    let window = TriggerWindow {
        weekday: Weekday::Sun,
        from_hour: None,
    };
    assert!(window.permits(at(2015, 3, 1, 0, 0)));
    assert!(window.permits(at(2015, 3, 1, 12, 0)));
    assert!(!window.permits(at(2015, 3, 2, 12, 0)));
}

#[test]
fn custom_weekday_is_honoured() {
    let window = TriggerWindow {
        weekday: Weekday::Wed,
        from_hour: Some(6),
    };
    // 2015-03-04 was a Wednesday.
    assert!(window.permits(at(2015, 3, 4, 6, 0)));
    assert!(!window.permits(at(2015, 3, 4, 5, 59)));
    assert!(!window.permits(at(2015, 3, 1, 6, 0)));
}
