//! Conversion of raw projection records into the song history CSV report.
//!
//! The resulting file has these columns:
//!   Date (most recent first)
//!   Service (9:30am, 11:15am, 6:30pm)
//!   Time Projected
//!   Title
//!   Author
//!
//! It includes only songs projected on a Sunday inside the assumed service
//! projection times: 9:28-11:00 (9:30am service), 11:13-13:00 (11:15am
//! service), 18:28-21:00 (6:30pm service).
//!
//! Titles with certain prefixes (from the ignore list) are skipped when they
//! carry no author, e.g. Bible readings or liturgy. A song repeated within one
//! service is written once.

use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDateTime, TimeZone, Timelike, Weekday};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::extract::ProjectionRecord;
use crate::ignore::IgnoreList;

/// 1 March 2015 at midnight UTC.
///
/// There seems to have been a data import bug: the EasyWorship 2007 data has
/// the wrong number of seconds since epoch for times occurring during +0100
/// GMT. For that data we rely on the datetime string provided by SQLite as it
/// ignores timezone. For newer data we rely on the time since epoch.
pub const EPOCH_CUTOVER: i64 = 1_425_168_000;

const CSV_HEADER: [&str; 5] = ["Date", "Service", "Time Projected", "Title", "Author"];

/// Characters allowed through into the report; everything else is stripped.
const SCRUB_PATTERN: &str = r"[^a-zA-Z0-9 ‘’!&()\-.;:,?/']";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unparseable projection datetime {text:?} (epoch {epoch})")]
    BadDatetime { text: String, epoch: i64 },
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
}

/// The three Sunday services songs are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    NineThirty,
    ElevenFifteen,
    SixThirty,
}

impl Service {
    pub fn label(&self) -> &'static str {
        match self {
            Service::NineThirty => "9:30am",
            Service::ElevenFifteen => "11:15am",
            Service::SixThirty => "6:30pm",
        }
    }
}

/// Find the Sunday service referred to by a datetime (if any).
pub fn service_for(dt: &NaiveDateTime) -> Option<Service> {
    if dt.weekday() != Weekday::Sun {
        return None;
    }
    let minutes = dt.hour() * 60 + dt.minute();
    if (9 * 60 + 28..=11 * 60).contains(&minutes) {
        Some(Service::NineThirty)
    } else if (11 * 60 + 13..=13 * 60).contains(&minutes) {
        Some(Service::ElevenFifteen)
    } else if (18 * 60 + 28..=21 * 60).contains(&minutes) {
        Some(Service::SixThirty)
    } else {
        None
    }
}

/// Resolve a record's projection datetime, honouring the import-bug cutover:
/// records at or after [`EPOCH_CUTOVER`] trust the epoch (local time), earlier
/// records trust the SQLite-rendered text.
pub fn resolve_projected_datetime(text: &str, epoch: i64) -> Result<NaiveDateTime, ConvertError> {
    if epoch >= EPOCH_CUTOVER {
        Local
            .timestamp_opt(epoch, 0)
            .single()
            .map(|dt| dt.naive_local())
            .ok_or_else(|| ConvertError::BadDatetime {
                text: text.to_string(),
                epoch,
            })
    } else {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map_err(|_| {
            ConvertError::BadDatetime {
                text: text.to_string(),
                epoch,
            }
        })
    }
}

/// The converted report, ready to write and upload.
#[derive(Debug, Clone)]
pub struct HistoryCsv {
    pub content: String,
    pub song_count: usize,
}

/// Turns raw projection records into the CSV report.
pub struct HistoryConverter {
    ignore: IgnoreList,
    scrub_re: Regex,
}

impl HistoryConverter {
    pub fn new(ignore: IgnoreList) -> Self {
        Self {
            ignore,
            scrub_re: Regex::new(SCRUB_PATTERN).expect("scrub pattern is a valid literal regex"),
        }
    }

    /// Convert `records` (most recent service first, as extracted) into the CSV.
    pub fn convert(&self, records: &[ProjectionRecord]) -> Result<HistoryCsv, ConvertError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        let mut previous_date = String::new();
        let mut previous_service: Option<Service> = None;
        let mut sung_this_service: HashSet<i64> = HashSet::new();
        let mut song_count = 0usize;

        for record in records {
            let dt = resolve_projected_datetime(&record.projected_text, record.projected_epoch)?;
            let Some(service) = service_for(&dt) else {
                continue;
            };

            let date = dt.format("%d/%m/%Y").to_string();
            let time = dt.format("%H:%M:%S").to_string();
            let title = self.scrub(&record.title);
            let author = self.scrub(&record.author);

            // No author usually means a Bible reading or liturgy rather than a song.
            if author.is_empty() {
                if let Some(prefix) = self.ignore.matches(&title) {
                    debug!(title = %title, prefix = %prefix, "Skipping ignored title");
                    continue;
                }
            }

            if previous_date != date || previous_service != Some(service) {
                sung_this_service.clear();
            }
            previous_date = date.clone();
            previous_service = Some(service);

            // A song projected twice in one service counts once.
            if !sung_this_service.insert(record.song_id) {
                debug!(title = %title, service = service.label(), "Skipping repeat within service");
                continue;
            }

            song_count += 1;
            writer.write_record([date.as_str(), service.label(), time.as_str(), title.as_str(), author.as_str()])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ConvertError::Csv(csv::Error::from(e.into_error())))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        info!(songs = song_count, "Converted song history to CSV");
        Ok(HistoryCsv {
            content,
            song_count,
        })
    }

    /// Remove special characters from the specified string.
    fn scrub(&self, s: &str) -> String {
        self.scrub_re.replace_all(s, "").into_owned()
    }
}
