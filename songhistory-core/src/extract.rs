//! Extraction of the raw projection history from an EasyWorship database.
//!
//! EasyWorship records every projection as a row in its `action` table (SQLite).
//! This module opens that database read-only and returns the rows that matter
//! for the report: when a song was projected, which song it was, and its title
//! and author. All interpretation (service assignment, filtering, CSV shape)
//! happens in [`crate::convert`].

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{error, info};

/// The datetime stored by EasyWorship is the number of 100s of nanoseconds
/// since 21 December 1600. Divide by 10^7 for seconds, then subtract the
/// number of seconds between 21 Dec 1600 and 1 Jan 1970.
///
/// Action type 2 is "project" (other action types are not relevant here).
///
/// Ordered by date descending then time ascending: most recent service first,
/// but songs within each service appear in projection order.
const PROJECTION_HISTORY_SQL: &str = "\
select datetime(datetime_since_epoch, 'unixepoch'), datetime_since_epoch, song_id, title, author \
from (select a.date/10000000-11644473600 datetime_since_epoch, s.rowid song_id, s.title, s.author \
      from action a \
      join song s on a.song_id = s.rowid \
      where a.action_type = 2) \
order by date(datetime_since_epoch, 'unixepoch') desc, time(datetime_since_epoch, 'unixepoch')";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("song history database not found at {}", .0.display())]
    DatabaseMissing(PathBuf),
    #[error("song history database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One raw "song projected" event as read from the database, unfiltered.
#[derive(Debug, Clone)]
pub struct ProjectionRecord {
    /// The projection datetime as rendered by SQLite (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub projected_text: String,
    /// The projection datetime as seconds since the Unix epoch.
    pub projected_epoch: i64,
    /// The song's rowid, stable across projections of the same song.
    pub song_id: i64,
    pub title: String,
    pub author: String,
}

/// Read-only handle on the EasyWorship database.
pub struct HistoryDatabase {
    pool: SqlitePool,
}

impl HistoryDatabase {
    /// Open the database at `path` read-only. The file is produced by an
    /// external application; a missing file is a reported error, not a panic.
    pub async fn open(path: &Path) -> Result<Self, ExtractError> {
        if !path.exists() {
            error!(path = %path.display(), "Song history database not found");
            return Err(ExtractError::DatabaseMissing(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        info!(path = %path.display(), "Opened song history database");
        Ok(Self { pool })
    }

    /// Fetch every projection event, most recent service first.
    pub async fn projection_history(&self) -> Result<Vec<ProjectionRecord>, ExtractError> {
        let rows = sqlx::query(PROJECTION_HISTORY_SQL)
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(ProjectionRecord {
                projected_text: row.try_get::<String, _>(0)?,
                projected_epoch: row.try_get::<i64, _>(1)?,
                song_id: row.try_get::<i64, _>(2)?,
                // Titles and authors may be NULL in old data.
                title: row.try_get::<Option<String>, _>(3)?.unwrap_or_default(),
                author: row.try_get::<Option<String>, _>(4)?.unwrap_or_default(),
            });
        }

        info!(records = records.len(), "Fetched projection history");
        Ok(records)
    }
}
