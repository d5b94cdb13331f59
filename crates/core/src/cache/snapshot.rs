//! Snapshot persistence and record mapping.
//!
//! Maps [`FeedImage`] values to and from `feed_images` rows. The snapshot
//! itself is the single `feed_cache` row (id 1) plus its ordered images.

use chrono::{DateTime, Utc};
use tokio_rusqlite::{Connection, params, rusqlite};
use url::Url;
use uuid::Uuid;

use crate::error::StorageError;
use crate::model::{CacheResult, FeedImage};

/// Primary key of the only snapshot row the schema allows.
const SNAPSHOT_ID: i64 = 1;

/// Persisted form of one feed image.
#[derive(Debug, Clone)]
struct ImageRow {
    id: String,
    description: Option<String>,
    location: Option<String>,
    url: String,
}

impl From<&FeedImage> for ImageRow {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id.to_string(),
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.to_string(),
        }
    }
}

impl TryFrom<ImageRow> for FeedImage {
    type Error = StorageError;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StorageError::Malformed(format!("invalid image id {:?}: {e}", row.id)))?;
        let url = Url::parse(&row.url)
            .map_err(|e| StorageError::Malformed(format!("invalid image url {:?}: {e}", row.url)))?;

        Ok(FeedImage { id, description: row.description, location: row.location, url })
    }
}

/// Seconds since the Unix epoch plus sub-second nanoseconds.
///
/// Covers every `DateTime<Utc>`, unlike RFC 3339 text which stops at year 9999.
fn encode_timestamp(timestamp: &DateTime<Utc>) -> (i64, i64) {
    (timestamp.timestamp(), i64::from(timestamp.timestamp_subsec_nanos()))
}

fn decode_timestamp(secs: Option<i64>, nanos: Option<i64>) -> Result<DateTime<Utc>, StorageError> {
    let (Some(secs), Some(nanos)) = (secs, nanos) else {
        return Err(StorageError::Malformed("snapshot has no timestamp".to_string()));
    };
    u32::try_from(nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
        .ok_or_else(|| StorageError::Malformed(format!("invalid snapshot timestamp {secs}s + {nanos}ns")))
}

/// Column type mismatches mean the stored data is not ours to read.
fn row_error(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::InvalidColumnType(index, name, ty) => {
            StorageError::Malformed(format!("column {index} ({name}) has unexpected type {ty}"))
        }
        rusqlite::Error::FromSqlConversionFailure(index, ty, e) => {
            StorageError::Malformed(format!("column {index} ({ty}) could not be converted: {e}"))
        }
        other => other.into(),
    }
}

/// Read the current snapshot inside one read transaction.
///
/// Never writes, including when the stored data turns out to be malformed.
pub(crate) async fn load(conn: &Connection) -> Result<CacheResult, StorageError> {
    conn.call(|conn| -> Result<CacheResult, StorageError> {
        let tx = conn.transaction()?;

        let timestamp = match tx.query_row(
            "SELECT timestamp_secs, timestamp_nanos FROM feed_cache WHERE id = ?1",
            params![SNAPSHOT_ID],
            |row| Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, Option<i64>>(1)?)),
        ) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(CacheResult::Empty),
            Err(e) => return Err(row_error(e)),
        };

        let rows = {
            let mut stmt = tx.prepare(
                "SELECT id, description, location, url
                FROM feed_images WHERE cache_id = ?1 ORDER BY position ASC",
            )?;
            let rows = stmt.query_map(params![SNAPSHOT_ID], |row| {
                Ok(ImageRow { id: row.get(0)?, description: row.get(1)?, location: row.get(2)?, url: row.get(3)? })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(row_error)?
        };
        tx.commit()?;

        let timestamp = decode_timestamp(timestamp.0, timestamp.1)?;
        let feed = rows.into_iter().map(FeedImage::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(CacheResult::Found { feed, timestamp })
    })
    .await
    .map_err(StorageError::from)
}

/// Replace any existing snapshot with `feed` in a single transaction.
///
/// Rows are staged before the transaction starts; on any failure the
/// transaction rolls back and the previous snapshot stays in place.
pub(crate) async fn replace(
    conn: &Connection, feed: Vec<FeedImage>, timestamp: DateTime<Utc>,
) -> Result<(), StorageError> {
    let rows: Vec<ImageRow> = feed.iter().map(ImageRow::from).collect();
    let (secs, nanos) = encode_timestamp(&timestamp);

    conn.call(move |conn| -> Result<(), StorageError> {
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM feed_images", [])?;
        tx.execute("DELETE FROM feed_cache", [])?;
        tx.execute(
            "INSERT INTO feed_cache (id, timestamp_secs, timestamp_nanos) VALUES (?1, ?2, ?3)",
            params![SNAPSHOT_ID, secs, nanos],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO feed_images (cache_id, position, id, description, location, url)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, row) in rows.iter().enumerate() {
                stmt.execute(params![SNAPSHOT_ID, position as i64, row.id, row.description, row.location, row.url])?;
            }
        }

        tx.commit()?;
        Ok(())
    })
    .await
    .map_err(StorageError::from)
}

/// Remove the snapshot, if any, in a single transaction.
pub(crate) async fn clear(conn: &Connection) -> Result<(), StorageError> {
    conn.call(|conn| -> Result<(), StorageError> {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM feed_images", [])?;
        tx.execute("DELETE FROM feed_cache", [])?;
        tx.commit()?;
        Ok(())
    })
    .await
    .map_err(StorageError::from)
}
