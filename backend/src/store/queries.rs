//! Synchronous queries over the `verses` table.
//!
//! Every function takes a borrowed connection and is meant to run inside
//! `spawn_blocking`; see [`super::Store`] for the async facade.

use chrono::Utc;
use common::model::verse::{NewVerse, VerseRecord};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::schema;

const COLUMNS: &str = "id, sloka, transliteration, translation, source, created_at, updated_at";

/// Outcome of replacing the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub removed: usize,
    pub inserted: usize,
    pub rejected: usize,
}

fn to_record(row: &Row<'_>) -> rusqlite::Result<VerseRecord> {
    Ok(VerseRecord {
        id: row.get(0)?,
        sloka: row.get(1)?,
        transliteration: row.get(2)?,
        translation: row.get(3)?,
        source: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn count(conn: &Connection) -> rusqlite::Result<u64> {
    let total: i64 = conn.query_row("SELECT count(*) FROM verses", [], |row| row.get(0))?;
    Ok(u64::try_from(total).unwrap_or(0))
}

pub fn find_by_id(conn: &Connection, id: &Uuid) -> rusqlite::Result<Option<VerseRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM verses WHERE id = ?1"),
        params![id.to_string()],
        to_record,
    )
    .optional()
}

pub fn find_at_offset(conn: &Connection, offset: u64) -> rusqlite::Result<Option<VerseRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM verses ORDER BY seq LIMIT 1 OFFSET ?1"),
        params![to_sql_int(offset)],
        to_record,
    )
    .optional()
}

pub fn find_page(conn: &Connection, skip: u64, take: u64) -> rusqlite::Result<Vec<VerseRecord>> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {COLUMNS} FROM verses ORDER BY seq LIMIT ?1 OFFSET ?2"))?;
    let rows = stmt.query_map(params![to_sql_int(take), to_sql_int(skip)], to_record)?;
    rows.collect()
}

/// Matches `pattern` (already a valid, escaped regular expression) against `source`.
pub fn find_by_source_pattern(
    conn: &Connection,
    pattern: &str,
    limit: u64,
) -> rusqlite::Result<Vec<VerseRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM verses WHERE source REGEXP ?1 ORDER BY seq LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![pattern, to_sql_int(limit)], to_record)?;
    rows.collect()
}

pub fn ping(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map(|_| ())
}

/// Deletes every verse and inserts `verses` in order, in a single transaction.
///
/// A verse rejected by a table constraint is skipped and counted instead of
/// aborting the batch. Indexes are rebuilt once the transaction commits.
pub fn replace_all(conn: &mut Connection, verses: &[NewVerse]) -> rusqlite::Result<LoadReport> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM verses", [])?;

    let mut report = LoadReport {
        removed,
        ..LoadReport::default()
    };
    {
        let mut stmt = tx.prepare(
            "INSERT INTO verses (id, sloka, transliteration, translation, source, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )?;
        for (index, verse) in verses.iter().enumerate() {
            let inserted = stmt.execute(params![
                Uuid::new_v4().to_string(),
                verse.sloka,
                verse.transliteration,
                verse.translation,
                verse.source,
                Utc::now(),
            ]);
            match inserted {
                Ok(_) => report.inserted += 1,
                Err(rusqlite::Error::SqliteFailure(e, msg))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    warn!(
                        "Skipping verse #{}: {}",
                        index,
                        msg.unwrap_or_else(|| e.to_string())
                    );
                    report.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
    tx.commit()?;

    schema::rebuild_indexes(conn)?;
    Ok(report)
}

/// SQLite integers are signed; offsets beyond `i64::MAX` simply match nothing.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::register_functions(&conn).unwrap();
        schema::ensure(&conn).unwrap();
        conn
    }

    fn verse(sloka: &str, source: Option<&str>) -> NewVerse {
        NewVerse {
            sloka: sloka.to_string(),
            transliteration: None,
            translation: None,
            source: source.map(str::to_string),
        }
    }

    fn seeded(verses: &[NewVerse]) -> Connection {
        let mut conn = connection();
        replace_all(&mut conn, verses).unwrap();
        conn
    }

    #[test]
    fn offset_follows_insertion_order() {
        let conn = seeded(&[verse("A", None), verse("B", None), verse("C", None)]);
        assert_eq!(count(&conn).unwrap(), 3);
        assert_eq!(find_at_offset(&conn, 0).unwrap().unwrap().sloka, "A");
        assert_eq!(find_at_offset(&conn, 2).unwrap().unwrap().sloka, "C");
        assert!(find_at_offset(&conn, 3).unwrap().is_none());
    }

    #[test]
    fn empty_store() {
        let conn = connection();
        assert_eq!(count(&conn).unwrap(), 0);
        assert!(find_at_offset(&conn, 0).unwrap().is_none());
        assert!(find_page(&conn, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn pages_cover_collection_without_gaps() {
        let verses: Vec<NewVerse> = (0..7).map(|i| verse(&format!("V{i}"), None)).collect();
        let conn = seeded(&verses);

        let mut seen = Vec::new();
        for skip in (0..7).step_by(3) {
            seen.extend(find_page(&conn, skip, 3).unwrap().into_iter().map(|v| v.sloka));
        }
        let expected: Vec<String> = (0..7).map(|i| format!("V{i}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn lookup_by_id() {
        let conn = seeded(&[verse("A", None)]);
        let record = find_at_offset(&conn, 0).unwrap().unwrap();
        let id = Uuid::parse_str(&record.id).unwrap();
        assert_eq!(find_by_id(&conn, &id).unwrap(), Some(record));
        assert!(find_by_id(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn replace_all_clears_previous_records() {
        let mut conn = seeded(&[verse("A", None), verse("B", None)]);
        let report = replace_all(&mut conn, &[verse("C", None)]).unwrap();
        assert_eq!(
            report,
            LoadReport {
                removed: 2,
                inserted: 1,
                rejected: 0
            }
        );
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn constraint_violations_are_skipped() {
        let mut conn = connection();
        let report = replace_all(
            &mut conn,
            &[verse("A", None), verse("", None), verse(&"x".repeat(1001), None), verse("B", None)],
        )
        .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.rejected, 2);
        assert_eq!(find_at_offset(&conn, 1).unwrap().unwrap().sloka, "B");
    }

    #[test]
    fn source_pattern_search_respects_limit() {
        let verses: Vec<NewVerse> = (0..5)
            .map(|i| verse(&format!("V{i}"), Some("Bhagavad Gita")))
            .chain([verse("U", Some("Isha Upanishad")), verse("N", None)])
            .collect();
        let conn = seeded(&verses);

        assert_eq!(find_by_source_pattern(&conn, "(?i)gita", 50).unwrap().len(), 5);
        assert_eq!(find_by_source_pattern(&conn, "(?i)gita", 2).unwrap().len(), 2);
        assert_eq!(find_by_source_pattern(&conn, "(?i)upanishad", 50).unwrap()[0].sloka, "U");
    }

    #[test]
    fn timestamps_are_store_assigned() {
        let before = Utc::now();
        let conn = seeded(&[verse("A", None)]);
        let record = find_at_offset(&conn, 0).unwrap().unwrap();
        assert!(record.created_at >= before - chrono::Duration::seconds(1));
        assert_eq!(record.created_at, record.updated_at);
    }
}
