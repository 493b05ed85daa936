//! Table layout of the verse store and the SQL helpers installed on each connection.

use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Error};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// `seq` is the internal enumeration order and is never exposed; `id` is the public identifier.
const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS verses (
        seq             INTEGER PRIMARY KEY,
        id              TEXT    NOT NULL UNIQUE,
        sloka           TEXT    NOT NULL CHECK (length(sloka) BETWEEN 1 AND 1000),
        transliteration TEXT    CHECK (transliteration IS NULL OR length(transliteration) <= 1000),
        translation     TEXT    CHECK (translation IS NULL OR length(translation) <= 2000),
        source          TEXT    CHECK (source IS NULL OR length(source) <= 200),
        created_at      TEXT    NOT NULL,
        updated_at      TEXT    NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_verses_source ON verses (source);
    CREATE VIRTUAL TABLE IF NOT EXISTS verses_fts USING fts5 (
        sloka, translation, source,
        content = 'verses',
        content_rowid = 'seq'
    );
";

/// Creates the table and its indexes if they do not exist yet.
pub fn ensure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SCHEMA)
}

/// Rebuilds the full-text index from the `verses` table and refreshes the b-tree indexes.
pub fn rebuild_indexes(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "INSERT INTO verses_fts (verses_fts) VALUES ('rebuild');
         REINDEX verses;",
    )
}

/// Registers `regexp(pattern, text)` so `text REGEXP pattern` works in queries.
///
/// The compiled pattern is cached per statement through SQLite's auxiliary data,
/// so a search compiles its pattern once rather than once per row. NULL text never matches.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            if ctx.len() != 2 {
                return Err(Error::UserFunctionError(
                    "regexp() takes exactly two arguments".into(),
                ));
            }
            let re: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
                Ok(Regex::new(vr.as_str()?)?)
            })?;
            let text = ctx
                .get_raw(1)
                .as_str_or_null()
                .map_err(|e| Error::UserFunctionError(e.into()))?;
            Ok(text.is_some_and(|t| re.is_match(t)))
        },
    )
}
