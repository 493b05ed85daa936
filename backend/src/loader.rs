//! # Bulk Loader
//!
//! Replaces the whole verse collection with the contents of a JSON dataset.
//! The file is a single array of `{sloka, transliteration?, translation?, source?}`
//! objects. Elements that are not of that shape, or that fail validation, are
//! reported and skipped; the rest are loaded in file order. Only a file that is not
//! a JSON array fails as a whole.
//!
//! When the store already holds verses, the operator must confirm the wipe unless
//! the caller opted out of the prompt. The loader is not meant to run concurrently
//! with itself.

use common::model::verse::{NewVerse, VerseError};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::Path;
use thiserror::Error;

use crate::store::{LoadReport, Store, StoreError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("malformed element: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] VerseError),
}

/// A dataset element that was dropped before loading.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejected {
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug)]
pub struct Dataset {
    pub verses: Vec<NewVerse>,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Loaded(LoadReport),
    Cancelled,
}

/// Parses and normalises a dataset.
pub fn parse_dataset(json: &str) -> Result<Dataset, LoadError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut verses = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for (index, element) in raw.into_iter().enumerate() {
        match parse_element(element) {
            Ok(v) => verses.push(v),
            Err(reason) => rejected.push(Rejected { index, reason }),
        }
    }
    Ok(Dataset { verses, rejected })
}

fn parse_element(element: serde_json::Value) -> Result<NewVerse, RejectReason> {
    let verse: NewVerse = serde_json::from_value(element)
        .map_err(|e| RejectReason::Malformed(e.to_string()))?;
    Ok(verse.normalize()?)
}

pub fn read_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_dataset(&json)
}

/// Asks the operator to confirm deleting `existing` verses. Only `y` or `yes` confirms.
pub fn confirm_wipe<R: BufRead, W: Write>(
    existing: u64,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    write!(
        output,
        "The database already contains {} verses. Delete them and reload? [y/N]: ",
        existing
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Loads `dataset` into `store`, prompting through `input`/`output` when the store is
/// not empty and `skip_confirm` is false.
pub async fn run<R: BufRead, W: Write>(
    store: &Store,
    dataset: Dataset,
    skip_confirm: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, LoadError> {
    for r in &dataset.rejected {
        warn!("Skipping dataset element #{}: {}", r.index, r.reason);
    }

    let existing = store.count().await?;
    let confirmed = existing == 0
        || skip_confirm
        || confirm_wipe(existing, input, output).map_err(LoadError::Prompt)?;
    if !confirmed {
        info!("Reseed cancelled; {} verses left untouched", existing);
        return Ok(Outcome::Cancelled);
    }

    let report = store.replace_all(dataset.verses).await?;
    info!(
        "Removed {} verses, inserted {}, rejected {}",
        report.removed, report.inserted, report.rejected
    );
    Ok(Outcome::Loaded(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreSettings;
    use std::io::Cursor;

    const DATASET: &str = r#"[
        {"sloka": "A", "source": "Gita"},
        {"sloka": "   "},
        {"sloka": "B", "translation": " t "}
    ]"#;

    #[test]
    fn invalid_elements_are_set_aside() {
        let dataset = parse_dataset(DATASET).unwrap();
        assert_eq!(dataset.verses.len(), 2);
        assert_eq!(dataset.verses[1].translation.as_deref(), Some("t"));
        assert_eq!(
            dataset.rejected,
            vec![Rejected {
                index: 1,
                reason: RejectReason::Invalid(VerseError::MissingSloka)
            }]
        );
    }

    #[test]
    fn non_array_file_is_an_error() {
        assert!(matches!(parse_dataset("{\"sloka\": 1}"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_dataset("[{\"sloka\": \"A\"}"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn malformed_elements_do_not_abort_the_batch() {
        let dataset =
            parse_dataset(r#"[{"sloka":"A"},{"translation":"x"},{"sloka":"B"},{"sloka":42}]"#)
                .unwrap();
        let slokas: Vec<&str> = dataset.verses.iter().map(|v| v.sloka.as_str()).collect();
        assert_eq!(slokas, vec!["A", "B"]);
        let indexes: Vec<usize> = dataset.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 3]);
        assert!(dataset
            .rejected
            .iter()
            .all(|r| matches!(r.reason, RejectReason::Malformed(_))));
    }

    #[actix_web::test]
    async fn partial_dataset_loads_valid_elements() {
        let store = Store::new(StoreSettings::in_memory());
        let dataset = parse_dataset(r#"[{"sloka":"A"},{"translation":"x"},{"sloka":"B"}]"#).unwrap();
        assert_eq!(dataset.rejected.len(), 1);
        let outcome = run(&store, dataset, true, &mut Cursor::new(""), &mut Vec::<u8>::new())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Loaded(LoadReport { inserted: 2, .. })));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[test]
    fn confirmation_answers() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut out: Vec<u8> = Vec::new();
            let confirmed = confirm_wipe(3, &mut Cursor::new(answer), &mut out).unwrap();
            assert_eq!(confirmed, expected, "{answer:?}");
            assert!(String::from_utf8(out).unwrap().contains("3 verses"));
        }
    }

    #[actix_web::test]
    async fn empty_store_loads_without_prompt() {
        let store = Store::new(StoreSettings::in_memory());
        let mut out: Vec<u8> = Vec::new();
        let outcome = run(
            &store,
            parse_dataset(DATASET).unwrap(),
            false,
            &mut Cursor::new(""),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(
            outcome,
            Outcome::Loaded(LoadReport {
                removed: 0,
                inserted: 2,
                rejected: 0
            })
        );
        assert!(out.is_empty());
    }

    #[actix_web::test]
    async fn declined_prompt_keeps_existing_verses() {
        let store = Store::new(StoreSettings::in_memory());
        store
            .replace_all(parse_dataset(DATASET).unwrap().verses)
            .await
            .unwrap();

        let dataset = parse_dataset(r#"[{"sloka": "C"}]"#).unwrap();
        let outcome = run(&store, dataset, false, &mut Cursor::new("no\n"), &mut Vec::<u8>::new())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[actix_web::test]
    async fn confirmed_prompt_replaces_collection() {
        let store = Store::new(StoreSettings::in_memory());
        store
            .replace_all(parse_dataset(DATASET).unwrap().verses)
            .await
            .unwrap();

        let dataset = parse_dataset(r#"[{"sloka": "C"}]"#).unwrap();
        let outcome = run(&store, dataset, false, &mut Cursor::new("y\n"), &mut Vec::<u8>::new())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Loaded(LoadReport { removed: 2, inserted: 1, .. })));
        assert_eq!(store.find_at_offset(0).await.unwrap().unwrap().sloka, "C");
    }

    #[test]
    fn reads_dataset_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verses.json");
        std::fs::write(&path, DATASET).unwrap();
        assert_eq!(read_dataset(&path).unwrap().verses.len(), 2);
        assert!(matches!(
            read_dataset(&dir.path().join("missing.json")),
            Err(LoadError::Read { .. })
        ));
    }
}
