//! Searchable records, facets, and the read-only corpus.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sentinel facet label that matches every record.
pub const ALL_FACET: &str = "all";

/// A single immutable searchable record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub content: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
}

/// Category filter applied on top of the text predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Facet {
    #[default]
    All,
    Category(String),
}

impl Facet {
    pub fn label(&self) -> &str {
        match self {
            Facet::All => ALL_FACET,
            Facet::Category(name) => name,
        }
    }

    /// Whether a record passes this facet.
    pub fn admits(&self, record: &Record) -> bool {
        match self {
            Facet::All => true,
            Facet::Category(name) => record.category == *name,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("duplicate record id {0}")]
    DuplicateId(u64),

    #[error("failed to read corpus at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse corpus at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown facet `{0}`")]
    UnknownFacet(String),

    #[error("record {0} has an invalid date")]
    InvalidDate(u64),
}

/// Fixed collection of records, held in supply order.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Record>,
    categories: Vec<String>,
}

impl Corpus {
    pub fn new(records: Vec<Record>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut categories: Vec<String> = Vec::new();
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CorpusError::DuplicateId(record.id));
            }
            if !categories.iter().any(|c| c == &record.category) {
                categories.push(record.category.clone());
            }
        }
        Ok(Self {
            records,
            categories,
        })
    }

    /// Load a JSON array of records.
    pub fn from_json_file(path: &Path) -> Result<Self, CorpusError> {
        let body = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_str(&body).map_err(|source| CorpusError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(records)
    }

    /// The built-in record set shipped with the binary.
    pub fn sample() -> Result<Self, CorpusError> {
        let rows: [(u64, &str, &str, &str, (i32, u32, u32)); 8] = [
            (
                1,
                "React入門ガイド",
                "プログラミング",
                "Reactの基本的な使い方を学ぶための完全ガイド",
                (2024, 1, 15),
            ),
            (
                2,
                "TypeScript実践編",
                "プログラミング",
                "TypeScriptを使った実践的な開発手法",
                (2024, 2, 20),
            ),
            (
                3,
                "デザインシステム構築",
                "デザイン",
                "コンポーネントベースのデザインシステムの作り方",
                (2024, 3, 10),
            ),
            (
                4,
                "UI/UXベストプラクティス",
                "デザイン",
                "ユーザー体験を向上させるための設計原則",
                (2024, 1, 25),
            ),
            (
                5,
                "APIセキュリティ入門",
                "セキュリティ",
                "Web APIのセキュリティ対策について",
                (2024, 3, 5),
            ),
            (
                6,
                "パフォーマンス最適化",
                "プログラミング",
                "Webアプリケーションの高速化テクニック",
                (2024, 2, 15),
            ),
            (
                7,
                "モバイルファースト設計",
                "デザイン",
                "モバイルデバイスを優先したWeb設計",
                (2024, 3, 20),
            ),
            (
                8,
                "データベース設計基礎",
                "データベース",
                "RDBMSの基本的な設計パターン",
                (2024, 1, 30),
            ),
        ];
        let records = rows
            .into_iter()
            .map(|(id, title, category, content, (y, m, d))| {
                let date = NaiveDate::from_ymd_opt(y, m, d).ok_or(CorpusError::InvalidDate(id))?;
                Ok(Record {
                    id,
                    title: title.into(),
                    category: category.into(),
                    content: content.into(),
                    date,
                })
            })
            .collect::<Result<Vec<_>, CorpusError>>()?;
        Self::new(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Every selectable facet, sentinel first.
    pub fn facets(&self) -> Vec<Facet> {
        std::iter::once(Facet::All)
            .chain(self.categories.iter().cloned().map(Facet::Category))
            .collect()
    }

    /// Resolve user input to a facet drawn from this corpus.
    pub fn parse_facet(&self, raw: &str) -> Result<Facet, CorpusError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ALL_FACET) {
            return Ok(Facet::All);
        }
        self.categories
            .iter()
            .find(|c| c.as_str() == raw)
            .map(|c| Facet::Category(c.clone()))
            .ok_or_else(|| CorpusError::UnknownFacet(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: u64, category: &str) -> Record {
        Record {
            id,
            title: format!("title {id}"),
            category: category.into(),
            content: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn sample_corpus_has_eight_records_and_four_categories() {
        let corpus = Corpus::sample().unwrap();
        assert_eq!(corpus.len(), 8);
        assert_eq!(
            corpus.categories(),
            ["プログラミング", "デザイン", "セキュリティ", "データベース"]
        );
        assert_eq!(
            corpus.records().iter().map(|r| r.id).collect::<Vec<_>>(),
            (1..=8).collect::<Vec<_>>()
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Corpus::new(vec![record(1, "a"), record(1, "b")]).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateId(1)));
    }

    #[test]
    fn facets_start_with_sentinel_then_first_appearance_order() {
        let corpus = Corpus::new(vec![record(1, "b"), record(2, "a"), record(3, "b")]).unwrap();
        let labels: Vec<_> = corpus.facets().iter().map(|f| f.to_string()).collect();
        assert_eq!(labels, ["all", "b", "a"]);
    }

    #[test]
    fn parse_facet_only_accepts_known_categories() {
        let corpus = Corpus::sample().unwrap();
        assert_eq!(corpus.parse_facet("ALL").unwrap(), Facet::All);
        assert_eq!(
            corpus.parse_facet("デザイン").unwrap(),
            Facet::Category("デザイン".into())
        );
        assert!(matches!(
            corpus.parse_facet("music"),
            Err(CorpusError::UnknownFacet(name)) if name == "music"
        ));
    }

    #[test]
    fn json_corpus_loads_and_reports_bad_dates() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(
            &good,
            r#"[{"id":7,"title":"Rust","category":"lang","content":"ownership","date":"2024-05-01"}]"#,
        )
        .unwrap();
        let corpus = Corpus::from_json_file(&good).unwrap();
        assert_eq!(corpus.records()[0].date.to_string(), "2024-05-01");

        let bad = dir.path().join("bad.json");
        std::fs::write(
            &bad,
            r#"[{"id":7,"title":"Rust","category":"lang","content":"x","date":"May 1"}]"#,
        )
        .unwrap();
        assert!(matches!(
            Corpus::from_json_file(&bad),
            Err(CorpusError::Parse { .. })
        ));

        assert!(matches!(
            Corpus::from_json_file(&dir.path().join("missing.json")),
            Err(CorpusError::Io { .. })
        ));
    }
}
