//! Query evaluation: case-insensitive substring match plus facet filter.

use crate::model::types::{Corpus, Facet, Record};

/// Ordered view into a corpus. Holds record positions, never copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    indices: Vec<usize>,
}

impl ResultSet {
    /// Every record, in corpus order.
    pub fn all(corpus: &Corpus) -> Self {
        Self {
            indices: (0..corpus.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter<'a>(&'a self, corpus: &'a Corpus) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().filter_map(|&idx| corpus.get(idx))
    }

    pub fn ids(&self, corpus: &Corpus) -> Vec<u64> {
        self.iter(corpus).map(|r| r.id).collect()
    }
}

/// Whether `record` matches the already lower-cased query text.
fn matches_text(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(needle) || record.content.to_lowercase().contains(needle)
}

/// Filter `corpus` by text and facet. Pure; always returns.
pub fn evaluate(corpus: &Corpus, text: &str, facet: &Facet) -> ResultSet {
    let needle = text.to_lowercase();
    let indices: Vec<usize> = corpus
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| facet.admits(record) && matches_text(record, &needle))
        .map(|(idx, _)| idx)
        .collect();
    tracing::debug!(
        query = text,
        facet = facet.label(),
        hits = indices.len(),
        "evaluate"
    );
    ResultSet { indices }
}
