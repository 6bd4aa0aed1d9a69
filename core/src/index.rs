use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingEntry {
    pub doc_id: DocId,
    pub frequency: u32, // always >= 1
}

/// Term → postings, built in one pass over a [`DocumentStore`].
///
/// Never mutated after [`build`] returns, so a finished index can be shared
/// across threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct PostingIndex {
    postings: HashMap<String, Vec<PostingEntry>>, // each list in store insertion order
    num_docs: u32,
    store_version: u64,
}

impl PostingIndex {
    pub fn new() -> Self { Self::default() }

    /// Postings for an already-normalized term, in store insertion order.
    pub fn postings(&self, term: &str) -> &[PostingEntry] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    /// Every `(term, posting)` pair. Term order is unspecified.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PostingEntry)> + '_ {
        self.postings
            .iter()
            .flat_map(|(term, list)| list.iter().map(move |p| (term.as_str(), p)))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    /// Store version this index was built from.
    pub fn store_version(&self) -> u64 { self.store_version }

    /// True when `store` has accepted documents since this index was built.
    pub fn is_stale(&self, store: &DocumentStore) -> bool {
        self.store_version != store.version()
    }
}

/// Build a fresh index over every document currently in `store`.
///
/// Counts are aggregated per document in a term-keyed map, then appended to
/// each term's list, so a list holds at most one entry per document.
pub fn build(store: &DocumentStore) -> PostingIndex {
    let mut postings: HashMap<String, Vec<PostingEntry>> = HashMap::new();
    let mut num_docs: u32 = 0;

    for doc in store.all() {
        num_docs += 1;
        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(&doc.content) {
            *tf_counts.entry(term).or_insert(0) += 1;
        }
        for (term, frequency) in tf_counts {
            postings.entry(term).or_default().push(PostingEntry { doc_id: doc.id, frequency });
        }
    }

    tracing::debug!(num_docs, num_terms = postings.len(), store_version = store.version(), "built posting index");
    PostingIndex { postings, num_docs, store_version: store.version() }
}
