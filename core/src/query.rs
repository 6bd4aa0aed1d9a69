//! Single-term lookups against a built [`PostingIndex`].
//!
//! Results come back in the order the matching documents were added to the
//! store. Nothing here sorts by frequency unless the caller asks for it with
//! [`rank_by_frequency`].

use crate::index::PostingIndex;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub frequency: u32,
}

/// Look up the first normalized term of `raw_query`.
///
/// A query with no letters, or a term the index has never seen, gives an
/// empty result. Any further words in the query are ignored; see
/// [`search_each`] for per-word lookups.
pub fn search(index: &PostingIndex, raw_query: &str) -> Vec<SearchHit> {
    match query_term(raw_query) {
        Some(term) => lookup(index, &term),
        None => Vec::new(),
    }
}

/// The normalized term [`search`] looks up for `raw_query`, if any.
pub fn query_term(raw_query: &str) -> Option<String> {
    tokenize(raw_query).next()
}

/// Run an isolated lookup for every normalized term of `raw_query`, in query
/// order. Results are not combined.
pub fn search_each(index: &PostingIndex, raw_query: &str) -> Vec<(String, Vec<SearchHit>)> {
    tokenize(raw_query)
        .map(|term| {
            let hits = lookup(index, &term);
            (term, hits)
        })
        .collect()
}

/// Reorder hits by descending frequency. Ties keep their incoming order.
pub fn rank_by_frequency(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    hits
}

fn lookup(index: &PostingIndex, term: &str) -> Vec<SearchHit> {
    index
        .postings(term)
        .iter()
        .map(|p| SearchHit { doc_id: p.doc_id, frequency: p.frequency })
        .collect()
}
