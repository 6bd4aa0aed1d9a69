//! Thread-safe pairing of a [`DocumentStore`] with its [`PostingIndex`].
//!
//! Writers (`add`, `insert`, `rebuild`) hold the write lock. Searches check
//! staleness under a shared read lock; only a stale index sends them to the
//! upgradable lock to rebuild. The lookup then runs on an `Arc` snapshot
//! outside the lock.
//! Cloning a [`SearchEngine`] gives another handle to the same state.

use crate::index::{build, PostingIndex};
use crate::query::{self, SearchHit};
use crate::store::{Document, DocumentStore, DuplicateIdError, IdSpaceExhausted};
use crate::DocId;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;

#[derive(Debug, Default)]
struct EngineState {
    store: DocumentStore,
    index: Arc<PostingIndex>,
}

impl EngineState {
    fn rebuild(&mut self) -> Arc<PostingIndex> {
        self.index = Arc::new(build(&self.store));
        Arc::clone(&self.index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    state: Arc<RwLock<EngineState>>,
}

impl SearchEngine {
    pub fn new() -> Self { Self::default() }

    /// Add a document with a caller-chosen id. Does not touch the index.
    pub fn add(&self, document: Document) -> Result<(), DuplicateIdError> {
        self.state.write().store.add(document)
    }

    /// Add a document under a store-assigned id.
    pub fn insert(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<DocId, IdSpaceExhausted> {
        self.state.write().store.insert(name, content)
    }

    /// Rebuild the index from the current store contents.
    pub fn rebuild(&self) -> Arc<PostingIndex> {
        self.state.write().rebuild()
    }

    /// The current index, which may be stale.
    pub fn snapshot(&self) -> Arc<PostingIndex> {
        Arc::clone(&self.state.read().index)
    }

    pub fn is_stale(&self) -> bool {
        let state = self.state.read();
        state.index.is_stale(&state.store)
    }

    pub fn len(&self) -> usize { self.state.read().store.len() }

    pub fn is_empty(&self) -> bool { self.state.read().store.is_empty() }

    /// Copy of every stored document, in insertion order.
    pub fn documents(&self) -> Vec<Document> {
        self.state.read().store.all().cloned().collect()
    }

    /// Search against an index that reflects every document added so far.
    pub fn search(&self, raw_query: &str) -> Vec<SearchHit> {
        let index = self.fresh_index();
        query::search(&index, raw_query)
    }

    pub fn search_each(&self, raw_query: &str) -> Vec<(String, Vec<SearchHit>)> {
        let index = self.fresh_index();
        query::search_each(&index, raw_query)
    }

    fn fresh_index(&self) -> Arc<PostingIndex> {
        {
            let state = self.state.read();
            if !state.index.is_stale(&state.store) {
                return Arc::clone(&state.index);
            }
        }
        // another searcher may have rebuilt while we waited
        let state = self.state.upgradable_read();
        if !state.index.is_stale(&state.store) {
            return Arc::clone(&state.index);
        }
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        tracing::debug!(store_version = state.store.version(), "index stale, rebuilding before search");
        state.rebuild()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn search_rebuilds_when_stale() {
        let engine = SearchEngine::new();
        engine.add(Document::new(1, "doc1.txt", "Hello world hello security")).unwrap();
        assert!(engine.is_stale());
        assert_eq!(engine.search("hello"), vec![SearchHit { doc_id: 1, frequency: 2 }]);
        assert!(!engine.is_stale());

        engine.add(Document::new(2, "doc2.txt", "hello")).unwrap();
        assert_eq!(engine.search("hello").len(), 2);
    }

    #[test]
    fn search_each_rebuilds_when_stale() {
        let engine = SearchEngine::new();
        engine.add(Document::new(1, "doc1.txt", "Hello world hello security")).unwrap();
        engine.rebuild();
        engine.add(Document::new(2, "doc2.txt", "Security is important in the modern world")).unwrap();
        assert!(engine.is_stale());

        let results = engine.search_each("security missing");
        assert!(!engine.is_stale());
        assert_eq!(results[0].0, "security");
        assert_eq!(
            results[0].1,
            vec![SearchHit { doc_id: 1, frequency: 1 }, SearchHit { doc_id: 2, frequency: 1 }]
        );
        assert_eq!(results[1], ("missing".to_string(), Vec::new()));
    }

    #[test]
    fn fresh_index_is_shared_not_rebuilt() {
        let engine = SearchEngine::new();
        engine.insert("a", "rust").unwrap();
        let first = engine.rebuild();
        engine.search("rust");
        engine.search("rust");
        assert!(Arc::ptr_eq(&first, &engine.snapshot()));
    }

    #[test]
    fn fresh_search_does_not_wait_on_upgradable_holder() {
        let engine = SearchEngine::new();
        engine.insert("a", "rust").unwrap();
        engine.rebuild();

        let _held = engine.state.upgradable_read();
        assert_eq!(engine.search("rust").len(), 1);
        assert_eq!(engine.search_each("rust go").len(), 2);
    }

    #[test]
    fn insert_reports_exhausted_ids() {
        let engine = SearchEngine::new();
        engine.add(Document::new(DocId::MAX, "last", "x")).unwrap();
        assert_eq!(engine.insert("next", "y"), Err(IdSpaceExhausted { max_id: DocId::MAX }));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn snapshot_stays_stale_until_rebuild() {
        let engine = SearchEngine::new();
        engine.insert("a", "rust").unwrap();
        let before = engine.rebuild();
        engine.insert("b", "rust").unwrap();

        assert_eq!(query::search(&engine.snapshot(), "rust").len(), 1);
        assert_eq!(query::search(&before, "rust").len(), 1);

        let after = engine.rebuild();
        assert_eq!(query::search(&after, "rust").len(), 2);
        // the earlier snapshot is unaffected by the rebuild
        assert_eq!(query::search(&before, "rust").len(), 1);
    }

    #[test]
    fn duplicate_add_fails_through_engine() {
        let engine = SearchEngine::new();
        engine.add(Document::new(1, "", "x")).unwrap();
        assert_eq!(engine.add(Document::new(1, "", "y")), Err(DuplicateIdError { id: 1 }));
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.documents()[0].content, "x");
    }

    #[test]
    fn concurrent_readers_share_one_index() {
        let engine = SearchEngine::new();
        for i in 0..50 {
            engine.insert(format!("doc{i}"), "shared term").unwrap();
        }
        engine.rebuild();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                thread::spawn(move || engine.search("shared").len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 50);
        }
    }

    #[test]
    fn writer_and_readers_interleave() {
        let engine = SearchEngine::new();
        let writer = {
            let engine = engine.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    engine.insert(format!("doc{i}"), "term").unwrap();
                }
            })
        };
        let reader = {
            let engine = engine.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let hits = engine.search("term");
                    assert!(hits.len() <= 100);
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(engine.search("term").len(), 100);
    }
}
