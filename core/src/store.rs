use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::slice;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// Display label only; not indexed and not required to be unique.
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(id: DocId, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id, name: name.into(), content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("document id {id} already exists in the store")]
pub struct DuplicateIdError {
    pub id: DocId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no document id left to assign after {max_id}")]
pub struct IdSpaceExhausted {
    pub max_id: DocId,
}

/// Append-only collection of documents, kept in insertion order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    ids: HashSet<DocId>,
    max_id: DocId,
    version: u64,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Store `document`, rejecting it if its id is already taken.
    ///
    /// On error the store is left exactly as it was.
    pub fn add(&mut self, document: Document) -> Result<(), DuplicateIdError> {
        if self.ids.contains(&document.id) {
            return Err(DuplicateIdError { id: document.id });
        }
        self.push(document);
        Ok(())
    }

    /// Store a new document under the next free id (one past the largest id
    /// seen so far, starting at 1) and return that id.
    ///
    /// Fails without touching the store once `DocId::MAX` has been used.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<DocId, IdSpaceExhausted> {
        let id = self.max_id.checked_add(1).ok_or(IdSpaceExhausted { max_id: self.max_id })?;
        self.push(Document::new(id, name, content));
        Ok(id)
    }

    fn push(&mut self, document: Document) {
        self.ids.insert(document.id);
        self.max_id = self.max_id.max(document.id);
        self.docs.push(document);
        self.version += 1;
    }

    /// All documents in insertion order. Cloning the iterator restarts it.
    pub fn all(&self) -> slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    /// Bumped on every successful `add`; a posting index built at an older
    /// version is stale.
    pub fn version(&self) -> u64 { self.version }
}
