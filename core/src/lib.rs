pub mod engine;
pub mod index;
pub mod query;
pub mod store;
pub mod tokenizer;

pub type DocId = u32;

pub use engine::SearchEngine;
pub use index::{build, PostingEntry, PostingIndex};
pub use query::{query_term, rank_by_frequency, search, search_each, SearchHit};
pub use store::{Document, DocumentStore, DuplicateIdError, IdSpaceExhausted};
pub use tokenizer::{normalize, tokenize, Tokens};
