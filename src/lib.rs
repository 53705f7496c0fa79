//! Translation memory toolkit for profile record corpora.
//!
//! The toolkit maintains a reusable, human-reviewable translation memory for
//! a directory of JSON profile records and applies it, with a
//! machine-translation fallback, to rewrite string fields from a source
//! language to a target language.
//!
//! # Lifecycle
//!
//! - `aggregate`: collect unique profile values with occurrence counts
//! - `memory`: the persisted `field -> value -> {count, translation}` map,
//!   with load/overlay/persist discipline
//! - `review`: extract the untranslated slice for human editing
//! - `merge`: fold edited translations back in without clobbering the rest
//! - `apply`: rewrite the corpus, memory lookup first, translator on miss

pub mod aggregate;
pub mod apply;
pub mod config;
pub mod corpus;
pub mod memory;
pub mod merge;
pub mod retry;
pub mod review;
pub mod translator;
