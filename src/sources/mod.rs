//! Source Normalizer.
//!
//! Loads raw candidate text from files or URLs, parses each blob into address
//! entries, and merges the blobs into one deduplicated, ordered candidate list.

mod load;
mod merge;
mod parse;

pub use load::{fetch_text, load_sources, read_text_file, SourceBlob};
pub use merge::{merge_sources, CandidateSet};
pub use parse::{parse_blob, strip_comments, SourceEntry};

use crate::models::Candidate;

/// Merges loaded blobs in the order given.
pub fn normalize(blobs: &[SourceBlob]) -> Vec<Candidate> {
    merge_sources(blobs.iter().map(|b| b.entries.as_slice()))
}
