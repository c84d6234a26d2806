//! Resource trait
//!
//! Describes what the generic repository needs to know about a record type:
//! how to build it, patch it, filter it and search it.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::invariants;

/// A record type managed by a [`Repository`](super::Repository)
pub trait Resource: Clone + Send + Sync + 'static {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Fields supplied on create
    type Draft: Send;

    /// Partial update; immutable fields are not representable
    type Patch: Send;

    /// Exact-match list filters
    type Filter: Send + Sync;

    fn id(&self) -> &str;

    /// Build a new record with a fresh id and creation time
    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merge a patch into the record
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// True when every set field of the filter matches exactly
    fn matches_filter(&self, filter: &Self::Filter) -> bool;

    /// Case-insensitive substring match; `needle` is already lowercased
    fn matches_search(&self, needle: &str) -> bool;

    /// Reject `candidate` if it collides with any of `others` on a unique key
    fn check_unique(_candidate: &Self, _others: &[&Self]) -> Result<()> {
        Ok(())
    }

    /// Debug-only consistency checks over the whole collection
    fn assert_invariants(records: &[Self]) {
        invariants::assert_unique_ids(records);
    }
}
