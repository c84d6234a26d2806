//! In-memory resource repositories
//!
//! A [`Repository`] owns one collection and serves list, get, create, update
//! and delete against it. Every public operation first waits out its simulated
//! latency, then runs to completion under the repository's single lock.
//! Racing writers are last-write-wins; nothing finer grained is attempted.

mod items;
mod seed;
mod traits;
mod users;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::{simulate_latency, LatencyConfig};
use crate::error::{Error, Result};
use crate::models::{Item, User};

pub use seed::{seed_items, seed_users};
pub use traits::Resource;

pub type UserRepository = Repository<User>;
pub type ItemRepository = Repository<Item>;

/// Default page size used when callers do not pick one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parameters for a list call
#[derive(Debug, Clone)]
pub struct ListQuery<F> {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    pub filter: F,
    pub search: Option<String>,
}

impl<F: Default> Default for ListQuery<F> {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl<F: Default> ListQuery<F> {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            filter: F::default(),
            search: None,
        }
    }
}

impl<F> ListQuery<F> {
    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Filtered count before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `matches` into the requested page. `page` and `page_size` below 1
    /// are treated as 1.
    pub fn paginate(matches: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = matches.len();
        let offset = (page - 1).saturating_mul(page_size);

        let items = matches.into_iter().skip(offset).take(page_size).collect();

        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// In-memory collection of one resource type
pub struct Repository<R: Resource> {
    records: RwLock<Vec<R>>,
    latency: LatencyConfig,
}

impl<R: Resource> Repository<R> {
    /// Repository pre-populated with `records`, kept in the given order
    pub fn with_records(records: Vec<R>, latency: LatencyConfig) -> Self {
        R::assert_invariants(&records);
        Self {
            records: RwLock::new(records),
            latency,
        }
    }

    pub fn latency(&self) -> &LatencyConfig {
        &self.latency
    }

    /// Filter, search, then paginate the collection
    #[instrument(skip(self, query), fields(resource = R::NAME, page = query.page, page_size = query.page_size))]
    pub async fn list(&self, query: &ListQuery<R::Filter>) -> Page<R> {
        simulate_latency(self.latency.list()).await;

        let needle = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let records = self.records.read().await;
        let matches: Vec<R> = records
            .iter()
            .filter(|r| r.matches_filter(&query.filter))
            .filter(|r| needle.as_deref().map_or(true, |n| r.matches_search(n)))
            .cloned()
            .collect();

        let page = Page::paginate(matches, query.page, query.page_size);
        debug!(total = page.total, returned = page.items.len(), "Listed records");
        page
    }

    /// Fetch one record by id
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn get(&self, id: &str) -> Result<R> {
        simulate_latency(self.latency.get()).await;

        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_found(R::NAME, id))
    }

    /// Create a record from a draft and append it
    #[instrument(skip(self, draft), fields(resource = R::NAME))]
    pub async fn create(&self, draft: R::Draft) -> Result<R> {
        simulate_latency(self.latency.write()).await;
        self.insert(draft).await
    }

    /// Merge a patch into an existing record
    #[instrument(skip(self, patch), fields(resource = R::NAME))]
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        simulate_latency(self.latency.write()).await;
        self.modify(id, |record, now| record.apply_patch(patch, now))
            .await
    }

    /// Remove a record, keeping the order of the rest
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        simulate_latency(self.latency.write()).await;
        self.remove(id).await.map(|_| ())
    }

    /// Number of records, without simulated latency
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Count records matching `predicate`, without simulated latency
    pub async fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&R) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .count()
    }

    /// Create without simulated latency. Used by callers that already paid
    /// their own delay.
    pub(crate) async fn insert(&self, draft: R::Draft) -> Result<R> {
        let mut records = self.records.write().await;

        let id = fresh_id(records.as_slice());
        let record = R::from_draft(id, draft, Utc::now());

        let others: Vec<&R> = records.iter().collect();
        R::check_unique(&record, &others)?;

        records.push(record.clone());
        R::assert_invariants(&records);

        debug!(id = record.id(), total = records.len(), "Created record");
        Ok(record)
    }

    /// Delete without simulated latency, returning the removed record
    pub(crate) async fn remove(&self, id: &str) -> Result<R> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(R::NAME, id))?;
        let removed = records.remove(index);

        debug!(id, remaining = records.len(), "Deleted record");
        Ok(removed)
    }

    /// Apply `change` to a copy of the record, check constraints, then store
    /// it. A failed check leaves the collection untouched.
    pub(crate) async fn modify<F>(&self, id: &str, change: F) -> Result<R>
    where
        F: FnOnce(&mut R, chrono::DateTime<Utc>),
    {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(R::NAME, id))?;

        let mut updated = records[index].clone();
        change(&mut updated, Utc::now());

        let others: Vec<&R> = records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, r)| r)
            .collect();
        R::check_unique(&updated, &others)?;

        records[index] = updated.clone();
        R::assert_invariants(&records);

        debug!(id, "Updated record");
        Ok(updated)
    }
}

/// A v4 UUID not already used in `records`
fn fresh_id<R: Resource>(records: &[R]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !records.iter().any(|r| r.id() == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let page = Page::paginate((0..7).collect::<Vec<_>>(), 2, 3);
        assert_eq!(page.items, vec![3, 4, 5]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let page = Page::paginate(vec![1, 2], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paginate_clamps_zero() {
        let page = Page::paginate(vec![1, 2, 3], 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_empty_collection() {
        let page = Page::<u8>::paginate(Vec::new(), 1, 10);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_pages_cover_total() {
        let data: Vec<u32> = (0..23).collect();
        for page_size in 1..=25 {
            let first = Page::paginate(data.clone(), 1, page_size);
            let sum: usize = (1..=first.total_pages)
                .map(|p| Page::paginate(data.clone(), p, page_size).items.len())
                .sum();
            assert_eq!(sum, first.total);
            assert_eq!(first.total_pages, (23 + page_size - 1) / page_size);
        }
    }
}
