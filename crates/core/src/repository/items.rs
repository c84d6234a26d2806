//! Item resource

use chrono::{DateTime, Utc};

use super::Resource;
use crate::invariants;
use crate::models::{Item, ItemFilter, ItemPatch, NewItem};

impl Resource for Item {
    const NAME: &'static str = "Item";

    type Draft = NewItem;
    type Patch = ItemPatch;
    type Filter = ItemFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewItem, now: DateTime<Utc>) -> Self {
        Item::from_draft(id, draft, now)
    }

    fn apply_patch(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        Item::apply_patch(self, patch, now);
    }

    fn matches_filter(&self, filter: &ItemFilter) -> bool {
        filter
            .category
            .as_deref()
            .map_or(true, |c| c.is_empty() || self.category == c)
            && filter.status.map_or(true, |s| self.status == s)
            && filter.priority.map_or(true, |p| self.priority == p)
            && filter
                .created_by
                .as_deref()
                .map_or(true, |u| u.is_empty() || self.created_by == u)
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    fn assert_invariants(records: &[Self]) {
        invariants::assert_unique_ids(records);
        for item in records {
            invariants::assert_item_invariants(item);
        }
    }
}
