//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Item, User};
use crate::repository::Resource;

/// Validate that no two records in a collection share an id
pub fn assert_unique_ids<R: Resource>(records: &[R]) {
    if cfg!(debug_assertions) {
        let mut seen = HashSet::new();
        for record in records {
            debug_assert!(
                seen.insert(record.id()),
                "{} collection has duplicate id {}",
                R::NAME,
                record.id()
            );
        }
    }
}

/// Validate that no two users share an email
pub fn assert_unique_emails(users: &[User]) {
    if cfg!(debug_assertions) {
        let mut seen = HashSet::new();
        for user in users {
            debug_assert!(
                seen.insert(user.email.as_str()),
                "User collection has duplicate email {}",
                user.email
            );
        }
    }
}

/// Validate that an item's timestamps are ordered
pub fn assert_item_invariants(item: &Item) {
    debug_assert!(
        item.updated_at >= item.created_at,
        "Item {} updated_at {} precedes created_at {}",
        item.id,
        item.updated_at,
        item.created_at
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{seed_items, seed_users};
    use chrono::Duration;

    #[test]
    fn test_seed_is_valid() {
        assert_unique_ids(&seed_users());
        assert_unique_emails(&seed_users());
        assert_unique_ids(&seed_items());
        for item in seed_items() {
            assert_item_invariants(&item);
        }
    }

    #[test]
    #[should_panic(expected = "duplicate id")]
    fn test_duplicate_ids_detected() {
        let mut items = seed_items();
        items[1].id = items[0].id.clone();
        assert_unique_ids(&items);
    }

    #[test]
    #[should_panic(expected = "duplicate email")]
    fn test_duplicate_emails_detected() {
        let mut users = seed_users();
        users[2].email = users[0].email.clone();
        assert_unique_emails(&users);
    }

    #[test]
    #[should_panic(expected = "precedes created_at")]
    fn test_backwards_timestamps_detected() {
        let mut item = seed_items().remove(0);
        item.updated_at = item.created_at - Duration::days(1);
        assert_item_invariants(&item);
    }
}
