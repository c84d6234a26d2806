//! Item model

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Categories offered by the item form. Any other text is accepted as-is.
pub const ITEM_CATEGORIES: &[&str] = &["Development", "Marketing", "Design", "Security", "Operations"];

pub const DEFAULT_CATEGORY: &str = "Development";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Pending => "pending",
            ItemStatus::Inactive => "inactive",
        }
    }

    pub fn all() -> &'static [ItemStatus] {
        &[ItemStatus::Active, ItemStatus::Pending, ItemStatus::Inactive]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidValue {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::all()
            .iter()
            .copied()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidValue {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// A managed work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ItemStatus,
    pub priority: Priority,
    pub tags: Vec<String>,
    /// User id of the author; not checked against the user collection
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a record from a draft with `updated_at == created_at`.
    pub fn from_draft(id: String, draft: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: draft.status,
            priority: draft.priority,
            tags: draft.tags,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shallow merge of the patch; `updated_at` is always refreshed.
    pub fn apply_patch(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(created_by) = patch.created_by {
            self.created_by = created_by;
        }
        // Clock skew must not move updated_at backwards.
        self.updated_at = now.max(self.updated_at);
    }
}

/// Fields supplied when creating an item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ItemStatus,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub created_by: String,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            status: ItemStatus::default(),
            priority: Priority::default(),
            tags: Vec::new(),
            created_by: String::new(),
        }
    }
}

/// Partial update for an item; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub created_by: Option<String>,
}

/// Exact-match filters for listing items
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub created_by: Option<String>,
}

/// Split a comma separated tag list, dropping blanks
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
