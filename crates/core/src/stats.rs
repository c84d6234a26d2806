//! Dashboard summary counts

use serde::Serialize;
use tracing::instrument;

use crate::config::simulate_latency;
use crate::models::ItemStatus;
use crate::repository::{ItemRepository, UserRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_items: usize,
    pub active_items: usize,
}

/// Aggregate counts across both collections
#[instrument(skip_all)]
pub async fn dashboard_stats(users: &UserRepository, items: &ItemRepository) -> DashboardStats {
    simulate_latency(items.latency().stats()).await;

    DashboardStats {
        total_users: users.len().await,
        total_items: items.len().await,
        active_items: items
            .count_where(|item| item.status == ItemStatus::Active)
            .await,
    }
}
