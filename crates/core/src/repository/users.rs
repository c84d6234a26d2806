//! User resource

use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{Repository, Resource};
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{NewUser, User, UserFilter, UserPatch};

impl Resource for User {
    const NAME: &'static str = "User";

    type Draft = NewUser;
    type Patch = UserPatch;
    type Filter = UserFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewUser, now: DateTime<Utc>) -> Self {
        User::from_draft(id, draft, now)
    }

    fn apply_patch(&mut self, patch: UserPatch, _now: DateTime<Utc>) {
        User::apply_patch(self, patch);
    }

    fn matches_filter(&self, filter: &UserFilter) -> bool {
        filter.role.map_or(true, |role| self.role == role)
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    fn check_unique(candidate: &Self, others: &[&Self]) -> Result<()> {
        if others.iter().any(|u| u.email == candidate.email) {
            return Err(Error::DuplicateKey {
                resource: Self::NAME,
                field: "email",
                value: candidate.email.clone(),
            });
        }
        Ok(())
    }

    fn assert_invariants(records: &[Self]) {
        invariants::assert_unique_ids(records);
        invariants::assert_unique_emails(records);
    }
}

impl Repository<User> {
    /// Look up an account by exact email, without simulated latency
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.records
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Stamp `last_login` with the current time and return the updated record
    #[instrument(skip(self))]
    pub async fn record_login(&self, id: &str) -> Result<User> {
        self.modify(id, |user, now| user.last_login = Some(now)).await
    }

    /// Put back a `last_login` value captured before [`Self::record_login`]
    #[instrument(skip(self))]
    pub(crate) async fn restore_last_login(
        &self,
        id: &str,
        last_login: Option<DateTime<Utc>>,
    ) -> Result<User> {
        self.modify(id, |user, _| user.last_login = last_login).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::models::UserRole;
    use crate::repository::{seed_users, ListQuery};

    fn repo() -> Repository<User> {
        Repository::with_records(seed_users(), LatencyConfig::zero())
    }

    fn draft(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "New Person".to_string(),
            role: UserRole::Viewer,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_search_matches_name_or_email() {
        let repo = repo();
        let page = repo
            .list(&ListQuery::default().with_search("VIEWER"))
            .await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "viewer@cloudboard.com");

        let page = repo
            .list(&ListQuery::default().with_search("cloudboard.com"))
            .await;
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_filter_by_role() {
        let repo = repo();
        let query = ListQuery::default().with_filter(UserFilter {
            role: Some(UserRole::Admin),
        });
        let page = repo.list(&query).await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = repo();
        let before = repo.list(&ListQuery::new(1, 100)).await.items;

        let result = repo.create(draft("admin@cloudboard.com")).await;
        assert!(matches!(
            result,
            Err(Error::DuplicateKey { field: "email", .. })
        ));

        let after = repo.list(&ListQuery::new(1, 100)).await.items;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let repo = repo();
        let user = repo.create(draft("new@cloudboard.com")).await.unwrap();
        assert!(user.last_login.is_none());
        assert!(user.avatar.is_some());
        assert_eq!(repo.len().await, 4);
        assert_eq!(repo.get(&user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_empty_patch_changes_nothing() {
        let repo = repo();
        let before = repo.get("2").await.unwrap();
        let after = repo.update("2", UserPatch::default()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_update_email_collision_is_rejected() {
        let repo = repo();
        let patch = UserPatch {
            email: Some("admin@cloudboard.com".to_string()),
            name: Some("Changed".to_string()),
            ..Default::default()
        };
        assert!(repo.update("2", patch).await.is_err());

        let untouched = repo.get("2").await.unwrap();
        assert_eq!(untouched.name, "Regular User");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo();
        let result = repo.update("missing", UserPatch::default()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_restore_last_login() {
        let repo = repo();
        let before = repo.get("1").await.unwrap().last_login;
        repo.record_login("1").await.unwrap();
        let restored = repo.restore_last_login("1", before).await.unwrap();
        assert_eq!(restored.last_login, before);
        assert_eq!(repo.get("1").await.unwrap().last_login, before);
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = repo();
        let user = repo.create(draft("fresh@cloudboard.com")).await.unwrap();
        let logged_in = repo.record_login(&user.id).await.unwrap();
        assert!(logged_in.last_login.is_some());
        assert_eq!(
            repo.find_by_email("fresh@cloudboard.com").await.unwrap().last_login,
            logged_in.last_login
        );
    }
}
