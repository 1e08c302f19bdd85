//! In-process store implementing both repository traits.
//!
//! All state sits behind one lock, so every operation (including label
//! assignment in [`SuggestionStore::create`]) is atomic with respect to every
//! other. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use suggestion_box_core::{
    AdminRole, AdminUserId, Email, SuggestionHash, SuggestionId, SuggestionStatus,
};

use super::{AdminUserStore, RepositoryError, SuggestionStore};
use crate::models::{
    AdminUser, AdminUserChanges, NewAdminUser, NewSuggestion, Suggestion, SuggestionFilter,
};

#[derive(Debug, Default)]
struct State {
    suggestions: BTreeMap<SuggestionId, Suggestion>,
    next_suggestion_id: i32,
    latest_hash: Option<SuggestionHash>,
    admins: BTreeMap<AdminUserId, StoredAdmin>,
    next_admin_id: i32,
}

#[derive(Debug, Clone)]
struct StoredAdmin {
    user: AdminUser,
    password_hash: String,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<AdminUserId>) -> bool {
        self.admins
            .values()
            .any(|a| a.user.email == *email && Some(a.user.id) != except)
    }
}

fn next_id(counter: &mut i32, what: &str) -> Result<i32, RepositoryError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("{what} id space exhausted")))?;
    Ok(*counter)
}

/// Process-local store for suggestions and admin users.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn list(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .suggestions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn create(&self, new: &NewSuggestion) -> Result<Suggestion, RepositoryError> {
        let mut state = self.state.write().await;

        let hash = SuggestionHash::next_after(state.latest_hash)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let id = SuggestionId::new(next_id(&mut state.next_suggestion_id, "suggestion")?);

        let suggestion = Suggestion {
            id,
            hash,
            category: new.category.clone(),
            text: new.text.clone(),
            submitter_id: new.submitter_id.clone(),
            submitted_at: Utc::now(),
            status: SuggestionStatus::Unread,
        };
        state.latest_hash = Some(hash);
        state.suggestions.insert(id, suggestion.clone());

        Ok(suggestion)
    }

    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.suggestions.get_mut(&id).map(|s| {
            s.status = status;
            s.clone()
        }))
    }

    async fn delete(&self, id: SuggestionId) -> Result<bool, RepositoryError> {
        Ok(self.state.write().await.suggestions.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl AdminUserStore for MemoryStore {
    async fn create(&self, new: &NewAdminUser) -> Result<AdminUser, RepositoryError> {
        let mut state = self.state.write().await;
        if state.email_taken(&new.email, None) {
            return Err(RepositoryError::Conflict("Email already exists".to_owned()));
        }

        let id = AdminUserId::new(next_id(&mut state.next_admin_id, "admin user")?);
        let now = Utc::now();
        let user = AdminUser {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            role: new.role,
            active: new.active,
            created_at: now,
            updated_at: now,
        };
        state.admins.insert(
            id,
            StoredAdmin {
                user: user.clone(),
                password_hash: new.password_hash.clone(),
            },
        );

        Ok(user)
    }

    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .admins
            .get(&id)
            .map(|a| a.user.clone()))
    }

    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .values()
            .find(|a| a.user.email == *email)
            .map(|a| (a.user.clone(), a.password_hash.clone())))
    }

    async fn get_password_hash(&self, id: AdminUserId) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .admins
            .get(&id)
            .map(|a| a.password_hash.clone()))
    }

    async fn update(
        &self,
        id: AdminUserId,
        changes: &AdminUserChanges,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let mut state = self.state.write().await;
        if let Some(email) = &changes.email
            && state.email_taken(email, Some(id))
        {
            return Err(RepositoryError::Conflict("Email already exists".to_owned()));
        }

        let Some(stored) = state.admins.get_mut(&id) else {
            return Ok(None);
        };
        let user = &mut stored.user;
        user.first_name = changes.first_name.clone();
        user.last_name = changes.last_name.clone();
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(active) = changes.active {
            user.active = active;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn set_password_hash(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.admins.get_mut(&id).is_some_and(|stored| {
            password_hash.clone_into(&mut stored.password_hash);
            stored.user.updated_at = Utc::now();
            true
        }))
    }

    async fn count_by_role(&self, role: AdminRole) -> Result<i64, RepositoryError> {
        let state = self.state.read().await;
        let count = state.admins.values().filter(|a| a.user.role == role).count();
        i64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::models::PersonName;

    fn submission(text: &str) -> NewSuggestion {
        NewSuggestion::parse(Some(text), Some("IT"), None).unwrap()
    }

    fn new_admin(email: &str) -> NewAdminUser {
        NewAdminUser {
            first_name: PersonName::parse("firstName", "Ada").unwrap(),
            last_name: PersonName::parse("lastName", "Lovelace").unwrap(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
            role: AdminRole::Admin,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_labels_are_sequential() {
        let store = MemoryStore::new();
        let mut labels = Vec::new();
        for i in 0..3 {
            let s = SuggestionStore::create(&store, &submission(&format!("idea {i}")))
                .await
                .unwrap();
            assert_eq!(s.status, SuggestionStatus::Unread);
            labels.push(s.hash.to_string());
        }
        assert_eq!(labels, ["A001", "A002", "A003"]);
    }

    #[tokio::test]
    async fn test_labels_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = SuggestionStore::create(&store, &submission("one")).await.unwrap();
        let second = SuggestionStore::create(&store, &submission("two")).await.unwrap();
        assert!(store.delete(second.id).await.unwrap());
        assert!(!store.delete(second.id).await.unwrap());

        let third = SuggestionStore::create(&store, &submission("three")).await.unwrap();
        assert_eq!(first.hash.to_string(), "A001");
        assert_eq!(third.hash.to_string(), "A003");
        assert_ne!(third.id, second.id);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_labels() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                SuggestionStore::create(store.as_ref(), &submission(&format!("idea {i}")))
                    .await
                    .unwrap()
                    .hash
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        assert_eq!(seen.len(), 50);
        assert!(seen.contains(&SuggestionHash::parse("A050").unwrap()));
    }

    #[tokio::test]
    async fn test_set_status_and_filter() {
        let store = MemoryStore::new();
        let a = SuggestionStore::create(&store, &submission("a")).await.unwrap();
        SuggestionStore::create(&store, &submission("b")).await.unwrap();

        let updated = store.set_status(a.id, SuggestionStatus::Read).await.unwrap().unwrap();
        assert_eq!(updated.status, SuggestionStatus::Read);
        assert!(
            store
                .set_status(SuggestionId::new(999), SuggestionStatus::Read)
                .await
                .unwrap()
                .is_none()
        );

        let unread = store
            .list(&SuggestionFilter {
                status: Some(SuggestionStatus::Unread),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread.first().unwrap().text.as_str(), "b");
    }

    #[tokio::test]
    async fn test_admin_email_unique() {
        let store = MemoryStore::new();
        AdminUserStore::create(&store, &new_admin("ada@example.com")).await.unwrap();
        let err = AdminUserStore::create(&store, &new_admin("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_admin_update_keeps_password() {
        let store = MemoryStore::new();
        let ada = AdminUserStore::create(&store, &new_admin("ada@example.com")).await.unwrap();
        let other = AdminUserStore::create(&store, &new_admin("bob@example.com")).await.unwrap();

        let changes = AdminUserChanges {
            first_name: PersonName::parse("firstName", "Augusta").unwrap(),
            last_name: PersonName::parse("lastName", "King").unwrap(),
            email: None,
            role: None,
            active: Some(false),
        };
        let updated = store.update(ada.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.first_name.as_str(), "Augusta");
        assert!(!updated.active);
        assert_eq!(updated.email, ada.email);
        assert_eq!(store.get_password_hash(ada.id).await.unwrap().unwrap(), "hash");

        let clash = AdminUserChanges {
            email: Some(other.email.clone()),
            ..changes
        };
        assert!(matches!(
            store.update(ada.id, &clash).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert_eq!(store.count_by_role(AdminRole::Admin).await.unwrap(), 2);
    }
}
