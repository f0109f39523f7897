//! In-process `AccountStore` for tests and database-less local runs.

use super::{AccountStore, ADMIN_CONFLICT, DEVELOPER_CONFLICT};
use crate::error::AppError;
use crate::models::{Admin, Developer, NewAdmin, NewDeveloper};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    admins: Vec<Admin>,
    developers: Vec<Developer>,
}

/// Check-and-insert runs under a single write lock, so creates are atomic.
#[derive(Default)]
pub struct MemoryAccountStore {
    tables: RwLock<Tables>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn admin_count(&self) -> usize {
        self.tables.read().await.admins.len()
    }

    pub async fn developer_count(&self) -> usize {
        self.tables.read().await.developers.len()
    }

    async fn find_developer<F>(&self, pred: F) -> Option<Developer>
    where
        F: Fn(&Developer) -> bool,
    {
        self.tables
            .read()
            .await
            .developers
            .iter()
            .find(|&d| pred(d))
            .cloned()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .admins
            .iter()
            .find(|a| same_email(&a.email, email))
            .cloned())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError> {
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| same_email(&a.email, &admin.email)) {
            return Err(AppError::Conflict(ADMIN_CONFLICT.into()));
        }
        let row = Admin {
            id: Uuid::new_v4(),
            email: admin.email,
            password_hash: admin.password_hash,
            name: admin.name,
            created_at: Utc::now(),
        };
        tables.admins.push(row.clone());
        Ok(row)
    }

    async fn find_developer_by_email(&self, email: &str) -> Result<Option<Developer>, AppError> {
        Ok(self
            .find_developer(|d| d.email.as_deref().is_some_and(|e| same_email(e, email)))
            .await)
    }

    async fn find_developer_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<Developer>, AppError> {
        Ok(self.find_developer(|d| d.github_id == github_id).await)
    }

    async fn find_developer_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Developer>, AppError> {
        Ok(self.find_developer(|d| d.username == username).await)
    }

    async fn create_developer(&self, developer: NewDeveloper) -> Result<Developer, AppError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.developers.iter().any(|d| {
            d.github_id == developer.github_id
                || d.username == developer.username
                || matches!(
                    (d.email.as_deref(), developer.email.as_deref()),
                    (Some(a), Some(b)) if same_email(a, b)
                )
        });
        if duplicate {
            return Err(AppError::Conflict(DEVELOPER_CONFLICT.into()));
        }
        let row = Developer {
            id: Uuid::new_v4(),
            github_id: developer.github_id,
            username: developer.username,
            email: developer.email,
            password_hash: developer.password_hash,
            created_at: Utc::now(),
        };
        tables.developers.push(row.clone());
        Ok(row)
    }

    async fn list_developers(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Developer>, u64), AppError> {
        let tables = self.tables.read().await;
        let total = tables.developers.len() as u64;
        let page = tables
            .developers
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

/// Same comparison as PostgreSQL's `lower(a) = lower(b)`.
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_dev(github_id: &str, username: &str, email: Option<&str>) -> NewDeveloper {
        NewDeveloper {
            github_id: github_id.into(),
            username: username.into(),
            email: email.map(String::from),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn admin_email_is_unique() {
        let store = MemoryAccountStore::new();
        let admin = NewAdmin {
            email: "root@example.com".into(),
            password_hash: "hash".into(),
            name: None,
        };
        store.create_admin(admin.clone()).await.unwrap();
        let err = store.create_admin(admin).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.admin_count().await, 1);
    }

    #[tokio::test]
    async fn emails_match_regardless_of_case_but_keep_their_spelling() {
        let store = MemoryAccountStore::new();
        let admin = store
            .create_admin(NewAdmin {
                email: "Root@Example.COM".into(),
                password_hash: "hash".into(),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(admin.email, "Root@Example.COM");

        let found = store.find_admin_by_email("root@example.com").await.unwrap();
        assert_eq!(found.map(|a| a.email).as_deref(), Some("Root@Example.COM"));
        let err = store
            .create_admin(NewAdmin {
                email: "ROOT@example.com".into(),
                password_hash: "hash".into(),
                name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        store
            .create_developer(new_dev("1", "octo", Some("Octo@Example.com")))
            .await
            .unwrap();
        assert!(store.find_developer_by_email("octo@example.COM").await.unwrap().is_some());
        assert!(matches!(
            store.create_developer(new_dev("2", "other", Some("octo@example.com"))).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn developer_uniqueness_covers_each_key() {
        let store = MemoryAccountStore::new();
        store
            .create_developer(new_dev("1", "octo", Some("o@example.com")))
            .await
            .unwrap();
        for dup in [
            new_dev("1", "other", None),
            new_dev("2", "octo", None),
            new_dev("3", "third", Some("o@example.com")),
        ] {
            assert!(matches!(
                store.create_developer(dup).await,
                Err(AppError::Conflict(_))
            ));
        }
        // Two developers without email do not collide.
        store.create_developer(new_dev("4", "a", None)).await.unwrap();
        store.create_developer(new_dev("5", "b", None)).await.unwrap();
        assert_eq!(store.developer_count().await, 3);
    }

    #[tokio::test]
    async fn concurrent_duplicate_signups_create_one_record() {
        let store = Arc::new(MemoryAccountStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_developer(new_dev("42", "racer", None)).await
            }));
        }
        let mut ok = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.developer_count().await, 1);
    }

    #[tokio::test]
    async fn lists_pages_in_creation_order() {
        let store = MemoryAccountStore::new();
        for i in 0..5 {
            store
                .create_developer(new_dev(&i.to_string(), &format!("dev{}", i), None))
                .await
                .unwrap();
        }
        let (page, total) = store.list_developers(2, 2).await.unwrap();
        assert_eq!(total, 5);
        let names: Vec<_> = page.iter().map(|d| d.username.as_str()).collect();
        assert_eq!(names, ["dev2", "dev3"]);
        let (page, _) = store.list_developers(2, 10).await.unwrap();
        assert!(page.is_empty());
    }
}
