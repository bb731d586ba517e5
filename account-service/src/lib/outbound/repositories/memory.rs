use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::ports::AccountRepository;

/// Process-local account store.
///
/// Used when no database is configured and by the integration tests.
/// Enforces email uniqueness under its write lock. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.email.as_str() == email)
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(
                account.email.as_str().to_string(),
            ));
        }

        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_all(&self, limit: u32, offset: u64) -> Result<Vec<AccountProfile>, AccountError> {
        let accounts = self.accounts.read().await;

        let mut ordered: Vec<&Account> = accounts.iter().collect();
        ordered.sort_by_key(|account| Reverse(account.created_at));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(ordered
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .map(AccountProfile::from)
            .collect())
    }

    async fn count(&self) -> Result<u64, AccountError> {
        Ok(self.accounts.read().await.len() as u64)
    }
}
