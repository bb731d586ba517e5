use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountPage;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::PageRequest;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Registration;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated registration data
    ///
    /// # Returns
    /// Account profile (no password hash) and access token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered; nothing is written
    /// * `Password` - Hashing backend failed
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterAccountCommand) -> Result<Registration, AccountError>;

    /// Check credentials and issue a token.
    ///
    /// # Returns
    /// Access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Password` - Stored hash unreadable
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<String, AccountError>;

    /// Fetch one page of accounts with totals.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn list_accounts(&self, request: PageRequest) -> Result<AccountPage, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations own email uniqueness.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve account by exact email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    /// Persist new account to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve a page of accounts, newest first, without password hashes.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_all(&self, limit: u32, offset: u64) -> Result<Vec<AccountProfile>, AccountError>;

    /// Count all stored accounts.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn count(&self) -> Result<u64, AccountError>;
}
