use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountPage;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::PageRequest;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Registration;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    password_hasher: PasswordHasher,
    token_service: Arc<TokenService>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Credential hasher built from configuration
    /// * `token_service` - Token issuer shared with the authorization middleware
    pub fn new(
        repository: Arc<AR>,
        password_hasher: PasswordHasher,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            token_service,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AccountError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                AccountError::Unknown(format!("Password verification task failed: {}", e))
            })?
            .map_err(AccountError::from)
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterAccountCommand) -> Result<Registration, AccountError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            tracing::info!(email = %command.email, "Registration rejected, email already registered");
            return Err(AccountError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            role: command.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(account).await?;
        let token = self.token_service.issue(created.id, created.role)?;

        tracing::info!(account_id = %created.id, role = %created.role, "Account registered");

        Ok(Registration {
            account: created.into(),
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<String, AccountError> {
        let Some(account) = self.repository.find_by_email(&command.email).await? else {
            tracing::info!("Login rejected, unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self
            .verify_password(command.password, account.password_hash)
            .await?
        {
            tracing::info!(account_id = %account.id, "Login rejected, password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.token_service.issue(account.id, account.role)?;
        tracing::debug!(account_id = %account.id, "Login succeeded");

        Ok(token)
    }

    async fn list_accounts(&self, request: PageRequest) -> Result<AccountPage, AccountError> {
        let (accounts, total_count) = tokio::try_join!(
            self.repository.find_all(request.limit(), request.offset()),
            self.repository.count(),
        )?;

        Ok(AccountPage::new(accounts, total_count, request))
    }
}
