use std::sync::Arc;

use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::models::Role;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryAccountRepository;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Duration;
use chrono::Utc;

pub const API_PREFIX: &str = "/api/v1";

const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryAccountRepository>,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let token_service = Arc::new(TokenService::new(TEST_SECRET, Duration::hours(1)));

        // Minimal cost keeps the suite fast
        let password_hasher = PasswordHasher::new(1, 1024).expect("Invalid hasher parameters");

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            password_hasher,
            Arc::clone(&token_service),
        ));

        let router = create_router(account_service, Arc::clone(&token_service), API_PREFIX);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            token_service,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.address, API_PREFIX, path)
    }

    /// Helper to make GET request under the API prefix
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request under the API prefix
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account through the API and return the issued token
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/register")
            .json(&serde_json::json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Insert accounts directly into the store, oldest first
    pub async fn seed_accounts(&self, count: usize) {
        let now = Utc::now();
        for i in 0..count {
            let created_at = now - Duration::minutes((count - i) as i64);
            self.repository
                .create(Account {
                    id: AccountId::new(),
                    first_name: format!("First{}", i),
                    last_name: format!("Last{}", i),
                    email: EmailAddress::new(format!("seed{}@example.com", i)).unwrap(),
                    password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
                    role: Role::User,
                    created_at,
                    updated_at: created_at,
                })
                .await
                .expect("Failed to seed account");
        }
    }

    /// Issue a token directly, bypassing registration
    pub fn token_for(&self, role: Role) -> String {
        self.token_service
            .issue(AccountId::new(), role)
            .expect("Failed to issue token")
    }
}
