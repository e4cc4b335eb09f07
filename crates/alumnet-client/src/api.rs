//! The wire seam: `CredentialApi` abstracts the backend so workflow
//! logic is testable without a network, and `HttpCredentialApi` is the
//! reqwest implementation of the JSON envelope contract.

use reqwest::StatusCode;
use serde::Deserialize;

use alumnet_core::models::registration::RegistrationForm;

use crate::error::FlowError;

/// Fallback backend origin when `ALUMNET_API_BASE_URL` is unset.
/// A deployment smell, not a contract; kept for development parity.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// A user object as the backend serializes it: camelCase, role under
/// `userType` in the storage vocabulary (`admin` for institutions).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub user_type: String,
    pub status: String,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSessionData {
    pub user: WireUser,
    #[serde(default)]
    pub pending_approval: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFieldError {
    pub field: String,
    pub message: String,
}

/// The uniform `{success, message?, token?, data?, errors?}` envelope
/// every endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<WireSessionData>,
    #[serde(default)]
    pub errors: Option<Vec<WireFieldError>>,
}

impl StoreResponse {
    /// One display string for a rejected request: joined field
    /// messages when present, the top-level message otherwise.
    pub fn failure_message(&self) -> String {
        match &self.errors {
            Some(errors) if !errors.is_empty() => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => self
                .message
                .clone()
                .unwrap_or_else(|| "request failed".into()),
        }
    }
}

/// Backend operations the workflows depend on. Implemented over HTTP
/// in production and by an in-memory double in tests.
pub trait CredentialApi: Send + Sync {
    fn register(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<StoreResponse, FlowError>> + Send;

    fn verify_email_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = Result<StoreResponse, FlowError>> + Send;

    fn verify_email_link(
        &self,
        email: &str,
        token: &str,
    ) -> impl Future<Output = Result<StoreResponse, FlowError>> + Send;

    fn resend_verification(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<StoreResponse, FlowError>> + Send;

    fn login(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> impl Future<Output = Result<StoreResponse, FlowError>> + Send;
}

/// reqwest-backed [`CredentialApi`].
#[derive(Debug, Clone)]
pub struct HttpCredentialApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCredentialApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL from `ALUMNET_API_BASE_URL`, falling back to the local
    /// development default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ALUMNET_API_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    async fn post(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<StoreResponse, FlowError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;
        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<StoreResponse, FlowError> {
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(FlowError::RateLimited);
        }
        let status = response.status();
        // Failure envelopes still parse; only an unparseable body is a
        // network-level failure.
        response
            .json::<StoreResponse>()
            .await
            .map_err(|_| FlowError::Network(format!("unexpected response (HTTP {status})")))
    }
}

impl CredentialApi for HttpCredentialApi {
    async fn register(&self, form: &RegistrationForm) -> Result<StoreResponse, FlowError> {
        self.post("/auth/register", form).await
    }

    async fn verify_email_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<StoreResponse, FlowError> {
        self.post(
            "/auth/verify-email-code",
            &serde_json::json!({"code": code, "email": email}),
        )
        .await
    }

    async fn verify_email_link(
        &self,
        email: &str,
        token: &str,
    ) -> Result<StoreResponse, FlowError> {
        let response = self
            .client
            .get(format!("{}/auth/verify-email", self.base_url))
            .query(&[("token", token), ("email", email)])
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;
        Self::parse(response).await
    }

    async fn resend_verification(&self, email: &str) -> Result<StoreResponse, FlowError> {
        self.post(
            "/auth/resend-verification",
            &serde_json::json!({"email": email}),
        )
        .await
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<StoreResponse, FlowError> {
        self.post(
            "/auth/login",
            &serde_json::json!({"email": email, "password": password, "role": role}),
        )
        .await
    }
}
