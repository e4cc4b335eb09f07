//! Authentication configuration.

/// Configuration for the authentication services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// Session token lifetime in seconds (default: 86_400 = 24 hours).
    pub session_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification; must match the pepper used at hashing time.
    pub pepper: Option<String>,
    /// Lifetime of a 6-digit OTP in seconds (default: 900 = 15 min).
    pub otp_lifetime_secs: u64,
    /// Lifetime of an emailed link token in seconds
    /// (default: 86_400 = 24 hours).
    pub link_token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            session_lifetime_secs: 86_400,
            jwt_issuer: "alumnet".into(),
            pepper: None,
            otp_lifetime_secs: 900,
            link_token_lifetime_secs: 86_400,
        }
    }
}
