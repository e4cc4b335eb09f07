//! The authentication service: registration, email verification with
//! auto-login, password login, the alumni approval gate, and password
//! reset. Generic over the repository traits so tests can run against
//! the embedded engine.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use alumnet_core::error::{AlumnetError, AlumnetResult};
use alumnet_core::models::registration::{
    CreatePendingRegistration, MIN_PASSWORD_LENGTH, RegistrationForm,
};
use alumnet_core::models::role::Role;
use alumnet_core::models::session::{Session, UserSnapshot};
use alumnet_core::models::user::{AccountStatus, User};
use alumnet_core::models::verification::{
    IssueToken, TokenKind, TokenPurpose, VerificationCode, VerificationToken,
};
use alumnet_core::repository::{
    PendingRegistrationRepository, UserRepository, VerificationTokenRepository,
};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::verify_password;
use crate::token::{generate_link_token, generate_otp, issue_session_token};

/// Result of a successful registration submission. The token is handed
/// to the mailer; the account itself does not exist yet.
#[derive(Debug, Clone)]
pub struct RegisterOutput {
    /// Resolved verification target, lowercased.
    pub email: String,
    pub token: VerificationToken,
}

/// Result of a successful email verification: the promoted account and
/// an auto-login session.
#[derive(Debug, Clone)]
pub struct VerifyOutput {
    pub session: Session,
}

#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub session: Session,
}

/// Orchestrates the full credential lifecycle over three repositories.
pub struct AuthService<U, P, V> {
    users: U,
    pending: P,
    tokens: V,
    config: AuthConfig,
}

impl<U, P, V> AuthService<U, P, V>
where
    U: UserRepository,
    P: PendingRegistrationRepository,
    V: VerificationTokenRepository,
{
    pub fn new(users: U, pending: P, tokens: V, config: AuthConfig) -> Self {
        Self {
            users,
            pending,
            tokens,
            config,
        }
    }

    /// Accept a registration submission: validate it structurally,
    /// reject addresses that already belong to an account, store the
    /// draft (replacing any previous draft for the same address), and
    /// issue a fresh verification code.
    pub async fn register(&self, form: &RegistrationForm) -> AlumnetResult<RegisterOutput> {
        let profile = form
            .validate()
            .map_err(AlumnetError::FieldValidation)?;
        let role = form.role.ok_or(AlumnetError::Validation {
            message: "role is required".into(),
        })?;
        let email = form
            .resolved_email()
            .ok_or(AlumnetError::Validation {
                message: "an email address is required".into(),
            })?
            .to_lowercase();

        if self.users.email_exists(&email).await? {
            warn!(email = %email, "registration rejected, email already registered");
            return Err(AuthError::AlreadyRegistered(email).into());
        }

        self.pending
            .upsert(CreatePendingRegistration {
                email: email.clone(),
                role,
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                password: form.password.clone(),
                profile,
            })
            .await?;

        let token = self.issue_verification_code(&email).await?;
        info!(email = %email, role = %role, "registration accepted, verification code issued");

        Ok(RegisterOutput { email, token })
    }

    /// Reissue the verification code for a stored draft. The previous
    /// code stops working.
    pub async fn resend_verification(&self, email: &str) -> AlumnetResult<VerificationToken> {
        let email = email.trim().to_lowercase();
        match self.pending.get_by_email(&email).await {
            Ok(_) => {}
            Err(AlumnetError::NotFound { .. }) => {
                return Err(AuthError::NoPendingRegistration.into());
            }
            Err(e) => return Err(e),
        }

        let token = self.issue_verification_code(&email).await?;
        info!(email = %email, "verification code reissued");
        Ok(token)
    }

    async fn issue_verification_code(&self, email: &str) -> AlumnetResult<VerificationToken> {
        let token = self
            .tokens
            .replace(IssueToken {
                email: email.to_string(),
                value: generate_otp(),
                kind: TokenKind::Otp,
                purpose: TokenPurpose::EmailVerification,
                expires_at: Utc::now() + Duration::seconds(self.config.otp_lifetime_secs as i64),
            })
            .await?;
        Ok(token)
    }

    /// Consume a verification code and promote the matching draft into
    /// a durable account. Alumni land in `Pending` and await their
    /// institution's decision; students and institutions are active
    /// immediately. Returns an auto-login session either way.
    pub async fn verify_email(
        &self,
        email: &str,
        code: &VerificationCode,
    ) -> AlumnetResult<VerifyOutput> {
        let email = email.trim().to_lowercase();

        self.tokens
            .consume(&email, code.value(), TokenPurpose::EmailVerification)
            .await?;

        let pending = match self.pending.get_by_email(&email).await {
            Ok(p) => p,
            Err(AlumnetError::NotFound { .. }) => {
                return Err(AuthError::NoPendingRegistration.into());
            }
            Err(e) => return Err(e),
        };

        let initial_status = match pending.role {
            Role::Alumni => AccountStatus::Pending,
            Role::Student | Role::Institution => AccountStatus::Verified,
        };

        let user = self.users.create_from_pending(pending, initial_status).await?;
        self.pending.delete_by_email(&email).await?;

        info!(
            email = %email,
            role = %user.role,
            status = %user.status.as_str(),
            "email verified, account created"
        );

        Ok(VerifyOutput {
            session: self.open_session(&user)?,
        })
    }

    /// Password login. The submitted role must match the account's
    /// role; mismatches and unknown addresses both collapse into
    /// `InvalidCredentials` so the response does not reveal which
    /// addresses hold accounts.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> AlumnetResult<LoginOutput> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }
        let email = email.trim().to_lowercase();

        let user = match self.users.get_by_email(&email).await {
            Ok(u) => u,
            Err(AlumnetError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if user.role != role {
            warn!(email = %email, "login rejected, role mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let matches = verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(AlumnetError::from)?;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.email_verified {
            return Err(AuthError::EmailNotVerified.into());
        }
        if user.status == AccountStatus::Suspended {
            warn!(email = %email, "login rejected, account suspended");
            return Err(AuthError::AccountSuspended.into());
        }

        // Alumni still awaiting approval may log in; the session
        // carries pending_approval and routes to the waiting page.
        info!(email = %email, role = %user.role, "login succeeded");
        Ok(LoginOutput {
            session: self.open_session(&user)?,
        })
    }

    fn open_session(&self, user: &User) -> AlumnetResult<Session> {
        let token = issue_session_token(user, &self.config).map_err(AlumnetError::from)?;
        Ok(Session::new(token, UserSnapshot::of(user), Utc::now()))
    }

    /// Alumni awaiting approval, scoped to one institution.
    pub async fn pending_alumni(&self, institution_name: &str) -> AlumnetResult<Vec<User>> {
        self.users.list_pending_alumni(institution_name).await
    }

    /// Institution decision: activate a pending alumni account.
    pub async fn approve_alumni(&self, id: Uuid) -> AlumnetResult<User> {
        self.decide_alumni(id, AccountStatus::Verified).await
    }

    /// Institution decision: reject a pending alumni account.
    pub async fn reject_alumni(&self, id: Uuid) -> AlumnetResult<User> {
        self.decide_alumni(id, AccountStatus::Suspended).await
    }

    async fn decide_alumni(&self, id: Uuid, to: AccountStatus) -> AlumnetResult<User> {
        let user = self.users.get_by_id(id).await?;
        if user.role != Role::Alumni {
            return Err(AlumnetError::Validation {
                message: format!("account {id} is not an alumni account"),
            });
        }

        let decided = self
            .users
            .transition_status(id, AccountStatus::Pending, to)
            .await?;
        info!(id = %id, status = %decided.status.as_str(), "alumni approval decision recorded");
        Ok(decided)
    }

    /// Begin a password reset. Returns `None` for unknown addresses so
    /// the caller responds identically either way.
    pub async fn forgot_password(&self, email: &str) -> AlumnetResult<Option<VerificationToken>> {
        let email = email.trim().to_lowercase();

        match self.users.get_by_email(&email).await {
            Ok(_) => {}
            Err(AlumnetError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        }

        let token = self
            .tokens
            .replace(IssueToken {
                email: email.clone(),
                value: generate_link_token(),
                kind: TokenKind::LinkToken,
                purpose: TokenPurpose::PasswordReset,
                expires_at: Utc::now()
                    + Duration::seconds(self.config.link_token_lifetime_secs as i64),
            })
            .await?;

        info!(email = %email, "password reset token issued");
        Ok(Some(token))
    }

    /// Complete a password reset using an emailed link token.
    pub async fn reset_password(
        &self,
        email: &str,
        token_value: &str,
        new_password: &str,
    ) -> AlumnetResult<()> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AlumnetError::Validation {
                message: format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            });
        }
        let email = email.trim().to_lowercase();

        self.tokens
            .consume(&email, token_value, TokenPurpose::PasswordReset)
            .await?;

        let user = self.users.get_by_email(&email).await?;
        self.users.update_password(user.id, new_password).await?;

        info!(email = %email, "password reset completed");
        Ok(())
    }
}
