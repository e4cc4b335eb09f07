//! The authentication flow: a single owner of client auth state whose
//! named operations (register, verify, resend, login, logout) are the
//! only way that state changes.

use chrono::Utc;
use tracing::debug;

use alumnet_core::models::registration::RegistrationForm;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::AccountStatus;
use alumnet_core::models::verification::VerificationCode;

use crate::api::{CredentialApi, StoreResponse};
use crate::error::FlowError;
use crate::lockout::LoginLockout;
use crate::routes::Route;
use crate::state::{AuthState, ClientSession, ClientUser};

#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    /// The address the verification code was sent to.
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    /// Whether verification auto-issued a session.
    pub auto_login: bool,
    pub pending_approval: bool,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub route: Route,
}

pub struct AuthFlow<A: CredentialApi> {
    api: A,
    state: AuthState,
    lockout: LoginLockout,
}

impl<A: CredentialApi> AuthFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: AuthState::new(),
            lockout: LoginLockout::new(),
        }
    }

    pub fn session(&self) -> Option<&ClientSession> {
        self.state.session()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Submit a registration. Validation failures never reach the
    /// network; a successful submission replaces any previous draft.
    pub async fn register(&mut self, form: RegistrationForm) -> Result<RegisterOutcome, FlowError> {
        self.state.clear_session();

        if let Err(errors) = form.validate() {
            return Err(FlowError::Validation(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        let email = form
            .resolved_email()
            .map(|e| e.to_lowercase())
            .ok_or_else(|| FlowError::Validation(vec!["an email address is required".into()]))?;

        // A rejected submission has no draft on the store either, so a
        // previously held draft must not survive this attempt.
        self.state.clear_draft();

        let response = self.api.register(&form).await?;
        if !response.success {
            return Err(FlowError::StoreValidation(response.failure_message()));
        }

        debug!(email = %email, "registration submitted, draft stored");
        self.state.store_draft(form);

        Ok(RegisterOutcome {
            email,
            message: response
                .message
                .unwrap_or_else(|| "verification code sent".into()),
        })
    }

    /// Reissue the verification code for the held draft.
    pub async fn resend_verification(&mut self) -> Result<String, FlowError> {
        let email = self
            .state
            .draft_email()
            .ok_or(FlowError::NoPendingRegistration)?;

        let response = self.api.resend_verification(&email).await?;
        if !response.success {
            return Err(FlowError::StoreValidation(response.failure_message()));
        }
        Ok(response
            .message
            .unwrap_or_else(|| "verification code sent".into()))
    }

    /// Submit a verification credential. `email_hint` serves
    /// link-driven entry points where no draft is held locally.
    ///
    /// A failed attempt keeps the draft so the user can retry or
    /// resend; success clears it and, when the response grants a
    /// session, signs the user in.
    pub async fn verify_email(
        &mut self,
        code: &VerificationCode,
        email_hint: Option<&str>,
    ) -> Result<VerifyOutcome, FlowError> {
        let email = email_hint
            .map(|e| e.trim().to_lowercase())
            .or_else(|| self.state.draft_email())
            .ok_or(FlowError::NoPendingRegistration)?;

        let response = match code {
            VerificationCode::Otp(value) => self.api.verify_email_code(&email, value).await?,
            VerificationCode::LinkToken(value) => {
                self.api.verify_email_link(&email, value).await?
            }
        };
        if !response.success {
            return Err(FlowError::Verification(response.failure_message()));
        }

        self.state.clear_draft();
        self.finish_verification(response)
    }

    fn finish_verification(&mut self, response: StoreResponse) -> Result<VerifyOutcome, FlowError> {
        let (Some(token), Some(data)) = (response.token, response.data) else {
            // Verified, but no session granted: the caller logs in.
            return Ok(VerifyOutcome {
                auto_login: false,
                pending_approval: false,
                route: Route::Home,
            });
        };

        let user = ClientUser::from_wire(&data.user)?;
        let pending_approval = data.pending_approval
            || (user.role == Role::Alumni && user.status == AccountStatus::Pending);
        let route = Route::for_session(user.role, user.status);

        self.state.store_session(ClientSession {
            token,
            user,
            pending_approval,
        });

        Ok(VerifyOutcome {
            auto_login: true,
            pending_approval,
            route,
        })
    }

    /// Password login. Blank credentials and an active local lockout
    /// fail before any network call.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<LoginOutcome, FlowError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(FlowError::MissingCredentials);
        }
        self.lockout.check(Utc::now())?;

        let response = self.api.login(email, password, role.as_str()).await?;
        if !response.success {
            self.lockout.record_failure(Utc::now());
            return Err(FlowError::StoreValidation(response.failure_message()));
        }

        let (Some(token), Some(data)) = (response.token, response.data) else {
            return Err(FlowError::Network("login response granted no session".into()));
        };
        let user = ClientUser::from_wire(&data.user)?;
        let pending_approval = data.pending_approval
            || (user.role == Role::Alumni && user.status == AccountStatus::Pending);
        let route = Route::for_session(user.role, user.status);

        self.lockout.record_success();
        self.state.store_session(ClientSession {
            token,
            user,
            pending_approval,
        });

        Ok(LoginOutcome { route })
    }

    /// Clears session snapshot, bearer token, and draft together.
    pub fn logout(&mut self) {
        debug!("logging out, clearing client auth state");
        self.state.clear_all();
    }
}
