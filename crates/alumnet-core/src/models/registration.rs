//! Registration input and the pending-registration draft.
//!
//! A submission is validated structurally before anything touches the
//! network or the store, then held as a [`PendingRegistration`] until
//! the email is verified. Only verification promotes the draft into a
//! durable [`User`](crate::models::user::User).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::models::role::Role;
use crate::models::user::{AlumniProfile, InstitutionProfile, Profile, StudentProfile};

/// Minimum password length enforced on both sides of the wire.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A raw registration submission, as the form delivers it. Field names
/// on the wire are camelCase, matching the names used in field-level
/// validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub role: Option<Role>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,

    /// Generic fallback address.
    pub email: Option<String>,
    /// Personal address — the verification target for alumni.
    pub personal_email: Option<String>,
    /// Institutional address — the verification target for students
    /// and institutions.
    pub institutional_email: Option<String>,

    // Student fields.
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub current_year: Option<u16>,
    pub graduation_year: Option<u16>,

    // Alumni fields (institution_name is shared with institutions).
    pub institution_name: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub current_position: Option<String>,

    // Institution fields.
    pub institution_code: Option<String>,
    pub institution_type: Option<String>,
    pub established_year: Option<u16>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl RegistrationForm {
    /// The address a verification token is sent to.
    ///
    /// Alumni verify a personal address; students and institutions
    /// verify an institutional one. The generic `email` field is the
    /// fallback in both cases.
    pub fn resolved_email(&self) -> Option<&str> {
        let preferred = match self.role {
            Some(Role::Alumni) => self.personal_email.as_deref(),
            _ => self.institutional_email.as_deref(),
        };
        preferred
            .or(self.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Structural validation: role present, password policy, a
    /// well-formed resolvable email, and the role-required fields.
    ///
    /// Returns the role-tagged profile on success, or one
    /// [`FieldError`] per violated rule. Never performs I/O.
    pub fn validate(&self) -> Result<Profile, Vec<FieldError>> {
        let mut errors = Vec::new();

        let Some(role) = self.role else {
            return Err(vec![FieldError::new("role", "role is required")]);
        };

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("firstName", "first name is required"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("lastName", "last name is required"));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        match self.resolved_email() {
            None => errors.push(FieldError::new("email", "an email address is required")),
            Some(email) if !is_well_formed_email(email) => {
                errors.push(FieldError::new("email", "email address is not well-formed"));
            }
            Some(_) => {}
        }

        let profile = match role {
            Role::Student => {
                let roll_number = required(&self.roll_number, "rollNumber", &mut errors);
                let department = required(&self.department, "department", &mut errors);
                Profile::Student(StudentProfile {
                    roll_number,
                    department,
                    current_year: self.current_year,
                    graduation_year: self.graduation_year,
                    institution_name: self.institution_name.clone(),
                })
            }
            Role::Alumni => {
                let institution_name =
                    required(&self.institution_name, "institutionName", &mut errors);
                let graduation_year = match self.graduation_year {
                    Some(y) => y,
                    None => {
                        errors.push(FieldError::new(
                            "graduationYear",
                            "graduation year is required",
                        ));
                        0
                    }
                };
                Profile::Alumni(AlumniProfile {
                    institution_name,
                    department: self.department.clone(),
                    graduation_year,
                    company: self.company.clone(),
                    location: self.location.clone(),
                    current_position: self.current_position.clone(),
                })
            }
            Role::Institution => {
                let institution_name =
                    required(&self.institution_name, "institutionName", &mut errors);
                let institution_code =
                    required(&self.institution_code, "institutionCode", &mut errors);
                Profile::Institution(InstitutionProfile {
                    institution_name,
                    institution_code,
                    institution_type: self.institution_type.clone(),
                    established_year: self.established_year,
                    address: self.address.clone(),
                    website: self.website.clone(),
                    phone: self.phone.clone(),
                })
            }
        };

        if errors.is_empty() {
            Ok(profile)
        } else {
            Err(errors)
        }
    }
}

fn required(value: &Option<String>, field: &str, errors: &mut Vec<FieldError>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            String::new()
        }
    }
}

/// Minimal structural email check: one `@`, non-empty local part, a
/// dotted domain, no whitespace.
pub fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Server-side mirror of a submitted registration, awaiting email
/// verification. At most one active draft per email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    /// Resolved verification target, lowercased. Natural key: at most
    /// one draft exists per email.
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePendingRegistration {
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_form() -> RegistrationForm {
        RegistrationForm {
            role: Some(Role::Student),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            password: "hunter2!".into(),
            institutional_email: Some("asha@nitw.edu".into()),
            roll_number: Some("CS21B042".into()),
            department: Some("CSE".into()),
            current_year: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn valid_student_form_passes() {
        let profile = student_form().validate().unwrap();
        assert!(matches!(profile, Profile::Student(_)));
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let mut form = student_form();
        form.roll_number = None;
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "rollNumber"));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = student_form();
        form.password = "seven77".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = student_form();
        form.institutional_email = Some("not-an-email".into());
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn alumni_resolve_personal_email_first() {
        let form = RegistrationForm {
            role: Some(Role::Alumni),
            personal_email: Some("me@gmail.com".into()),
            institutional_email: Some("me@iitd.ac.in".into()),
            email: Some("fallback@x.org".into()),
            ..Default::default()
        };
        assert_eq!(form.resolved_email(), Some("me@gmail.com"));
    }

    #[test]
    fn students_fall_back_to_generic_email() {
        let form = RegistrationForm {
            role: Some(Role::Student),
            email: Some("fallback@x.org".into()),
            ..Default::default()
        };
        assert_eq!(form.resolved_email(), Some("fallback@x.org"));
    }

    #[test]
    fn multiple_violations_yield_one_error_each() {
        let form = RegistrationForm {
            role: Some(Role::Alumni),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        for expected in [
            "firstName",
            "lastName",
            "password",
            "email",
            "institutionName",
            "graduationYear",
        ] {
            assert!(fields.contains(&expected), "missing error for {expected}");
        }
    }
}
