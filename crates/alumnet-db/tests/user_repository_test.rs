//! Integration tests for the User repository using in-memory SurrealDB.

use alumnet_core::error::AlumnetError;
use alumnet_core::models::registration::CreatePendingRegistration;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::{
    AccountStatus, AlumniProfile, Profile, StudentProfile,
};
use alumnet_core::repository::{PendingRegistrationRepository, UserRepository};
use alumnet_db::repository::{
    SurrealPendingRegistrationRepository, SurrealUserRepository,
};
use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    alumnet_db::run_migrations(&db).await.unwrap();
    db
}

fn password_matches(password: &str, hash: &str) -> bool {
    let parsed = PasswordHash::new(hash).unwrap();
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn student_draft(email: &str) -> CreatePendingRegistration {
    CreatePendingRegistration {
        email: email.into(),
        role: Role::Student,
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        password: "correct-horse".into(),
        profile: Profile::Student(StudentProfile {
            roll_number: "CS21B042".into(),
            department: "CSE".into(),
            current_year: Some(3),
            graduation_year: None,
            institution_name: Some("NIT Warangal".into()),
        }),
    }
}

fn alumni_draft(email: &str, institution: &str) -> CreatePendingRegistration {
    CreatePendingRegistration {
        email: email.into(),
        role: Role::Alumni,
        first_name: "Ravi".into(),
        last_name: "Kumar".into(),
        password: "correct-horse".into(),
        profile: Profile::Alumni(AlumniProfile {
            institution_name: institution.into(),
            department: Some("ECE".into()),
            graduation_year: 2018,
            company: Some("Sundial Systems".into()),
            location: None,
            current_position: None,
        }),
    }
}

#[tokio::test]
async fn promote_pending_to_user() {
    let db = setup().await;
    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let pending = pending_repo
        .upsert(student_draft("asha@nitw.edu"))
        .await
        .unwrap();

    let user = user_repo
        .create_from_pending(pending, AccountStatus::Verified)
        .await
        .unwrap();

    assert_eq!(user.email, "asha@nitw.edu");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.status, AccountStatus::Verified);
    assert!(user.email_verified);

    // Password hashed at draft time, carried through promotion.
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(password_matches("correct-horse", &user.password_hash));

    let fetched = user_repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.profile, user.profile);
}

#[tokio::test]
async fn get_by_email_is_case_insensitive() {
    let db = setup().await;
    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let pending = pending_repo
        .upsert(student_draft("Asha@NITW.edu"))
        .await
        .unwrap();
    user_repo
        .create_from_pending(pending, AccountStatus::Verified)
        .await
        .unwrap();

    let user = user_repo.get_by_email("ASHA@nitw.EDU").await.unwrap();
    assert_eq!(user.email, "asha@nitw.edu");

    assert!(user_repo.email_exists("asha@nitw.edu").await.unwrap());
    assert!(!user_repo.email_exists("other@nitw.edu").await.unwrap());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = setup().await;
    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let first = pending_repo
        .upsert(student_draft("dup@nitw.edu"))
        .await
        .unwrap();
    user_repo
        .create_from_pending(first, AccountStatus::Verified)
        .await
        .unwrap();

    // Unique index on email rejects a second durable account, even
    // under a different role.
    let second = pending_repo
        .upsert(alumni_draft("dup@nitw.edu", "NIT Warangal"))
        .await
        .unwrap();
    let result = user_repo
        .create_from_pending(second, AccountStatus::Pending)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn update_password_rehashes() {
    let db = setup().await;
    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let pending = pending_repo
        .upsert(student_draft("asha@nitw.edu"))
        .await
        .unwrap();
    let user = user_repo
        .create_from_pending(pending, AccountStatus::Verified)
        .await
        .unwrap();

    user_repo
        .update_password(user.id, "new-password-9")
        .await
        .unwrap();

    let updated = user_repo.get_by_id(user.id).await.unwrap();
    assert!(password_matches("new-password-9", &updated.password_hash));
    assert!(!password_matches("correct-horse", &updated.password_hash));
}

#[tokio::test]
async fn list_pending_alumni_scopes_by_institution() {
    let db = setup().await;
    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    for (email, institution) in [
        ("a@x.org", "NIT Warangal"),
        ("b@x.org", "NIT Warangal"),
        ("c@x.org", "IIT Delhi"),
    ] {
        let pending = pending_repo
            .upsert(alumni_draft(email, institution))
            .await
            .unwrap();
        user_repo
            .create_from_pending(pending, AccountStatus::Pending)
            .await
            .unwrap();
    }

    // A student at the same institution must not show up.
    let student = pending_repo
        .upsert(student_draft("s@x.org"))
        .await
        .unwrap();
    user_repo
        .create_from_pending(student, AccountStatus::Verified)
        .await
        .unwrap();

    let pending = user_repo
        .list_pending_alumni("NIT Warangal")
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|u| u.role == Role::Alumni));
    assert!(pending.iter().all(|u| u.status == AccountStatus::Pending));
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let db = setup().await;
    let user_repo = SurrealUserRepository::new(db);

    let err = user_repo.get_by_email("ghost@x.org").await.unwrap_err();
    assert!(matches!(err, AlumnetError::NotFound { .. }));
}
