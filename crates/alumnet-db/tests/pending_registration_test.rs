//! Pending-registration drafts: one active draft per email,
//! last-writer-wins replacement, password hashed at rest.

use alumnet_core::error::AlumnetError;
use alumnet_core::models::registration::CreatePendingRegistration;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::{AlumniProfile, Profile, StudentProfile};
use alumnet_core::repository::PendingRegistrationRepository;
use alumnet_db::repository::SurrealPendingRegistrationRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealPendingRegistrationRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    alumnet_db::run_migrations(&db).await.unwrap();
    SurrealPendingRegistrationRepository::new(db)
}

fn draft(email: &str, first_name: &str) -> CreatePendingRegistration {
    CreatePendingRegistration {
        email: email.into(),
        role: Role::Student,
        first_name: first_name.into(),
        last_name: "Rao".into(),
        password: "correct-horse".into(),
        profile: Profile::Student(StudentProfile {
            roll_number: "CS21B042".into(),
            department: "CSE".into(),
            current_year: None,
            graduation_year: None,
            institution_name: None,
        }),
    }
}

#[tokio::test]
async fn upsert_hashes_the_password() {
    let repo = setup().await;
    let pending = repo.upsert(draft("asha@nitw.edu", "Asha")).await.unwrap();

    assert_eq!(pending.email, "asha@nitw.edu");
    // Argon2id PHC string, never the cleartext.
    assert!(pending.password_hash.starts_with("$argon2id$"));
    assert!(!pending.password_hash.contains("correct-horse"));
}

#[tokio::test]
async fn second_submission_replaces_the_first() {
    let repo = setup().await;
    repo.upsert(draft("asha@nitw.edu", "Asha")).await.unwrap();

    // Same address, different details and even a different role.
    repo.upsert(CreatePendingRegistration {
        role: Role::Alumni,
        profile: Profile::Alumni(AlumniProfile {
            institution_name: "NIT Warangal".into(),
            department: None,
            graduation_year: 2015,
            company: None,
            location: None,
            current_position: None,
        }),
        ..draft("asha@nitw.edu", "Aisha")
    })
    .await
    .unwrap();

    let stored = repo.get_by_email("asha@nitw.edu").await.unwrap();
    assert_eq!(stored.first_name, "Aisha");
    assert_eq!(stored.role, Role::Alumni);
}

#[tokio::test]
async fn email_key_is_case_insensitive() {
    let repo = setup().await;
    repo.upsert(draft("Asha@NITW.edu", "Asha")).await.unwrap();

    let stored = repo.get_by_email("asha@nitw.edu").await.unwrap();
    assert_eq!(stored.email, "asha@nitw.edu");
}

#[tokio::test]
async fn delete_clears_the_draft() {
    let repo = setup().await;
    repo.upsert(draft("asha@nitw.edu", "Asha")).await.unwrap();
    repo.delete_by_email("asha@nitw.edu").await.unwrap();

    let err = repo.get_by_email("asha@nitw.edu").await.unwrap_err();
    assert!(matches!(err, AlumnetError::NotFound { .. }));
}
