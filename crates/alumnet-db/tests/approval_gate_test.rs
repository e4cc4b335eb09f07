//! Approval-gate semantics: status transitions are compare-and-set,
//! so decisions for the same account cannot race into an inconsistent
//! state.

use alumnet_core::error::AlumnetError;
use alumnet_core::models::registration::CreatePendingRegistration;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::{AccountStatus, AlumniProfile, Profile, User};
use alumnet_core::repository::{PendingRegistrationRepository, UserRepository};
use alumnet_db::repository::{
    SurrealPendingRegistrationRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup_pending_alumni() -> (SurrealUserRepository<surrealdb::engine::local::Db>, User) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    alumnet_db::run_migrations(&db).await.unwrap();

    let pending_repo = SurrealPendingRegistrationRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let pending = pending_repo
        .upsert(CreatePendingRegistration {
            email: "ravi@gmail.com".into(),
            role: Role::Alumni,
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
            password: "correct-horse".into(),
            profile: Profile::Alumni(AlumniProfile {
                institution_name: "NIT Warangal".into(),
                department: None,
                graduation_year: 2017,
                company: None,
                location: None,
                current_position: None,
            }),
        })
        .await
        .unwrap();

    let user = user_repo
        .create_from_pending(pending, AccountStatus::Pending)
        .await
        .unwrap();

    (user_repo, user)
}

#[tokio::test]
async fn approve_moves_pending_to_verified() {
    let (repo, user) = setup_pending_alumni().await;

    let approved = repo
        .transition_status(user.id, AccountStatus::Pending, AccountStatus::Verified)
        .await
        .unwrap();
    assert_eq!(approved.status, AccountStatus::Verified);
}

#[tokio::test]
async fn reject_moves_pending_to_suspended() {
    let (repo, user) = setup_pending_alumni().await;

    let rejected = repo
        .transition_status(user.id, AccountStatus::Pending, AccountStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(rejected.status, AccountStatus::Suspended);
}

#[tokio::test]
async fn second_decision_loses() {
    let (repo, user) = setup_pending_alumni().await;

    repo.transition_status(user.id, AccountStatus::Pending, AccountStatus::Verified)
        .await
        .unwrap();

    // A reject arriving after the approve must fail, not clobber.
    let err = repo
        .transition_status(user.id, AccountStatus::Pending, AccountStatus::Suspended)
        .await
        .unwrap_err();
    assert!(matches!(err, AlumnetError::InvalidTransition { .. }));

    let current = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(current.status, AccountStatus::Verified);
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let (repo, _user) = setup_pending_alumni().await;

    let err = repo
        .transition_status(
            uuid::Uuid::new_v4(),
            AccountStatus::Pending,
            AccountStatus::Verified,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AlumnetError::NotFound { .. }));
}
