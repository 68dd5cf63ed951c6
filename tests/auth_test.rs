mod common;

use buybuy_backend::errors::AppError;
use buybuy_backend::services::auth_service::{self, SignupInput};
use common::setup_database;

fn signup_input(email: &str) -> SignupInput {
  SignupInput {
    email: email.to_string(),
    username: "shopper".to_string(),
    first_name: "Shop".to_string(),
    last_name: "Per".to_string(),
    password: "password123".to_string(),
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn signup_signin_and_session_lifecycle() {
  let pool = setup_database().await;

  let (user, session) = auth_service::signup(&pool, signup_input("shopper@example.com"), 30)
    .await
    .unwrap();
  assert_eq!(user.email, "shopper@example.com");

  // The issued token resolves to the user until signed out.
  let resolved = auth_service::resolve_session(&pool, session.token).await.unwrap();
  assert_eq!(resolved.id, user.id);

  auth_service::signout(&pool, session.token).await.unwrap();
  let err = auth_service::resolve_session(&pool, session.token).await.unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));

  // Fresh signin issues a new working token.
  let (signed_in, new_session) = auth_service::signin(&pool, "shopper@example.com", "password123", 30)
    .await
    .unwrap();
  assert_eq!(signed_in.id, user.id);
  assert_ne!(new_session.token, session.token);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn duplicate_email_and_bad_credentials_are_rejected() {
  let pool = setup_database().await;
  auth_service::signup(&pool, signup_input("shopper@example.com"), 30)
    .await
    .unwrap();

  let err = auth_service::signup(&pool, signup_input("shopper@example.com"), 30)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(m) if m.contains("already registered")));

  let err = auth_service::signin(&pool, "shopper@example.com", "wrong-password", 30)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));

  let err = auth_service::signin(&pool, "nobody@example.com", "password123", 30)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn expired_sessions_do_not_authenticate() {
  let pool = setup_database().await;
  let (_, session) = auth_service::signup(&pool, signup_input("shopper@example.com"), 30)
    .await
    .unwrap();

  sqlx::query("UPDATE sessions SET expires_at = NOW() - INTERVAL '1 hour' WHERE token = $1")
    .bind(session.token)
    .execute(&pool)
    .await
    .unwrap();

  let err = auth_service::resolve_session(&pool, session.token).await.unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));
}
