use super::*;

#[test]
fn unauthorized_and_forbidden_are_auth_failures() {
    assert!(matches!(ApiError::from_status(401, ""), ApiError::Auth { status: 401, message: None }));
    assert!(matches!(ApiError::from_status(403, ""), ApiError::Auth { status: 403, .. }));
}

#[test]
fn other_statuses_are_validation_failures() {
    assert!(matches!(ApiError::from_status(422, ""), ApiError::Validation { status: 422, .. }));
    assert!(matches!(ApiError::from_status(500, ""), ApiError::Validation { status: 500, .. }));
}

#[test]
fn from_status_reads_server_message() {
    let err = ApiError::from_status(401, r#"{"message":"Invalid credentials"}"#);
    assert_eq!(err.message(), Some("Invalid credentials"));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
}

#[test]
fn from_status_ignores_non_json_and_blank_messages() {
    assert_eq!(ApiError::from_status(400, "<html>bad gateway</html>").message(), None);
    assert_eq!(ApiError::from_status(400, r#"{"message":"  "}"#).message(), None);
    assert_eq!(ApiError::from_status(400, r#"{"error":"x"}"#).message(), None);
}

#[test]
fn user_message_falls_back_for_transport_failures() {
    let err = ApiError::network("Failed to fetch");
    assert_eq!(err.message(), Some("Failed to fetch"));
    assert_eq!(err.user_message("Login failed"), "Login failed");
}

#[test]
fn only_401_counts_as_unauthorized() {
    assert!(ApiError::from_status(401, "").is_unauthorized());
    assert!(!ApiError::from_status(403, "").is_unauthorized());
    assert!(!ApiError::network("down").is_unauthorized());
}

#[test]
fn storage_errors_convert_with_message() {
    let err = ApiError::from(StorageError::Unavailable);
    assert!(matches!(err, ApiError::Storage { .. }));
    assert_eq!(err.status(), None);
    assert_eq!(err.message(), Some("local storage unavailable"));
}
