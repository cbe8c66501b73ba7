use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::{IdentityProvider, UserSession, validate_credentials};

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug)]
pub struct FirebaseIdentity {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn call(&self, endpoint: &str, email: &str, password: &str) -> Result<UserSession, AppError> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, endpoint, self.api_key
        );
        let request = CredentialRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .map_err(|err| AppError::auth_unavailable(format!("auth request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| AppError::auth_unavailable(format!("auth response unreadable: {err}")))?;

        if !status.is_success() {
            return Err(map_error_body(&body));
        }

        parse_session_response(&body)
    }
}

impl IdentityProvider for FirebaseIdentity {
    fn create_account(&self, email: &str, password: &str) -> Result<UserSession, AppError> {
        validate_credentials(email, password)?;
        self.call("signUp", email, password)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AppError> {
        validate_credentials(email, password)?;
        self.call("signInWithPassword", email, password)
    }
}

fn parse_session_response(body: &str) -> Result<UserSession, AppError> {
    let response: SessionResponse = serde_json::from_str(body)
        .map_err(|err| AppError::auth_unavailable(format!("auth response invalid: {err}")))?;

    Ok(UserSession {
        uid: response.local_id,
        email: response.email,
        id_token: response.id_token,
    })
}

fn map_error_body(body: &str) -> AppError {
    let code = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error.message)
        .unwrap_or_default();

    match code.as_str() {
        "EMAIL_EXISTS" => AppError::invalid_input("an account with this email already exists"),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AppError::invalid_input("email or password is incorrect")
        }
        "WEAK_PASSWORD" => AppError::invalid_input("password must be at least 6 characters"),
        "" => AppError::auth_unavailable("auth request rejected"),
        other => AppError::auth_unavailable(format!("auth request rejected: {other}")),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::{map_error_body, parse_session_response};

    #[test]
    fn parse_session_response_maps_wire_fields() {
        let body = r#"{
            "localId": "uid-1",
            "email": "user@example.com",
            "idToken": "token-abc",
            "refreshToken": "ignored",
            "expiresIn": "3600"
        }"#;

        let session = parse_session_response(body).unwrap();
        assert_eq!(session.uid, "uid-1");
        assert_eq!(session.email, "user@example.com");
        assert_eq!(session.id_token, "token-abc");
    }

    #[test]
    fn parse_session_response_rejects_malformed_body() {
        let err = parse_session_response("{}").unwrap_err();
        assert_eq!(err.code(), "auth_unavailable");
    }

    #[test]
    fn known_error_codes_become_user_errors() {
        let body = r#"{"error": {"message": "EMAIL_EXISTS"}}"#;
        assert_eq!(map_error_body(body).code(), "invalid_input");

        let body = r#"{"error": {"message": "INVALID_LOGIN_CREDENTIALS"}}"#;
        assert_eq!(map_error_body(body).code(), "invalid_input");
    }

    #[test]
    fn unknown_error_codes_stay_auth_unavailable() {
        let body = r#"{"error": {"message": "QUOTA_EXCEEDED"}}"#;
        let err = map_error_body(body);
        assert_eq!(err.code(), "auth_unavailable");
        assert!(err.message().contains("QUOTA_EXCEEDED"));

        assert_eq!(map_error_body("garbage").code(), "auth_unavailable");
    }
}
