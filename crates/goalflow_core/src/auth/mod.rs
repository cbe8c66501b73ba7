use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AppError;

mod firebase;

pub use firebase::FirebaseIdentity;

const API_KEY_ENV_VAR: &str = "GOALFLOW_AUTH_API_KEY";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
}

pub trait IdentityProvider: std::fmt::Debug {
    fn create_account(&self, email: &str, password: &str) -> Result<UserSession, AppError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AppError>;

    fn sign_out(&self, session: &UserSession) -> Result<(), AppError> {
        let _ = session;
        Ok(())
    }
}

pub fn provider_from_env() -> Result<Box<dyn IdentityProvider>, AppError> {
    let api_key = std::env::var(API_KEY_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::auth_unavailable(format!(
                "auth is not configured: {API_KEY_ENV_VAR} is not set"
            ))
        })?;

    Ok(Box::new(FirebaseIdentity::new(api_key)))
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::invalid_input("a valid email is required"));
    }
    if password.len() < 6 {
        return Err(AppError::invalid_input(
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

pub fn session_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("GOALFLOW_SESSION_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("goalflow")
            .join(SESSION_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goalflow")
            .join(SESSION_FILE_NAME))
    }
}

pub fn save_session(path: &Path, session: &UserSession) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(session)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

pub fn current_session(path: &Path) -> Result<Option<UserSession>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let session =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok(Some(session))
}

pub fn clear_session(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|err| AppError::io(err.to_string()))
}
