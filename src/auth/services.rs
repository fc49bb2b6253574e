use tracing::warn;

use super::{
    dto::LoginRequest,
    password::verify_password,
    repo::UserRepo,
    repo_types::User,
};
use crate::error::{AppError, FieldErrors};

/// Credentials that passed presence checks.
#[derive(Debug, PartialEq, Eq)]
pub struct LoginCredentials {
    pub credential: String,
    pub password: String,
}

pub fn validate_login(req: LoginRequest) -> Result<LoginCredentials, AppError> {
    let mut errors = FieldErrors::new();

    // Matched verbatim against username and email; only blank is rejected.
    let credential = req.credential.filter(|c| !c.trim().is_empty());
    if credential.is_none() {
        errors.insert("credential".into(), "Email or username is required".into());
    }

    let password = req.password.filter(|p| !p.is_empty());
    if password.is_none() {
        errors.insert("password".into(), "Password is required".into());
    }

    match (credential, password) {
        (Some(credential), Some(password)) => Ok(LoginCredentials {
            credential,
            password,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

/// Both "no such user" and "wrong password" map to
/// [`AppError::InvalidCredentials`].
pub async fn authenticate(
    users: &dyn UserRepo,
    credential: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(user) = users.find_by_credential(credential).await? else {
        warn!("login for unknown credential");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.hashed_password) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}
