//! Request DTOs with validation.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use wsso_core::error::AppError;

use crate::error::ApiError;

const BLANK: &str = "blank";

/// Login request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(custom(
        function = "not_blank",
        message = "Username or password can't be empty."
    ))]
    pub username: String,
    /// Password.
    #[validate(custom(
        function = "not_blank",
        message = "Username or password can't be empty."
    ))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Self-registration request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(custom(
        function = "not_blank",
        message = "Username, password or email can't be empty."
    ))]
    pub username: String,
    /// Password.
    #[validate(custom(
        function = "not_blank",
        message = "Username, password or email can't be empty."
    ))]
    pub password: String,
    /// Email.
    #[validate(
        custom(
            function = "not_blank",
            message = "Username, password or email can't be empty."
        ),
        email(message = "Invalid email address.")
    )]
    pub email: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .field("email", &self.email)
            .finish()
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(BLANK));
    }
    Ok(())
}

/// JSON body that has been deserialized and validated.
///
/// An unparsable body is rejected with `Missing fields`; a validation
/// failure is rejected with the first field message, blank fields first.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "Rejected request body");
                ApiError(AppError::validation("Missing fields"))
            })?;

        value
            .validate()
            .map_err(|errors| ApiError(AppError::validation(first_message(&errors))))?;

        Ok(Self(value))
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let mut failures: Vec<(String, &ValidationError)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| (field.clone(), err))
        })
        .collect();
    failures.sort_by(|(a_field, a), (b_field, b)| {
        (a.code != BLANK, a_field).cmp(&(b.code != BLANK, b_field))
    });

    failures
        .into_iter()
        .find_map(|(_, err)| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request.".to_string())
}
