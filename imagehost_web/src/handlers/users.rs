use axum::{
    extract::{Form, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use imagehost_core::service::users::{is_valid_password, NewUser};

use super::{expired_session_cookie, session_cookie, session_id_from_headers};
use crate::view::{error_page, View};
use crate::AppState;

pub(crate) const PASSWORD_ERROR: &str =
    "Password must contain at least 1 alphabet, 1 number & 1 special character";

/// GET /users/registration — blank user with an attached blank profile for
/// the form to bind against.
pub async fn registration_form() -> View {
    View::new("users/registration", json!({ "user": NewUser::default() }))
}

#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub mobile_number: String,
}

impl From<RegistrationForm> for NewUser {
    fn from(form: RegistrationForm) -> Self {
        NewUser {
            username: form.username,
            password: form.password,
            full_name: form.full_name,
            email_address: form.email_address,
            mobile_number: form.mobile_number,
        }
    }
}

/// POST /users/registration — validate the password policy, then persist.
/// A policy failure re-renders the form with the submitted data; nothing is
/// persisted and the failure is a single message, not a per-class report.
pub async fn register_user(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let new_user = NewUser::from(form);

    if !is_valid_password(&new_user.password) {
        return View::new(
            "users/registration",
            json!({
                "user": new_user,
                "password_type_error": PASSWORD_ERROR,
            }),
        )
        .into_response();
    }

    match state.users.register(new_user).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "registered user");
            Redirect::to("/users/login").into_response()
        }
        Err(e) => {
            tracing::error!("registration failed: {e}");
            error_page()
        }
    }
}

/// GET /users/login
pub async fn login_form() -> View {
    View::new("users/login", json!({}))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /users/login — on a credential match, store the user in a fresh
/// session and redirect to the feed. On mismatch, re-render the login form
/// with nothing echoed and no error distinguished from a blank form.
pub async fn login_user(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.users.login(&form.username, &form.password).await {
        Ok(Some(user)) => {
            let session_id = state.sessions.create().await;
            state.sessions.set_logged_user(&session_id, &user).await;
            tracing::info!(username = %user.username, "successful login");
            (
                [(header::SET_COOKIE, session_cookie(&session_id))],
                Redirect::to("/images"),
            )
                .into_response()
        }
        Ok(None) => {
            tracing::warn!(username = %form.username, "failed login attempt");
            View::new("users/login", json!({})).into_response()
        }
        Err(e) => {
            tracing::error!("login failed: {e}");
            error_page()
        }
    }
}

/// POST /users/logout — destroy the whole session (every attribute, not just
/// the auth key), expire the cookie and land on the full image list.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        state.sessions.invalidate(&id).await;
    }

    match state.images.list_images().await {
        Ok(images) => (
            [(header::SET_COOKIE, expired_session_cookie())],
            View::new("index", json!({ "images": images })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("listing images failed: {e}");
            error_page()
        }
    }
}
