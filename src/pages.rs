//! Page Handlers
//!
//! TigerStyle: HTTP surface of the user directory.
//!
//! Read endpoints return a page as a UI tree. Mutating endpoints change the
//! store and answer with a navigation instruction back to the listing.
//!
//! Routes:
//! - `GET  /api/`              user listing
//! - `GET  /api/user/add`      add-user form
//! - `POST /api/user`          create a user
//! - `GET  /api/user/{id}/`    profile with delete button
//! - `POST /api/user/delete`   delete a user
//! - anything else (GET)       landing document
//!
//! `/api` and `/api/user/{id}` without the trailing slash redirect to the
//! slash form.

use crate::components::{Component, DisplayLookup, DisplayMode, Event, FormField, FormMethod};
use crate::forms::{
    FastUiForm, FormModel, UserAdd, UserDelete, ValidationErrors, DOB_FIELD_TITLE, NAME_FIELD_TITLE,
};
use crate::landing::LandingConfig;
use crate::users::{SharedUserStore, UserError};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Submit target of the add-user form
pub const ADD_USER_SUBMIT_URL: &str = "/api/user";

/// Submit target of the delete-user form
pub const DELETE_USER_SUBMIT_URL: &str = "/api/user/delete";

/// Client route of the listing page
pub const USERS_ROUTE: &str = "/";

/// Client route of the add-user page
pub const ADD_USER_ROUTE: &str = "/user/add";

/// Client route of a profile; `{id}` is filled in per table row
pub const USER_PROFILE_ROUTE: &str = "/user/{id}/";

/// Page event that submits the hidden delete form
pub const DELETE_USER_EVENT: &str = "delete-user";

/// Detail sent with a 404 for an unknown user
pub const USER_NOT_FOUND_DETAIL: &str = "User not found";

const USERS_HEADING: &str = "Пользователи";
const ADD_USER_LABEL: &str = "Добавить пользователя";
const DELETE_USER_LABEL: &str = "Удалить пользователя";
const ADD_PAGE_BACK_LABEL: &str = "Назад";
const PROFILE_BACK_LABEL: &str = "Back";
const ID_TITLE: &str = "Id";

// =============================================================================
// State
// =============================================================================

/// Shared state for page handlers
#[derive(Clone)]
pub struct AppState {
    pub users: SharedUserStore,
    landing: Arc<str>,
}

impl AppState {
    /// Build handler state; the landing document is rendered once here
    pub fn new(users: SharedUserStore, landing: &LandingConfig) -> Self {
        Self {
            users,
            landing: landing.render().into(),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(redirect_trailing_slash))
        .route("/api/", get(users_table))
        .route("/api/user", post(add_user))
        .route("/api/user/add", get(add_user_page))
        .route("/api/user/delete", post(delete_user))
        .route("/api/user/:user_id", get(redirect_trailing_slash))
        .route("/api/user/:user_id/", get(user_profile))
        .fallback(get(html_landing))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Columns shared by the listing table and the profile details
fn user_fields(name: DisplayLookup) -> Vec<DisplayLookup> {
    vec![
        DisplayLookup::new("id", ID_TITLE),
        name,
        DisplayLookup::new("dob", DOB_FIELD_TITLE).with_mode(DisplayMode::Date),
    ]
}

// =============================================================================
// Handlers
// =============================================================================

async fn users_table(State(state): State<AppState>) -> Result<Json<Vec<Component>>, ApiError> {
    let users = state.users.read().await;
    tracing::debug!(count = users.len(), "Listing users");

    let table = Component::table(
        users.list(),
        user_fields(
            DisplayLookup::new("name", NAME_FIELD_TITLE)
                .with_on_click(Event::go_to(USER_PROFILE_ROUTE)),
        ),
    )?;

    Ok(Json(vec![Component::page(vec![
        Component::heading(USERS_HEADING),
        table,
        Component::button(ADD_USER_LABEL, Event::go_to(ADD_USER_ROUTE)),
    ])]))
}

async fn add_user_page() -> Json<Vec<Component>> {
    Json(vec![Component::page(vec![
        Component::back_link(ADD_PAGE_BACK_LABEL),
        Component::heading(ADD_USER_LABEL),
        Component::model_form(ADD_USER_SUBMIT_URL, UserAdd::form_fields()),
    ])])
}

async fn add_user(
    State(state): State<AppState>,
    FastUiForm(form): FastUiForm<UserAdd>,
) -> Json<Vec<Component>> {
    let user = state.users.write().await.add(form.name, form.dob);
    tracing::info!(user_id = user.id, name = %user.name, dob = %user.dob, "Added user");

    Json(vec![Component::go_to(USERS_ROUTE)])
}

async fn user_profile(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Component>>, ApiError> {
    let Path(user_id) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;

    let user = match state.users.read().await.get(user_id) {
        Ok(user) => user.clone(),
        Err(e) => {
            tracing::warn!(user_id = user_id, "Profile requested for unknown user");
            return Err(e.into());
        }
    };
    tracing::debug!(user_id = user_id, "Showing profile");

    let details = Component::details(
        &user,
        user_fields(DisplayLookup::new("name", NAME_FIELD_TITLE)),
    )?;

    Ok(Json(vec![Component::page(vec![
        Component::heading(user.name.as_str()),
        Component::back_link(PROFILE_BACK_LABEL),
        details,
        Component::button(DELETE_USER_LABEL, Event::page(DELETE_USER_EVENT)),
        Component::Form {
            submit_url: DELETE_USER_SUBMIT_URL.to_string(),
            form_fields: vec![FormField::hidden("id", user.id)],
            method: FormMethod::Post,
            footer: Some(vec![]),
            submit_trigger: Some(Event::page(DELETE_USER_EVENT)),
        },
    ])]))
}

async fn delete_user(
    State(state): State<AppState>,
    FastUiForm(form): FastUiForm<UserDelete>,
) -> Json<Vec<Component>> {
    let removed = state.users.write().await.delete(form.id);
    tracing::info!(user_id = form.id, removed = removed, "Deleted user");

    Json(vec![Component::go_to(USERS_ROUTE)])
}

async fn redirect_trailing_slash(uri: Uri) -> Redirect {
    let target = match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    };
    Redirect::temporary(&target)
}

async fn html_landing(State(state): State<AppState>) -> Html<String> {
    Html(state.landing.to_string())
}

// =============================================================================
// Errors
// =============================================================================

/// Failures surfaced to the client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::User(UserError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "detail": USER_NOT_FOUND_DETAIL }),
            ),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({ "detail": { "form": errors } }),
            ),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "detail": msg }),
            ),
            Self::InvalidPath(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({ "detail": msg }),
            ),
            Self::Serialization(e) => {
                tracing::error!(error = %e, "Failed to serialize page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "detail": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
