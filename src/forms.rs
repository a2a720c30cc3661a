//! Form Models
//!
//! TigerStyle: Typed request bodies for the mutating endpoints.
//!
//! The FastUI client submits forms as `multipart/form-data`; plain
//! urlencoded bodies are accepted too. Either way the body is read into
//! flat `name -> value` pairs and handed to [`FormModel::from_fields`],
//! which builds the typed struct or reports every bad field at once.

use crate::components::{FormField, InputHtmlType};
use crate::pages::ApiError;
use crate::users::USER_DOB_FORMAT;
use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Title of the name input
pub const NAME_FIELD_TITLE: &str = "Имя";

/// Title of the date of birth input
pub const DOB_FIELD_TITLE: &str = "Дата рождения";

/// Maximum number of fields read from a submitted body
pub const FORM_FIELDS_COUNT_MAX: usize = 32;

// =============================================================================
// Form Model
// =============================================================================

/// Raw submitted fields
pub type RawFields = HashMap<String, String>;

/// A typed form: describes its inputs and validates submissions
pub trait FormModel: Sized {
    /// Inputs the client should render for this form
    fn form_fields() -> Vec<FormField>;

    /// Build the typed value from submitted fields
    fn from_fields(fields: &RawFields) -> Result<Self, ValidationErrors>;
}

/// Payload of the create-user form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAdd {
    pub name: String,
    pub dob: NaiveDate,
}

impl FormModel for UserAdd {
    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::input("name", NAME_FIELD_TITLE, InputHtmlType::Text),
            FormField::input("dob", DOB_FIELD_TITLE, InputHtmlType::Date),
        ]
    }

    fn from_fields(fields: &RawFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = required(fields, "name", &mut errors).map(str::to_string);
        let dob = required(fields, "dob", &mut errors).and_then(|raw| {
            NaiveDate::parse_from_str(raw, USER_DOB_FORMAT)
                .map_err(|_| errors.push(FieldError::invalid_date("dob")))
                .ok()
        });

        match (name, dob) {
            (Some(name), Some(dob)) if errors.is_empty() => Ok(Self { name, dob }),
            _ => Err(errors),
        }
    }
}

/// Payload of the delete-user form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDelete {
    pub id: i64,
}

impl FormModel for UserDelete {
    fn form_fields() -> Vec<FormField> {
        vec![FormField::input("id", "", InputHtmlType::Hidden)]
    }

    fn from_fields(fields: &RawFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let id = required(fields, "id", &mut errors).and_then(|raw| {
            raw.parse::<i64>()
                .map_err(|_| errors.push(FieldError::invalid_int("id")))
                .ok()
        });

        match id {
            Some(id) => Ok(Self { id }),
            None => Err(errors),
        }
    }
}

/// Trimmed, non-empty value of a required field.
///
/// The client sends untouched inputs as empty strings, so blank counts as
/// missing.
fn required<'a>(fields: &'a RawFields, name: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
    match fields.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            errors.push(FieldError::missing(name));
            None
        }
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// A validated form submission
#[derive(Debug, Clone)]
pub struct FastUiForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FastUiForm<T>
where
    T: FormModel,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        let fields = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            let Form(fields) = Form::<RawFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            fields
        };

        T::from_fields(&fields).map(Self).map_err(|errors| {
            tracing::warn!(errors = errors.len(), "Rejected form submission");
            ApiError::Validation(errors)
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RawFields, ApiError> {
    let mut fields = RawFields::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if fields.len() >= FORM_FIELDS_COUNT_MAX {
            return Err(ApiError::BadRequest(format!(
                "too many form fields: > {}",
                FORM_FIELDS_COUNT_MAX
            )));
        }

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        fields.insert(name, value);
    }

    Ok(fields)
}

// =============================================================================
// Errors
// =============================================================================

/// One rejected field, in the shape the FastUI client shows next to inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<String>,
    pub msg: &'static str,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        Self {
            kind: "missing",
            loc: vec![field.to_string()],
            msg: "Field required",
        }
    }

    pub fn invalid_date(field: &str) -> Self {
        Self {
            kind: "date_parsing",
            loc: vec![field.to_string()],
            msg: "Input should be a valid date in the format YYYY-MM-DD",
        }
    }

    pub fn invalid_int(field: &str) -> Self {
        Self {
            kind: "int_parsing",
            loc: vec![field.to_string()],
            msg: "Input should be a valid integer, unable to parse string as an integer",
        }
    }
}

/// Every problem found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid form: {} field error(s)", .errors.len())]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
