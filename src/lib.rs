//! User Directory - Server-Driven UI over an In-Memory Store
//!
//! A minimal user directory rendered by the prebuilt FastUI client.
//!
//! Features:
//! - List, add, view and delete users
//! - Pages returned as declarative UI trees (FastUI JSON)
//! - Process-lifetime store seeded with a single user

pub mod components;
pub mod forms;
pub mod landing;
pub mod pages;
pub mod users;

pub use pages::{router, AppState};

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default HTTP bind address
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8000";

/// Application name
pub const APP_NAME: &str = "userdir";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
