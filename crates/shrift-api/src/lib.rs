//! JSON API for the shrift attendance form.
//!
//! Exposes an axum [`Router`] backed by a [`Desk`]. Auth, TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", shrift_api::api_router(desk.clone()))
//! ```

pub mod attendance;
pub mod draft;
pub mod error;
pub mod roster;
pub mod settings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use shrift_core::{
  calendar::CalendarSource, desk::Desk, mail::Mailer, store::AttendanceStore,
};

pub use error::ApiError;

/// Build the API router for `desk`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C, M>(desk: Arc<Desk<S, C, M>>) -> Router<()>
where
  S: AttendanceStore + 'static,
  C: CalendarSource + 'static,
  M: Mailer + 'static,
{
  Router::new()
    // Roster
    .route("/roster", get(roster::get::<S, C, M>))
    .route("/roster/build", post(roster::build::<S, C, M>))
    // Drafts
    .route(
      "/draft",
      get(draft::get::<S, C, M>)
        .put(draft::save::<S, C, M>)
        .delete(draft::clear::<S, C, M>),
    )
    // Final submission
    .route("/attendance", post(attendance::finalize::<S, C, M>))
    // Settings
    .route("/settings", get(settings::list::<S, C, M>))
    .route("/settings/{key}", put(settings::put_one::<S, C, M>))
    .with_state(desk)
}

// ─── Integration tests ────────────────────────────────────────────────────────
