//! shrift HTTP server: wiring of the SQLite store, the JSON calendar
//! directory and the mailer behind the attendance API.

pub mod calendar;
pub mod config;
pub mod mail;

use std::sync::Arc;

use axum::Router;
use shrift_core::{calendar::CalendarSource, desk::Desk, mail::Mailer, store::AttendanceStore};
use tower_http::trace::TraceLayer;

pub use self::{
  calendar::JsonCalendarDir,
  config::{ServerConfig, expand_tilde},
  mail::ServerMailer,
};

/// Build the full application router, with request tracing.
pub fn router<S, C, M>(desk: Arc<Desk<S, C, M>>) -> Router
where
  S: AttendanceStore + 'static,
  C: CalendarSource + 'static,
  M: Mailer + 'static,
{
  shrift_api::api_router(desk).layer(TraceLayer::new_for_http())
}
