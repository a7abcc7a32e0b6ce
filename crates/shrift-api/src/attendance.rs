//! Handler for `POST /attendance`: the final submission.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use shrift_core::{
  calendar::CalendarSource,
  desk::{Desk, Submission},
  mail::Mailer,
  store::AttendanceStore,
};

use crate::error::ApiError;

/// `POST /attendance`, body `{"date": "...", "marked": [...]}`.
///
/// Returns 201 once the rows are stored, even if a notification failed; the
/// body's `notifications` list says which.
pub async fn finalize<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Json(body): Json<Submission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  let finalized = desk.finalize(body).await?;
  Ok((StatusCode::CREATED, Json(finalized)))
}
