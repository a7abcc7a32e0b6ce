//! Handlers for `/draft`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/draft?date=` | Selections keyed by identity; `{}` when none |
//! | `PUT`    | `/draft` | Body: `{"date": "...", "marked": [...]}`; replaces the date's draft |
//! | `DELETE` | `/draft?date=` | Returns `{"ok": true, "removed": n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use shrift_core::{
  calendar::CalendarSource,
  desk::{Desk, DraftCleared, DraftSaved, Submission},
  draft::DraftSelections,
  mail::Mailer,
  store::AttendanceStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct DraftParams {
  pub date: String,
}

/// `GET /draft?date=YYYY-MM-DD`
pub async fn get<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Query(params): Query<DraftParams>,
) -> Result<Json<DraftSelections>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.draft(&params.date).await?))
}

/// `PUT /draft`
pub async fn save<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Json(body): Json<Submission>,
) -> Result<Json<DraftSaved>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.save_draft(body).await?))
}

/// `DELETE /draft?date=YYYY-MM-DD`
pub async fn clear<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Query(params): Query<DraftParams>,
) -> Result<Json<DraftCleared>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.clear_draft(&params.date).await?))
}
