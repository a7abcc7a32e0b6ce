//! Handlers for `/settings`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings` | Effective settings, defaults filled in |
//! | `PUT`  | `/settings/{key}` | Body: `{"value":"..."}`; returns effective settings |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use shrift_core::{
  calendar::CalendarSource,
  desk::Desk,
  mail::Mailer,
  store::AttendanceStore,
};

use crate::error::ApiError;

/// `GET /settings`
pub async fn list<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
) -> Result<Json<BTreeMap<String, String>>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.settings().await?.to_pairs()))
}

#[derive(Debug, Deserialize)]
pub struct PutBody {
  pub value: String,
}

/// `PUT /settings/{key}`
pub async fn put_one<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Path(key): Path<String>,
  Json(body): Json<PutBody>,
) -> Result<Json<BTreeMap<String, String>>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  if key.trim().is_empty() {
    return Err(ApiError::BadRequest("setting key must not be empty".into()));
  }
  let settings = desk
    .put_setting(&key, &body.value)
    .await
    .map_err(|e| {
      if e.is_configuration() {
        ApiError::BadRequest(e.to_string())
      } else {
        ApiError::from(e)
      }
    })?;
  Ok(Json(settings.to_pairs()))
}
