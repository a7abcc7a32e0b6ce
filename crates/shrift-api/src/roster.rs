//! Handlers for `/roster` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/roster/build` | Optional `?date=YYYY-MM-DD`; defaults to the coming Saturday |
//! | `GET`  | `/roster` | Optional `?date=`; rebuilds, then returns people and history |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use shrift_core::{
  calendar::CalendarSource,
  desk::{Desk, RosterAndHistory, RosterBuilt},
  mail::Mailer,
  store::AttendanceStore,
};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub date: Option<String>,
}

/// `POST /roster/build[?date=...]`
pub async fn build<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Query(params): Query<DateParams>,
) -> Result<Json<RosterBuilt>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.build_roster(params.date.as_deref()).await?))
}

/// `GET /roster[?date=...]`
pub async fn get<S, C, M>(
  State(desk): State<Arc<Desk<S, C, M>>>,
  Query(params): Query<DateParams>,
) -> Result<Json<RosterAndHistory>, ApiError>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  Ok(Json(desk.roster_and_history(params.date.as_deref()).await?))
}
