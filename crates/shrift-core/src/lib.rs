//! Core types and services for the shrift confession-attendance desk.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! attendance tables, the calendar feed and outgoing mail are reached through
//! the [`store::AttendanceStore`], [`calendar::CalendarSource`] and
//! [`mail::Mailer`] traits; other crates supply the implementations.

// Native `async fn` in traits; the public traits spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod date;
pub mod desk;
pub mod draft;
pub mod error;
pub mod history;
pub mod identity;
pub mod mail;
pub mod notify;
pub mod record;
pub mod roster;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
