//! Common library for the team event calendar backend
//!
//! This crate provides functionality shared across the calendar backend:
//! PostgreSQL connectivity, database error handling, and the pure
//! date/calendar computations used by the event API.

pub mod calendar;
pub mod database;
pub mod error;
