//! Handover board library
//!
//! Shift handover notes for a hotel front desk: persistence, schedules and
//! the view pipeline that filters, sorts, groups and labels a day's notes.

pub mod app;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod services;
pub mod view;
