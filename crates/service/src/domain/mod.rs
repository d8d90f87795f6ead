//! Domain model for the booking engine.
//!
//! Entities validate their own invariants on construction; adapters rebuild
//! them from storage rows through the public fields.

pub mod booking;
pub mod catalog;
pub mod client;
pub mod provider;
pub mod schedule;
pub mod tax_id;

pub use booking::{Booking, BookingRequest, BookingStatus, MAX_NOTES_CHARS};
pub use catalog::{Catalog, NewCatalog};
pub use client::{Client, NewClient};
pub use provider::{NewProvider, Provider};
pub use schedule::{DailySchedule, Interval};

/// New time-ordered identifier for any entity.
pub fn new_id() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} required"));
    }
    Ok(())
}

pub(crate) fn check_email(email: Option<&str>) -> Result<(), String> {
    match email {
        Some(e) if !e.contains('@') => Err("invalid email".into()),
        _ => Ok(()),
    }
}
