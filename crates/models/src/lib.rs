//! SeaORM entities for the booking schema plus the few queries the
//! storage adapters share.

pub mod errors;
pub mod db;
pub mod catalog;
pub mod client;
pub mod provider;
pub mod provider_catalog;
pub mod daily_schedule;
pub mod schedule_interval;
pub mod booking;

#[cfg(test)]
mod tests;
