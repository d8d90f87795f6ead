//! Provider availability and booking conflict engine.
//! - `domain` holds the entities and their invariants.
//! - `repository` declares the storage ports; `repo` implements them in memory and over SeaORM.
//! - `services` orchestrates booking creation, schedule publication and registration.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod pagination;
pub mod repo;
pub mod repository;
pub mod services;
#[cfg(test)]
pub mod test_support;

pub use errors::{ErrorKind, ServiceError};
