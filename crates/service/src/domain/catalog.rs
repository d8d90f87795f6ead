use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{new_id, require_text};
use crate::errors::ServiceError;

/// Registration input for a catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalog {
    pub name: String,
    pub standard_duration_minutes: u32,
    /// Price in cents.
    pub price: i64,
    pub category: String,
    pub image_url: Option<String>,
}

/// A bookable offering with a fixed duration and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub id: Uuid,
    pub name: String,
    pub standard_duration_minutes: u32,
    pub price: i64,
    pub category: String,
    pub image_url: Option<String>,
}

impl Catalog {
    pub fn new(input: NewCatalog) -> Result<Self, ServiceError> {
        let invalid = ServiceError::InvalidCatalog;
        require_text(&input.name, "name").map_err(invalid)?;
        require_text(&input.category, "category").map_err(invalid)?;
        if input.standard_duration_minutes <= 1 {
            return Err(invalid("standard duration must be greater than 1 minute".into()));
        }
        if input.price < 0 {
            return Err(invalid("price must not be negative".into()));
        }
        Ok(Self {
            id: new_id(),
            name: input.name.trim().to_string(),
            standard_duration_minutes: input.standard_duration_minutes,
            price: input.price,
            category: input.category.trim().to_string(),
            image_url: input.image_url.filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.standard_duration_minutes))
    }
}
