use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_email, new_id, require_text};
use crate::errors::ServiceError;

/// Registration input for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

impl Client {
    pub fn new(input: NewClient) -> Result<Self, ServiceError> {
        let invalid = ServiceError::InvalidClient;
        require_text(&input.name, "name").map_err(invalid)?;
        require_text(&input.phone, "phone").map_err(invalid)?;
        check_email(input.email.as_deref()).map_err(invalid)?;
        Ok(Self {
            id: new_id(),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone.trim().to_string(),
        })
    }
}
