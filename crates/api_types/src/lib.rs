//! Bodies exchanged over the HTTP API.
//!
//! Both shapes are encoded in whichever media type the request negotiated,
//! so they stay plain structs with a single field.
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// Media types accepted on `POST /expenses`.
    pub const JSON: &str = "application/json";
    pub const XML: &str = "text/xml";

    /// Body of a successful `POST /expenses`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub expense_id: i32,
    }
}

/// Body of every failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
