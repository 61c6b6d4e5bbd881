//! Typed views of the stored documents.
//!
//! Handlers move `serde_json` documents straight through; these types describe
//! the wire shape for the generated API docs and for typed clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Store-assigned identifier (24 hex characters).
    #[serde(rename = "_id")]
    #[schema(example = "65e0f0d9c3a2b6a8e7b1c3d4")]
    pub id: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Unique across all customers.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Product {
    #[serde(rename = "_id")]
    #[schema(example = "60c72b2f9b1d8a5a2c8f9e4b")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Frosted Flakes")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Kellogs")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 5.99)]
    pub price: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct ProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Frosted Flakes")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Kellogs")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 5.99)]
    pub price: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "completed", "cancelled"];
    pub const DEFAULT_VALUE: &'static str = "pending";

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line item. Duplicate product ids are kept as separate lines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderLine {
    #[serde(rename = "productID")]
    #[schema(example = "65e1a2b3c4d5e6f7a8b9c0d1")]
    pub product_id: String,
    #[schema(example = 2, minimum = 1)]
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Order {
    #[serde(rename = "_id")]
    #[schema(example = "65e2f3a4b5c6d7e8f9a0b1c2")]
    pub id: String,
    /// Not checked against the customers collection.
    #[serde(rename = "customerID")]
    #[schema(example = "65e0f0d9c3a2b6a8e7b1c3d4")]
    pub customer_id: String,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Client-supplied; never recomputed from the line items.
    #[schema(example = 199.99)]
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderInput {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    pub total: f64,
}

/// Body of every error response and of successful deletes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product not found")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_values_match_serde_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
            assert!(OrderStatus::VALUES.contains(&status.as_str()));
        }
        assert_eq!(OrderStatus::default().as_str(), OrderStatus::DEFAULT_VALUE);
    }

    #[test]
    fn order_document_deserializes_into_typed_view() {
        let order: Order = serde_json::from_value(json!({
            "_id": "65e2f3a4b5c6d7e8f9a0b1c2",
            "customerID": "65e0f0d9c3a2b6a8e7b1c3d4",
            "products": [{"productID": "65e1a2b3c4d5e6f7a8b9c0d1", "quantity": 2}],
            "status": "cancelled",
            "total": 199.99
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.products[0].quantity, 2);
    }
}
