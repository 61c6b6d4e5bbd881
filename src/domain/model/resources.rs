use super::schema::{DefaultValue, FieldSpec, FieldType};
use super::{OrderStatus, ResourceModel};

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("firstName", FieldType::String).required(),
    FieldSpec::new("middleName", FieldType::String),
    FieldSpec::new("lastName", FieldType::String).required(),
    FieldSpec::new("email", FieldType::String).required().unique(),
];

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", FieldType::String),
    FieldSpec::new("manufacturer", FieldType::String),
    FieldSpec::new("price", FieldType::Number),
];

const ORDER_LINE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("productID", FieldType::ObjectId).required(),
    FieldSpec::new("quantity", FieldType::Integer).required().min(1.0),
];

// customerID/productID are soft references: only their format is checked.
const ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("customerID", FieldType::ObjectId).required(),
    FieldSpec::new("products", FieldType::Array(ORDER_LINE_FIELDS))
        .default_value(DefaultValue::EmptyArray),
    FieldSpec::new("status", FieldType::Enum(OrderStatus::VALUES))
        .default_value(DefaultValue::Str(OrderStatus::DEFAULT_VALUE)),
    FieldSpec::new("total", FieldType::Number).required(),
];

pub struct CustomerModel;

impl ResourceModel for CustomerModel {
    fn model_name(&self) -> &'static str {
        "Customer"
    }

    fn collection_name(&self) -> &'static str {
        "customers"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        CUSTOMER_FIELDS
    }
}

pub struct ProductModel;

impl ResourceModel for ProductModel {
    fn model_name(&self) -> &'static str {
        "Product"
    }

    fn collection_name(&self) -> &'static str {
        "products"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        PRODUCT_FIELDS
    }
}

pub struct OrderModel;

impl ResourceModel for OrderModel {
    fn model_name(&self) -> &'static str {
        "Order"
    }

    fn collection_name(&self) -> &'static str {
        "orders"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        ORDER_FIELDS
    }
}

/// Every model the service mounts, in bootstrap order.
pub fn all_models() -> [&'static dyn ResourceModel; 3] {
    [&CustomerModel, &ProductModel, &OrderModel]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_customer_email_is_unique() {
        assert_eq!(CustomerModel.unique_fields(), vec!["email"]);
        assert!(ProductModel.unique_fields().is_empty());
        assert!(OrderModel.unique_fields().is_empty());
    }

    #[test]
    fn customer_requires_names_and_email() {
        let err = CustomerModel
            .validate_create_payload(&json!({"middleName": "Q"}))
            .unwrap_err();
        assert!(err.has_path("firstName"));
        assert!(err.has_path("lastName"));
        assert!(err.has_path("email"));
        assert!(!err.has_path("middleName"));
        assert!(err.to_string().starts_with("Customer validation failed"));
    }

    #[test]
    fn customer_rejects_blank_names_and_email() {
        let err = CustomerModel
            .validate_create_payload(&json!({"firstName": "", "lastName": "", "email": ""}))
            .unwrap_err();
        assert!(err.has_path("firstName"));
        assert!(err.has_path("lastName"));
        assert!(err.has_path("email"));

        let err = CustomerModel
            .validate_update_payload(&json!({"email": ""}))
            .unwrap_err();
        assert!(err.to_string().contains("Path `email` is required."));
    }

    #[test]
    fn product_fields_are_all_optional() {
        let doc = ProductModel.validate_create_payload(&json!({})).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn order_defaults_status_and_keeps_client_total() {
        let doc = OrderModel
            .validate_create_payload(&json!({
                "customerID": "65e0f0d9c3a2b6a8e7b1c3d4",
                "products": [
                    {"productID": "65e1a2b3c4d5e6f7a8b9c0d1", "quantity": 2},
                    {"productID": "65e1a2b3c4d5e6f7a8b9c0d1", "quantity": 1}
                ],
                "total": 1.0
            }))
            .unwrap();
        assert_eq!(doc["status"], json!("pending"));
        assert_eq!(doc["total"], json!(1.0));
        // duplicate line items are kept as submitted
        assert_eq!(doc["products"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn order_line_quantity_must_be_at_least_one() {
        let err = OrderModel
            .validate_create_payload(&json!({
                "customerID": "65e0f0d9c3a2b6a8e7b1c3d4",
                "products": [{"productID": "65e1a2b3c4d5e6f7a8b9c0d1", "quantity": 0}],
                "total": 10
            }))
            .unwrap_err();
        assert!(err.has_path("products.0.quantity"));
    }

    #[test]
    fn order_update_allows_any_status_but_only_known_ones() {
        let patch = OrderModel
            .validate_update_payload(&json!({"status": "pending"}))
            .unwrap();
        assert_eq!(patch.set["status"], json!("pending"));

        let err = OrderModel
            .validate_update_payload(&json!({"status": "shipped"}))
            .unwrap_err();
        assert!(err.has_path("status"));
    }
}
