//! Declarative field specs and the generic validator that enforces them.
//!
//! Casting follows the document-store conventions clients already rely on:
//! strings accept numbers/bools (stringified), numbers accept numeric strings
//! and booleans (`true` is 1), `""` on a number field counts as `null`, an
//! empty string does not satisfy `required`, unknown top-level fields are
//! dropped.

use crate::domain::object_id::ObjectId;
use crate::storage::document::{Document, Patch};
use serde::Serialize;
use serde_json::{Number, Value as JsonValue};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Number,
    /// Whole numbers only; `2.0` is accepted, `2.5` is not.
    Integer,
    ObjectId,
    Enum(&'static [&'static str]),
    /// Array of embedded objects, each validated against the nested specs.
    Array(&'static [FieldSpec]),
}

impl FieldType {
    fn cast_name(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Enum(_) => "string",
            FieldType::Number => "Number",
            FieldType::Integer => "Integer",
            FieldType::ObjectId => "ObjectId",
            FieldType::Array(_) => "Array",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    EmptyArray,
}

impl DefaultValue {
    fn to_json(self) -> JsonValue {
        match self {
            DefaultValue::Str(s) => JsonValue::from(s),
            DefaultValue::EmptyArray => JsonValue::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Enforced by the store (unique index), not by the validator.
    pub unique: bool,
    pub min: Option<f64>,
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            unique: false,
            min: None,
            default: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub reason: String,
}

/// Every failing path for one payload, rendered as
/// `"<Model> validation failed: <path>: <reason>, <path>: <reason>"`.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    pub model: &'static str,
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed: ", self.model)?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", e.path, e.reason)?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, path: String, reason: String) {
        self.errors.push(FieldError { path, reason });
    }

    fn required(&mut self, path: String, name: &str) {
        self.push(path, format!("Path `{}` is required.", name));
    }
}

fn json_type_name(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "Array",
        JsonValue::Object(_) => "Object",
    }
}

fn cast_error(field_type: &FieldType, v: &JsonValue, path: &str) -> String {
    format!(
        "Cast to {} failed for value {} (type {}) at path \"{}\"",
        field_type.cast_name(),
        v,
        json_type_name(v),
        path
    )
}

fn number_from_f64(n: f64) -> Option<JsonValue> {
    Number::from_f64(n).map(JsonValue::Number)
}

/// Validates one present, non-null value. Returns `None` when an error was recorded.
fn cast_value(
    spec: &FieldSpec,
    v: &JsonValue,
    path: &str,
    errors: &mut Collector,
) -> Option<JsonValue> {
    let cast = match spec.field_type {
        FieldType::String => match v {
            JsonValue::String(_) => Some(v.clone()),
            JsonValue::Number(n) => Some(JsonValue::from(n.to_string())),
            JsonValue::Bool(b) => Some(JsonValue::from(b.to_string())),
            _ => None,
        },
        FieldType::Number => match v {
            JsonValue::Number(_) => Some(v.clone()),
            JsonValue::Bool(b) => Some(JsonValue::from(u8::from(*b))),
            JsonValue::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .and_then(number_from_f64),
            _ => None,
        },
        FieldType::Integer => {
            let n = match v {
                JsonValue::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                JsonValue::String(s) => s.trim().parse::<i64>().ok(),
                JsonValue::Bool(b) => Some(i64::from(*b)),
                _ => None,
            };
            n.map(JsonValue::from)
        }
        FieldType::ObjectId => v
            .as_str()
            .and_then(|s| ObjectId::parse_str(s).ok())
            .map(|id| JsonValue::from(id.to_hex())),
        FieldType::Enum(allowed) => match v.as_str() {
            Some(s) if allowed.contains(&s) => Some(v.clone()),
            Some(s) => {
                errors.push(
                    path.to_string(),
                    format!("`{}` is not a valid enum value for path `{}`.", s, spec.name),
                );
                return None;
            }
            None => None,
        },
        FieldType::Array(item_specs) => {
            let items = match v.as_array() {
                Some(items) => items,
                None => {
                    errors.push(path.to_string(), cast_error(&spec.field_type, v, path));
                    return None;
                }
            };
            let before = errors.errors.len();
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let item_path = format!("{}.{}", path, idx);
                match item.as_object() {
                    Some(obj) => {
                        out.push(JsonValue::Object(validate_fields(
                            item_specs, obj, &item_path, errors,
                        )));
                    }
                    None => errors.push(
                        item_path.clone(),
                        format!(
                            "Cast to Embedded failed for value {} (type {}) at path \"{}\"",
                            item,
                            json_type_name(item),
                            item_path
                        ),
                    ),
                }
            }
            if errors.errors.len() > before {
                return None;
            }
            return Some(JsonValue::Array(out));
        }
    };

    let value = match cast {
        Some(value) => value,
        None => {
            errors.push(path.to_string(), cast_error(&spec.field_type, v, path));
            return None;
        }
    };

    if let (Some(min), Some(n)) = (spec.min, value.as_f64()) {
        if n < min {
            errors.push(
                path.to_string(),
                format!(
                    "Path `{}` ({}) is less than minimum allowed value ({}).",
                    spec.name, value, min
                ),
            );
            return None;
        }
    }

    Some(value)
}

/// `null`, or `""` sent to a numeric field.
fn is_nullish(spec: &FieldSpec, v: &JsonValue) -> bool {
    match v {
        JsonValue::Null => true,
        JsonValue::String(s) => {
            s.is_empty() && matches!(spec.field_type, FieldType::Number | FieldType::Integer)
        }
        _ => false,
    }
}

fn is_blank_required(spec: &FieldSpec, v: &JsonValue) -> bool {
    spec.required && matches!(spec.field_type, FieldType::String) && v.as_str() == Some("")
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Full-document validation: applies defaults and enforces `required`.
fn validate_fields(
    specs: &[FieldSpec],
    obj: &serde_json::Map<String, JsonValue>,
    prefix: &str,
    errors: &mut Collector,
) -> Document {
    let mut out = Document::new();
    for spec in specs {
        let path = join_path(prefix, spec.name);
        match obj.get(spec.name) {
            Some(v) if !is_nullish(spec, v) => {
                if is_blank_required(spec, v) {
                    errors.required(path, spec.name);
                } else if let Some(cast) = cast_value(spec, v, &path, errors) {
                    out.insert(spec.name.to_string(), cast);
                }
            }
            _ => {
                if let Some(default) = spec.default {
                    out.insert(spec.name.to_string(), default.to_json());
                } else if spec.required {
                    errors.required(path, spec.name);
                }
            }
        }
    }
    out
}

fn expect_object<'a>(
    model: &'static str,
    payload: &'a JsonValue,
) -> Result<&'a serde_json::Map<String, JsonValue>, ValidationError> {
    payload.as_object().ok_or_else(|| ValidationError {
        model,
        errors: vec![FieldError {
            path: "body".to_string(),
            reason: format!(
                "expected a JSON object, got {}",
                json_type_name(payload)
            ),
        }],
    })
}

/// Validates a payload for insertion; returns the normalized document.
pub fn validate_create(
    model: &'static str,
    specs: &[FieldSpec],
    payload: &JsonValue,
) -> Result<Document, ValidationError> {
    let obj = expect_object(model, payload)?;
    let mut errors = Collector { errors: Vec::new() };
    let doc = validate_fields(specs, obj, "", &mut errors);
    if errors.errors.is_empty() {
        Ok(doc)
    } else {
        Err(ValidationError {
            model,
            errors: errors.errors,
        })
    }
}

/// Validates only the fields present in `payload`; the rest of the stored
/// document is left untouched. `null` unsets optional fields.
pub fn validate_update(
    model: &'static str,
    specs: &[FieldSpec],
    payload: &JsonValue,
) -> Result<Patch, ValidationError> {
    let obj = expect_object(model, payload)?;
    let mut errors = Collector { errors: Vec::new() };
    let mut patch = Patch::default();
    for spec in specs {
        match obj.get(spec.name) {
            None => {}
            Some(v) if is_nullish(spec, v) => {
                if spec.required {
                    errors.required(spec.name.to_string(), spec.name);
                } else {
                    patch.unset.push(spec.name.to_string());
                }
            }
            Some(v) if is_blank_required(spec, v) => {
                errors.required(spec.name.to_string(), spec.name);
            }
            Some(v) => {
                if let Some(cast) = cast_value(spec, v, spec.name, &mut errors) {
                    patch.set.insert(spec.name.to_string(), cast);
                }
            }
        }
    }
    if errors.errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError {
            model,
            errors: errors.errors,
        })
    }
}
