// Boundary validation for untyped catalog payloads.
//
// The checks walk a decoded serde_json::Value and report violations against
// the Destination/Product wire contracts with dotted field paths, so callers
// can see exactly which node of a payload is broken instead of a generic
// deserialization error. A payload that passes its check is guaranteed to
// deserialize into the typed schema.
use serde_json::{Map, Value};
use thiserror::Error;

use crate::destination::Destination;
use crate::product::Product;

// Path of the document root in reported field paths.
const ROOT: &str = "$";

// Exactly two error kinds: a required field is absent, or a field is present
// with the wrong shape. Both are reported, never panicked on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("type mismatch at {field}: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::TypeMismatch { field, .. } => field,
        }
    }
}

// Advisory findings a stricter consumer may act on. These are business
// invariants the wire schema deliberately does not enforce, so they are
// reported separately and never cause rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum StrictIssue {
    MultipleCoverImages { count: usize },
    InvertedDiscount { from_price: f64, before_discount: f64 },
    RatingOutOfRange { rating: f64 },
    CenterOutOfRange { latitude: f64, longitude: f64 },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn missing(field: impl Into<String>) -> ValidationError {
    ValidationError::MissingField {
        field: field.into(),
    }
}

fn mismatch(field: impl Into<String>, expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.into(),
        expected,
        found: json_type(value),
    }
}

// Required scalar extraction. Absent and explicit null both count as missing;
// a present value of the wrong shape is a mismatch.
fn require_string(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) => errs.push(missing(path)),
        Some(Value::String(_)) => {}
        Some(other) => errs.push(mismatch(path, "string", other)),
    }
}

fn require_integer(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) => errs.push(missing(path)),
        Some(value @ Value::Number(n)) => {
            if n.as_u64().is_none() {
                // Negative or fractional: the schema's ids and counts are
                // non-negative integers.
                errs.push(mismatch(path, "non-negative integer", value));
            }
        }
        Some(other) => errs.push(mismatch(path, "non-negative integer", other)),
    }
}

fn require_number(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) => errs.push(missing(path)),
        Some(Value::Number(_)) => {}
        Some(other) => errs.push(mismatch(path, "number", other)),
    }
}

// Optional scalars: absence and null are fine, presence activates the shape.
fn optional_string(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => errs.push(mismatch(path, "string", other)),
    }
}

fn optional_integer(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) => {}
        Some(value @ Value::Number(n)) => {
            if n.as_u64().is_none() {
                errs.push(mismatch(path, "non-negative integer", value));
            }
        }
        Some(other) => errs.push(mismatch(path, "non-negative integer", other)),
    }
}

fn optional_number(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) | Some(Value::Number(_)) => {}
        Some(other) => errs.push(mismatch(path, "number", other)),
    }
}

fn optional_bool(obj: &Map<String, Value>, path: &str, errs: &mut Vec<ValidationError>) {
    match obj.get(leaf(path)) {
        None | Some(Value::Null) | Some(Value::Bool(_)) => {}
        Some(other) => errs.push(mismatch(path, "boolean", other)),
    }
}

// The last segment of a dotted path is the lookup key; the full path is what
// gets reported.
fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

// Enumerate every violation of the Destination contract. An empty result
// means the payload deserializes cleanly.
pub fn check_destination(value: &Value) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            errs.push(mismatch(ROOT, "object", other));
            return errs;
        }
    };

    require_integer(obj, "destinationId", &mut errs);
    require_string(obj, "name", &mut errs);
    require_string(obj, "type", &mut errs);
    require_integer(obj, "parentDestinationId", &mut errs);
    require_string(obj, "lookupId", &mut errs);
    require_string(obj, "destinationUrl", &mut errs);
    require_string(obj, "defaultCurrencyCode", &mut errs);
    require_string(obj, "timeZone", &mut errs);
    require_string(obj, "countryCallingCode", &mut errs);

    match obj.get("languages") {
        None | Some(Value::Null) => errs.push(missing("languages")),
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errs.push(mismatch(format!("languages[{}]", i), "string", item));
                }
            }
        }
        Some(other) => errs.push(mismatch("languages", "array", other)),
    }

    match obj.get("center") {
        None | Some(Value::Null) => errs.push(missing("center")),
        Some(Value::Object(center)) => {
            require_number(center, "center.latitude", &mut errs);
            require_number(center, "center.longitude", &mut errs);
        }
        Some(other) => errs.push(mismatch("center", "object", other)),
    }

    errs
}

// Enumerate every violation of the Product contract.
pub fn check_product(value: &Value) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            errs.push(mismatch(ROOT, "object", other));
            return errs;
        }
    };

    require_string(obj, "productCode", &mut errs);
    require_string(obj, "title", &mut errs);
    optional_string(obj, "description", &mut errs);
    optional_string(obj, "productUrl", &mut errs);

    match obj.get("images") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_image(item, &format!("images[{}]", i), &mut errs);
            }
        }
        Some(other) => errs.push(mismatch("images", "array", other)),
    }

    match obj.get("reviews") {
        None | Some(Value::Null) => {}
        Some(Value::Object(reviews)) => {
            optional_integer(reviews, "reviews.totalReviews", &mut errs);
            optional_number(reviews, "reviews.combinedAverageRating", &mut errs);
        }
        Some(other) => errs.push(mismatch("reviews", "object", other)),
    }

    match obj.get("duration") {
        None | Some(Value::Null) => {}
        Some(Value::Object(duration)) => {
            optional_integer(duration, "duration.fixedDurationInMinutes", &mut errs);
        }
        Some(other) => errs.push(mismatch("duration", "object", other)),
    }

    match obj.get("pricing") {
        None | Some(Value::Null) => {}
        Some(Value::Object(pricing)) => {
            optional_string(pricing, "pricing.currency", &mut errs);
            match pricing.get("summary") {
                None | Some(Value::Null) => {}
                Some(Value::Object(summary)) => {
                    optional_number(summary, "pricing.summary.fromPrice", &mut errs);
                    optional_number(summary, "pricing.summary.fromPriceBeforeDiscount", &mut errs);
                }
                Some(other) => errs.push(mismatch("pricing.summary", "object", other)),
            }
        }
        Some(other) => errs.push(mismatch("pricing", "object", other)),
    }

    errs
}

fn check_image(value: &Value, path: &str, errs: &mut Vec<ValidationError>) {
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            errs.push(mismatch(path, "object", other));
            return;
        }
    };

    match obj.get("variants") {
        None | Some(Value::Null) => errs.push(missing(format!("{}.variants", path))),
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_variant(item, &format!("{}.variants[{}]", path, i), errs);
            }
        }
        Some(other) => errs.push(mismatch(format!("{}.variants", path), "array", other)),
    }

    optional_bool(obj, &format!("{}.isCover", path), errs);
}

fn check_variant(value: &Value, path: &str, errs: &mut Vec<ValidationError>) {
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            errs.push(mismatch(path, "object", other));
            return;
        }
    };

    for key in ["height", "width"] {
        let field = format!("{}.{}", path, key);
        match obj.get(key) {
            None | Some(Value::Null) => errs.push(missing(field)),
            Some(value @ Value::Number(n)) => {
                // Pixel dimensions must fit the schema's 32-bit widths.
                if n.as_u64().map_or(true, |v| v > u64::from(u32::MAX)) {
                    errs.push(mismatch(field, "non-negative integer", value));
                }
            }
            Some(other) => errs.push(mismatch(field, "non-negative integer", other)),
        }
    }

    match obj.get("url") {
        None | Some(Value::Null) => errs.push(missing(format!("{}.url", path))),
        Some(Value::String(_)) => {}
        Some(other) => errs.push(mismatch(format!("{}.url", path), "string", other)),
    }
}

// First-violation validation producing the typed value.
pub fn validate_destination(value: &Value) -> Result<Destination, ValidationError> {
    if let Some(first) = check_destination(value).into_iter().next() {
        return Err(first);
    }
    // The shape check above covers everything the derive requires, so this
    // only trips if the two ever drift apart.
    serde_json::from_value(value.clone()).map_err(|_| mismatch(ROOT, "Destination", value))
}

pub fn validate_product(value: &Value) -> Result<Product, ValidationError> {
    if let Some(first) = check_product(value).into_iter().next() {
        return Err(first);
    }
    serde_json::from_value(value.clone()).map_err(|_| mismatch(ROOT, "Product", value))
}

// Advisory checks over already-validated values.
pub fn strict_issues_destination(destination: &Destination) -> Vec<StrictIssue> {
    let mut issues = Vec::new();
    let center = destination.center;
    if !(-90.0..=90.0).contains(&center.latitude) || !(-180.0..=180.0).contains(&center.longitude) {
        issues.push(StrictIssue::CenterOutOfRange {
            latitude: center.latitude,
            longitude: center.longitude,
        });
    }
    issues
}

pub fn strict_issues_product(product: &Product) -> Vec<StrictIssue> {
    let mut issues = Vec::new();

    if let Some(images) = product.images.as_deref() {
        let covers = images.iter().filter(|image| image.is_cover()).count();
        if covers > 1 {
            issues.push(StrictIssue::MultipleCoverImages { count: covers });
        }
    }

    if let Some(summary) = product.pricing.as_ref().and_then(|p| p.summary) {
        if let (Some(now), Some(before)) = (summary.from_price, summary.from_price_before_discount)
        {
            if now > before {
                issues.push(StrictIssue::InvertedDiscount {
                    from_price: now,
                    before_discount: before,
                });
            }
        }
    }

    if let Some(rating) = product.average_rating() {
        if !(0.0..=5.0).contains(&rating) {
            issues.push(StrictIssue::RatingOutOfRange { rating });
        }
    }

    issues
}
