//! Query description shared by every backend.
//!
//! Backends may translate a [`Query`] into their native form, or evaluate it
//! in-process with [`Query::matches`] and [`Query::apply`].

use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::Value;

use crate::{Document, Fields};

/// Sort direction for [`OrderBy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on a top-level field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// Single-field ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filters plus at most one ordering field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<FieldFilter>,
    pub order: Option<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Set the ordering field, replacing any previous one.
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// True when every filter matches and the ordering field (if any) is present.
    pub fn matches(&self, fields: &Fields) -> bool {
        let filtered = self
            .filters
            .iter()
            .all(|f| fields.get(&f.field) == Some(&f.value));
        let orderable = self
            .order
            .as_ref()
            .map(|o| fields.contains_key(&o.field))
            .unwrap_or(true);
        filtered && orderable
    }

    /// Filter and order documents that are already in id order.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut out: Vec<Document> = documents
            .into_iter()
            .filter(|d| self.matches(&d.fields))
            .collect();

        if let Some(order) = &self.order {
            // Stable sort keeps id order among equal keys.
            out.sort_by(|a, b| {
                let ord = compare_values(
                    a.fields.get(&order.field).unwrap_or(&Value::Null),
                    b.fields.get(&order.field).unwrap_or(&Value::Null),
                );
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        out
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: values of different types order by type,
/// values of the same scalar type order naturally. Two RFC 3339 strings order
/// by the instant they name, whatever their fractional-second width.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentId;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        let fields = match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        };
        Document {
            id: DocumentId(id.to_string()),
            fields,
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.0.as_str()).collect()
    }

    #[test]
    fn equality_filter_matches_exact_value_only() {
        let q = Query::new().where_eq("phoneNumber", "+911234567890");
        let docs = vec![
            doc("a", json!({"phoneNumber": "+911234567890"})),
            doc("b", json!({"phoneNumber": "+919999999999"})),
            doc("c", json!({"phoneNumber": "911234567890"})),
        ];
        assert_eq!(ids(&q.apply(docs)), vec!["a"]);
    }

    #[test]
    fn multiple_filters_are_conjunctive() {
        let q = Query::new()
            .where_eq("status", "Pending")
            .where_eq("location", "Pune");
        let docs = vec![
            doc("a", json!({"status": "Pending", "location": "Pune"})),
            doc("b", json!({"status": "Pending", "location": "Delhi"})),
            doc("c", json!({"status": "Approved", "location": "Pune"})),
        ];
        assert_eq!(ids(&q.apply(docs)), vec!["a"]);
    }

    #[test]
    fn order_by_descending_and_missing_field_excluded() {
        let q = Query::new().order_by("createdAt", Direction::Descending);
        let docs = vec![
            doc("a", json!({"createdAt": "2024-01-01T00:00:00Z"})),
            doc("b", json!({"title": "no timestamp"})),
            doc("c", json!({"createdAt": "2024-03-01T00:00:00Z"})),
        ];
        assert_eq!(ids(&q.apply(docs)), vec!["c", "a"]);
    }

    #[test]
    fn timestamps_order_by_instant_not_text() {
        let q = Query::new().order_by("createdAt", Direction::Descending);
        let docs = vec![
            doc("whole", json!({"createdAt": "2024-01-01T00:00:00Z"})),
            doc("half", json!({"createdAt": "2024-01-01T00:00:00.5Z"})),
            doc("millis", json!({"createdAt": "2024-01-01T00:00:00.123Z"})),
            doc("micros", json!({"createdAt": "2024-01-01T00:00:00.123456Z"})),
            doc("offset", json!({"createdAt": "2024-01-01T05:30:00.9+05:30"})),
        ];
        assert_eq!(
            ids(&q.apply(docs)),
            vec!["offset", "half", "micros", "millis", "whole"]
        );
    }

    #[test]
    fn ascending_order_is_stable_for_equal_keys() {
        let q = Query::new().order_by("dateTime", Direction::Ascending);
        let docs = vec![
            doc("a", json!({"dateTime": "2024-05-01T10:00:00"})),
            doc("b", json!({"dateTime": "2024-04-01T10:00:00"})),
            doc("c", json!({"dateTime": "2024-05-01T10:00:00"})),
        ];
        assert_eq!(ids(&q.apply(docs)), vec!["b", "a", "c"]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let q = Query::new().order_by("n", Direction::Ascending);
        let docs = vec![
            doc("a", json!({"n": 10})),
            doc("b", json!({"n": 9.5})),
            doc("c", json!({"n": -1})),
        ];
        assert_eq!(ids(&q.apply(docs)), vec!["c", "b", "a"]);
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let docs = vec![doc("a", json!({})), doc("b", json!({"x": 1}))];
        assert_eq!(ids(&Query::new().apply(docs)), vec!["a", "b"]);
    }
}
