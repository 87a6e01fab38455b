//! Query expression evaluation for in-memory document filtering.
//!
//! This module provides the evaluation engine for query expressions,
//! enabling filtering and comparison operations on BSON documents.

use std::{cmp::Ordering, collections::HashMap};
use bson::{Binary, Bson, datetime::DateTime, de::deserialize_from_bson};

use verdoc_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    geo::GeoPoint,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// This enum wraps BSON values and provides comparison operations for
/// filtering queries. It normalizes numeric types to f64 for easy comparison,
/// so an Int32 stored value compares equal to the Int64 a filter supplies.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Binary value (UUID identities compare through this arm)
    Binary(&'a Binary),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Binary(value) => Comparable::Binary(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Binary(a), Comparable::Binary(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            documents
                .into_iter()
                .filter(|doc| {
                    DocumentEvaluator::new(doc)
                        .evaluate(expr)
                        .unwrap_or(false)
                })
                .cloned()
                .collect::<Vec<_>>()
        )
    }

    fn field_value(&self, field: &str) -> Option<&'a Bson> {
        self.document
            .as_document()
            .and_then(|doc| doc.get(field))
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(self.field_value(field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        match self.field_value(field) {
            Some(field_value) => match op {
                FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
                FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
                FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => ordering == Ordering::Greater || ordering == Ordering::Equal,
                            FieldOp::Lt => ordering == Ordering::Less,
                            FieldOp::Lte => ordering == Ordering::Less || ordering == Ordering::Equal,
                            _ => unreachable!(),
                        }),
                        None => Ok(false),
                    }
                },
            },
            None => Ok(false),
        }
    }

    fn visit_near(
        &mut self,
        field: &str,
        point: &GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Self::Output, Self::Error> {
        // A field that is absent or not a GeoJSON point simply doesn't match.
        let Some(value) = self.field_value(field) else {
            return Ok(false);
        };

        match deserialize_from_bson::<GeoPoint>(value.clone()) {
            Ok(stored) => Ok(stored.distance_meters(point) <= max_distance_meters),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use verdoc_core::query::Filter;

    fn luke() -> Bson {
        Bson::Document(doc! { "name": "Luke", "age": 19 })
    }

    #[test]
    fn eq_matches_exact_values() {
        assert!(DocumentEvaluator::new(&luke()).evaluate(&Filter::eq("name", "Luke")).unwrap());
        assert!(!DocumentEvaluator::new(&luke()).evaluate(&Filter::eq("name", "Yoda")).unwrap());
    }

    #[test]
    fn numeric_comparison_normalizes_integer_widths() {
        // Stored Int32, filter Int64.
        assert!(DocumentEvaluator::new(&luke()).evaluate(&Filter::eq("age", 19i64)).unwrap());
        assert!(DocumentEvaluator::new(&luke()).evaluate(&Filter::gt("age", 18i64)).unwrap());
        assert!(!DocumentEvaluator::new(&luke()).evaluate(&Filter::lt("age", 19i64)).unwrap());
    }

    #[test]
    fn missing_fields_never_match() {
        assert!(!DocumentEvaluator::new(&luke()).evaluate(&Filter::eq("rank", "Master")).unwrap());
        assert!(DocumentEvaluator::new(&luke()).evaluate(&Filter::not_exists("rank")).unwrap());
    }

    #[test]
    fn binary_identities_compare_by_value() {
        use verdoc_core::document::DocumentId;

        let id = DocumentId::new();
        let other = DocumentId::new();
        let stored = Bson::Document(doc! { "_id": id.as_uuid(), "name": "Luke" });

        assert!(DocumentEvaluator::new(&stored).evaluate(&Filter::id(id)).unwrap());
        assert!(!DocumentEvaluator::new(&stored).evaluate(&Filter::id(other)).unwrap());
    }

    #[test]
    fn near_matches_within_distance_only() {
        let place = Bson::Document(doc! {
            "name": "Central Park",
            "location": { "type": "Point", "coordinates": [-73.97, 40.77] },
        });

        let close = Filter::near("location", GeoPoint::new(-73.9667, 40.78), 5_000.0);
        let tight = Filter::near("location", GeoPoint::new(-73.9667, 40.78), 100.0);

        assert!(DocumentEvaluator::new(&place).evaluate(&close).unwrap());
        assert!(!DocumentEvaluator::new(&place).evaluate(&tight).unwrap());
    }
}
