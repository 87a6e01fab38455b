//! Query translation from the verdoc filter AST to MongoDB query syntax.
//!
//! This module translates abstract query expressions into MongoDB BSON
//! documents for execution by the MongoDB query engine. Geospatial proximity
//! expressions become `$near` clauses served by a 2dsphere index.

use bson::{Bson, Document, doc, ser::serialize_to_bson};

use verdoc_core::{
    error::DocumentStoreError,
    geo::GeoPoint,
    query::{Expr, FieldOp, QueryVisitor},
};


/// Translates verdoc query expressions into MongoDB query documents.
///
/// This struct implements the [`QueryVisitor`] trait to convert abstract
/// query expressions into MongoDB's native BSON query syntax.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$not": self.visit_expr(expr)?,
        })
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$exists": should_exist },
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }

    fn visit_near(
        &mut self,
        field: &str,
        point: &GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: {
                "$near": {
                    "$geometry": serialize_to_bson(point)?,
                    "$maxDistance": max_distance_meters,
                }
            }
        })
    }
}
