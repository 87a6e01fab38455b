//! BSON value sanitization for MongoDB compatibility.
//!
//! Stored field names are free-form, but MongoDB reserves certain characters
//! in keys: dots (nested-field access), dollar signs (operators), and null
//! bytes. This module escapes those characters before a document reaches the
//! server and reverses the escaping on the way back out, so free-form field
//! names round-trip losslessly.

use bson::Bson;


/// Sanitizes and restores BSON values to handle MongoDB field name restrictions.
pub(crate) struct ValueSanitizer;

impl ValueSanitizer {
    /// Character replacements for sanitization
    const REPLACEMENTS: [(&'static str, &'static str); 3] = [
        (".", "__dot__"),
        ("$", "__dollar__"),
        ("\0", "__null__"),
    ];

    /// Recursively sanitizes a BSON value, escaping reserved characters in
    /// keys and strings. Scalars other than strings pass through unchanged.
    pub(crate) fn sanitize_value(value: &Bson) -> Bson {
        match value {
            Bson::String(s) => Bson::String(Self::sanitize_string(s)),
            Bson::Array(arr) => Bson::Array(
                arr
                    .iter()
                    .map(Self::sanitize_value)
                    .collect(),
            ),
            Bson::Document(doc) => Bson::Document(
                doc.iter()
                    .map(|(k, v)| (Self::sanitize_string(k), Self::sanitize_value(v)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    /// Escapes reserved characters in a single string.
    pub(crate) fn sanitize_string(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .fold(input.to_string(), |acc, (target, replacement)| {
                acc.replace(*target, replacement)
            })
    }

    /// Recursively restores a BSON value, reverting sanitization escapes.
    ///
    /// This is the inverse of `sanitize_value` and is applied to every value
    /// retrieved from MongoDB.
    pub(crate) fn restore_value(value: &Bson) -> Bson {
        match value {
            Bson::String(s) => Bson::String(Self::restore_string(s)),
            Bson::Array(arr) => Bson::Array(
                arr
                    .iter()
                    .map(Self::restore_value)
                    .collect(),
            ),
            Bson::Document(doc) => Bson::Document(
                doc.iter()
                    .map(|(k, v)| (Self::restore_string(k), Self::restore_value(v)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    /// Reverts sanitization escapes in a single string.
    pub(crate) fn restore_string(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .rev()
            .fold(input.to_string(), |acc, (target, replacement)| {
                acc.replace(*replacement, target)
            })
    }
}
