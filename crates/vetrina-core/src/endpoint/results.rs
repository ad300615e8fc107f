//! Parsing of the SPARQL 1.1 JSON results format.
//!
//! Only `.results.bindings[].<var>.value` is ever read; datatypes and
//! language tags are ignored at this layer.

use std::collections::HashMap;

use serde::Deserialize;

use super::error::EndpointError;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: ResultSet,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    bindings: Vec<HashMap<String, BoundTerm>>,
}

#[derive(Debug, Deserialize)]
struct BoundTerm {
    value: String,
}

/// One result row: variable name to plain string value (an IRI or a
/// literal lexical form).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding(HashMap<String, String>);

impl Binding {
    /// Value bound to a variable, if any.
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    /// First value bound to any of `variables`, in the given order.
    pub fn first_of(&self, variables: &[&str]) -> Option<&str> {
        variables.iter().find_map(|v| self.get(v))
    }

    /// All bound values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Build a binding from variable/value pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

pub(crate) fn parse_results(body: &str) -> Result<Vec<Binding>, EndpointError> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| EndpointError::InvalidResults(e.to_string()))?;
    Ok(response
        .results
        .bindings
        .into_iter()
        .map(|row| Binding(row.into_iter().map(|(var, term)| (var, term.value)).collect()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_results_document() {
        let body = r#"{
            "head": { "vars": ["item", "title"] },
            "results": { "bindings": [
                { "item": { "type": "uri", "value": "http://example.org/1" },
                  "title": { "type": "literal", "xml:lang": "it", "value": "Anfora" } },
                { "item": { "type": "uri", "value": "http://example.org/2" } }
            ] }
        }"#;
        let rows = parse_results(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("item"), Some("http://example.org/1"));
        assert_eq!(rows[0].get("title"), Some("Anfora"));
        assert_eq!(rows[1].get("title"), None);
        assert_eq!(rows[1].first_of(&["title", "item"]), Some("http://example.org/2"));
    }

    #[test]
    fn empty_bindings_are_fine() {
        let rows = parse_results(r#"{ "results": { "bindings": [] } }"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        for body in ["not json", r#"{ "results": "nope" }"#, r#"{}"#] {
            assert!(matches!(
                parse_results(body),
                Err(EndpointError::InvalidResults(_))
            ));
        }
    }
}
