//! Turns one facet definition plus one user selection into graph-pattern
//! fragments.
//!
//! All user-provided values pass through exactly two functions before they
//! reach query text: [`is_safe_iri`] for bracketed IRI references and
//! [`escape_literal`] for quoted literals. These are the audited injection
//! boundary; nothing else in the crate splices request data into queries.

use std::collections::HashMap;

use serde::Deserialize;

use crate::config::{FacetDef, FacetKind, ValueKind};
use crate::error::SelectionError;

/// Per-request facet selections, keyed by facet key. Absent or empty
/// entries mean the facet is not applied.
pub type Selection = HashMap<String, SelectionValue>;

/// The value a user selected for one facet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// Checkbox selections, in the order the user picked them
    Terms(Vec<String>),
    /// Range bounds; either side may be open
    Bounds {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl SelectionValue {
    fn is_empty(&self) -> bool {
        match self {
            Self::Terms(values) => values.is_empty(),
            Self::Bounds { min, max } => min.is_none() && max.is_none(),
        }
    }
}

/// Strip the optional leading `?` from a configured variable name.
pub(crate) fn variable_name(raw: &str) -> &str {
    raw.trim().trim_start_matches('?')
}

/// Whether a value may be embedded as a bracketed IRI reference.
///
/// Allow-list discipline: absolute IRIs only, and none of the characters
/// that terminate or escape the `<...>` syntax (whitespace, angle
/// brackets, quotes, braces, `|`, `^`, backtick, backslash, controls).
pub fn is_safe_iri(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let has_scheme = value
        .split_once(':')
        .map(|(scheme, _)| {
            !scheme.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
        .unwrap_or(false);
    if !has_scheme {
        return false;
    }
    value.chars().all(|c| {
        !c.is_whitespace()
            && !c.is_control()
            && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    })
}

/// Escape a string for embedding as a quoted SPARQL literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Build the graph-pattern fragment a facet contributes for a selection.
///
/// Returns `Ok(None)` when the selection for this facet is absent or
/// empty: an empty selection never synthesizes a match-nothing
/// restriction. Fragments are emitted without enclosing braces.
pub fn build_clause(
    facet: &FacetDef,
    selection: &Selection,
) -> Result<Option<String>, SelectionError> {
    let value = match selection.get(&facet.key) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };

    match (&facet.kind, value) {
        (
            FacetKind::Checkbox {
                graph_fragment,
                bind_variable,
                value_kind,
                ..
            },
            SelectionValue::Terms(terms),
        ) => {
            let rendered = render_terms(terms, *value_kind)?;
            let mut clause = String::new();
            if let Some(fragment) = graph_fragment {
                clause.push_str(fragment.trim_end());
                clause.push('\n');
            }
            clause.push_str(&format!(
                "VALUES ?{} {{ {} }}",
                variable_name(bind_variable),
                rendered.join(" ")
            ));
            Ok(Some(clause))
        }

        (
            FacetKind::Range {
                graph_fragment,
                begin_variable,
                end_variable,
                ..
            },
            SelectionValue::Bounds { min, max },
        ) => {
            let mut conditions = Vec::new();
            // The lower bound constrains where an item ends, the upper
            // bound where it begins, so partially overlapping items match.
            if let Some(min) = min {
                conditions.push(format!(
                    "YEAR(?{}) >= {}",
                    variable_name(end_variable),
                    min.trunc() as i64
                ));
            }
            if let Some(max) = max {
                conditions.push(format!(
                    "YEAR(?{}) <= {}",
                    variable_name(begin_variable),
                    max.trunc() as i64
                ));
            }

            let mut clause = String::new();
            if let Some(fragment) = graph_fragment {
                clause.push_str(fragment.trim_end());
                clause.push('\n');
            }
            clause.push_str(&format!("FILTER({})", conditions.join(" && ")));
            Ok(Some(clause))
        }

        (FacetKind::Checkbox { .. }, SelectionValue::Bounds { .. }) => {
            Err(SelectionError::ShapeMismatch {
                facet: facet.key.clone(),
                expected: "list of values",
            })
        }
        (FacetKind::Range { .. }, SelectionValue::Terms(_)) => {
            Err(SelectionError::ShapeMismatch {
                facet: facet.key.clone(),
                expected: "min/max bounds",
            })
        }
    }
}

fn render_terms(terms: &[String], value_kind: ValueKind) -> Result<Vec<String>, SelectionError> {
    terms
        .iter()
        .map(|term| match value_kind {
            ValueKind::Uri => {
                if is_safe_iri(term) {
                    Ok(format!("<{term}>"))
                } else {
                    Err(SelectionError::UnsafeIri(term.clone()))
                }
            }
            ValueKind::Literal => Ok(format!("\"{}\"", escape_literal(term))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn checkbox_facet(value_kind: ValueKind) -> FacetDef {
        FacetDef {
            key: "material".into(),
            labels: BTreeMap::new(),
            kind: FacetKind::Checkbox {
                options_query: "SELECT ?label ?uri WHERE { }".into(),
                graph_fragment: Some("?item ex:material ?material .".into()),
                bind_variable: "material".into(),
                value_kind,
            },
        }
    }

    fn range_facet() -> FacetDef {
        FacetDef {
            key: "period".into(),
            labels: BTreeMap::new(),
            kind: FacetKind::Range {
                range_query: "SELECT ?min ?max WHERE { }".into(),
                graph_fragment: Some("?item ex:begin ?begin ; ex:end ?end .".into()),
                begin_variable: "begin".into(),
                end_variable: "end".into(),
            },
        }
    }

    fn selection(key: &str, value: SelectionValue) -> Selection {
        Selection::from([(key.to_string(), value)])
    }

    #[test]
    fn absent_selection_contributes_nothing() {
        let facet = checkbox_facet(ValueKind::Uri);
        assert_eq!(build_clause(&facet, &Selection::new()).unwrap(), None);
    }

    #[test]
    fn empty_selection_contributes_nothing() {
        let facet = checkbox_facet(ValueKind::Uri);
        let sel = selection("material", SelectionValue::Terms(vec![]));
        assert_eq!(build_clause(&facet, &sel).unwrap(), None);

        let facet = range_facet();
        let sel = selection(
            "period",
            SelectionValue::Bounds {
                min: None,
                max: None,
            },
        );
        assert_eq!(build_clause(&facet, &sel).unwrap(), None);
    }

    #[test]
    fn uri_terms_are_bracketed_in_input_order() {
        let facet = checkbox_facet(ValueKind::Uri);
        let sel = selection(
            "material",
            SelectionValue::Terms(vec![
                "http://example.org/bronze".into(),
                "http://example.org/marble".into(),
            ]),
        );
        let clause = build_clause(&facet, &sel).unwrap().unwrap();
        assert_eq!(
            clause,
            "?item ex:material ?material .\n\
             VALUES ?material { <http://example.org/bronze> <http://example.org/marble> }"
        );
    }

    #[test]
    fn unsafe_uri_is_rejected() {
        let facet = checkbox_facet(ValueKind::Uri);
        for value in [
            "http://example.org/a> } UNION { ?s ?p ?o",
            "http://example.org/with space",
            "not-an-iri",
            "",
        ] {
            let sel = selection("material", SelectionValue::Terms(vec![value.into()]));
            assert!(
                matches!(build_clause(&facet, &sel), Err(SelectionError::UnsafeIri(_))),
                "should reject {value:?}"
            );
        }
    }

    #[test]
    fn literal_terms_are_escaped_not_rejected() {
        let facet = checkbox_facet(ValueKind::Literal);
        let sel = selection(
            "material",
            SelectionValue::Terms(vec![r#"terra "cotta""#.into()]),
        );
        let clause = build_clause(&facet, &sel).unwrap().unwrap();
        assert!(clause.contains(r#""terra \"cotta\"""#), "got: {clause}");
    }

    #[test]
    fn range_with_both_bounds_emits_single_filter() {
        let facet = range_facet();
        let sel = selection(
            "period",
            SelectionValue::Bounds {
                min: Some(1500.0),
                max: Some(1600.9),
            },
        );
        let clause = build_clause(&facet, &sel).unwrap().unwrap();
        assert_eq!(
            clause,
            "?item ex:begin ?begin ; ex:end ?end .\n\
             FILTER(YEAR(?end) >= 1500 && YEAR(?begin) <= 1600)"
        );
    }

    #[test]
    fn range_with_only_max_emits_only_upper_bound() {
        let facet = range_facet();
        let sel = selection(
            "period",
            SelectionValue::Bounds {
                min: None,
                max: Some(1600.0),
            },
        );
        let clause = build_clause(&facet, &sel).unwrap().unwrap();
        assert!(clause.contains("FILTER(YEAR(?begin) <= 1600)"));
        assert!(!clause.contains(">="));
    }

    #[test]
    fn mismatched_selection_shape_is_rejected() {
        let sel = selection(
            "material",
            SelectionValue::Bounds {
                min: Some(1.0),
                max: None,
            },
        );
        assert!(matches!(
            build_clause(&checkbox_facet(ValueKind::Uri), &sel),
            Err(SelectionError::ShapeMismatch { .. })
        ));

        let sel = selection("period", SelectionValue::Terms(vec!["x".into()]));
        assert!(matches!(
            build_clause(&range_facet(), &sel),
            Err(SelectionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn escape_literal_handles_backslashes_and_newlines() {
        assert_eq!(escape_literal(r"a\b"), r"a\\b");
        assert_eq!(escape_literal("a\nb"), r"a\nb");
        assert_eq!(escape_literal("a\"b"), r#"a\"b"#);
    }

    #[test]
    fn selection_value_deserializes_from_both_shapes() {
        let terms: SelectionValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(terms, SelectionValue::Terms(vec!["a".into(), "b".into()]));

        let bounds: SelectionValue = serde_json::from_str(r#"{"min": 1500}"#).unwrap();
        assert_eq!(
            bounds,
            SelectionValue::Bounds {
                min: Some(1500.0),
                max: None
            }
        );
    }
}
