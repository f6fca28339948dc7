// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Inbound result record produced by the automation (UI-agnostic).

use serde_json::{Map, Value};

/// Key carrying the document title.
pub const TITLE_KEY: &str = "module";

/// Keys recognized as the single body text, highest priority first.
const BODY_KEYS: [&str; 3] = ["Text", "result", "text"];

/// Inbound record resolved once from the raw JSON object.
///
/// `fields` keeps every key except the title in the object's order; it is
/// only used for the document when no body text was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InboundRecord {
    title: Option<String>,
    body: Option<String>,
    fields: Vec<(String, String)>,
}

impl InboundRecord {
    /// Resolve title, body text, and generic fields from a JSON object.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let title = map
            .get(TITLE_KEY)
            .map(stringify)
            .filter(|title| !title.is_empty());

        let body = BODY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| is_truthy(v))
            .map(stringify);

        let fields = map
            .iter()
            .filter(|(key, _)| key.as_str() != TITLE_KEY)
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect();

        Self {
            title,
            body,
            fields,
        }
    }

    /// Record holding a single text block under the given title.
    pub fn with_text(title: impl Into<String>, text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(TITLE_KEY.to_string(), Value::String(title.into()));
        map.insert(BODY_KEYS[0].to_string(), Value::String(text.into()));
        Self::from_map(&map)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Loose truthiness used by the automation: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings verbatim; anything else as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> InboundRecord {
        InboundRecord::from_map(value.as_object().unwrap())
    }

    #[test]
    fn title_comes_from_module_key() {
        let rec = record(json!({"module": "Sklad", "Text": "Hello"}));

        assert_eq!(rec.title(), Some("Sklad"));
        assert_eq!(rec.body(), Some("Hello"));
    }

    #[test]
    fn falsy_but_non_empty_module_is_still_a_title() {
        assert_eq!(record(json!({"module": 0, "foo": "bar"})).title(), Some("0"));
        assert_eq!(record(json!({"module": false})).title(), Some("false"));
    }

    #[test]
    fn empty_module_leaves_title_unset() {
        let rec = record(json!({"module": "", "foo": "bar"}));

        assert_eq!(rec.title(), None);
    }

    #[test]
    fn body_prefers_capital_text_then_result_then_text() {
        assert_eq!(
            record(json!({"text": "c", "result": "b", "Text": "a"})).body(),
            Some("a")
        );
        assert_eq!(record(json!({"text": "c", "result": "b"})).body(), Some("b"));
        assert_eq!(record(json!({"text": "c"})).body(), Some("c"));
    }

    #[test]
    fn falsy_body_falls_through_to_next_key() {
        let rec = record(json!({"result": "", "text": "fallback"}));

        assert_eq!(rec.body(), Some("fallback"));
    }

    #[test]
    fn fields_skip_title_and_keep_insertion_order() {
        let rec = record(json!({"zeta": "1", "module": "M", "alpha": 2}));

        assert_eq!(
            rec.fields(),
            &[
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn non_string_values_are_stringified_as_json() {
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(stringify(&json!("plain")), "plain");
    }

    #[test]
    fn truthiness_matches_loose_json_rules() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(0.5), json!("x"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn with_text_builds_single_body_record() {
        let rec = InboundRecord::with_text("Výstup z Make", "Hello");

        assert_eq!(rec.title(), Some("Výstup z Make"));
        assert_eq!(rec.body(), Some("Hello"));
        assert_eq!(rec, record(json!({"module": "Výstup z Make", "Text": "Hello"})));
    }

    #[test]
    fn with_text_keeps_empty_text_as_field_only() {
        let rec = InboundRecord::with_text("", "");

        assert_eq!(rec.title(), None);
        assert_eq!(rec.body(), None);
        assert_eq!(rec.fields(), &[("Text".to_string(), String::new())]);
    }
}
