//! Field-mapping prompt, output schema and response parsing.

use serde_json::{json, Value};

pub const JSON_MIME_TYPE: &str = "application/json";

/// Prompt asking the model to map the keys of `source_data` onto CDM fields.
pub fn mapping_prompt(source_data: &str) -> String {
    format!(
        "Map the following trade data keys to FINOS CDM fields. Return as a JSON array. Data: {}",
        source_data
    )
}

/// Structured-output schema: an array of mapping suggestions with all four
/// fields required.
pub fn mapping_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "sourceField": {"type": "STRING"},
                "targetCDMField": {"type": "STRING"},
                "confidence": {"type": "NUMBER"},
                "reasoning": {"type": "STRING"}
            },
            "required": ["sourceField", "targetCDMField", "confidence", "reasoning"]
        }
    })
}

/// Result of interpreting the model's mapping output.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutcome {
    /// Valid JSON, passed through without schema validation.
    Parsed(Value),
    /// Missing or non-JSON text.
    Unparseable,
}

impl MappingOutcome {
    pub fn parse(text: Option<&str>) -> Self {
        match text.map(serde_json::from_str::<Value>) {
            Some(Ok(value)) => MappingOutcome::Parsed(value),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Mapping response is not valid JSON");
                MappingOutcome::Unparseable
            }
            None => {
                tracing::warn!("Mapping response carried no text");
                MappingOutcome::Unparseable
            }
        }
    }

    /// Value returned to the client: the parsed JSON, or `[]`.
    pub fn into_value(self) -> Value {
        match self {
            MappingOutcome::Parsed(value) => value,
            MappingOutcome::Unparseable => Value::Array(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_source_data() {
        assert_eq!(
            mapping_prompt(r#"{"trade_id": "T1"}"#),
            r#"Map the following trade data keys to FINOS CDM fields. Return as a JSON array. Data: {"trade_id": "T1"}"#
        );
    }

    #[test]
    fn schema_requires_all_four_fields() {
        let schema = mapping_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["required"],
            json!(["sourceField", "targetCDMField", "confidence", "reasoning"])
        );
        assert_eq!(schema["items"]["properties"]["confidence"]["type"], "NUMBER");
    }

    #[test]
    fn valid_array_is_passed_through_unchanged() {
        let text = r#"[{"sourceField":"trade_id","targetCDMField":"TradeIdentifier","confidence":0.9,"reasoning":"..."}]"#;
        let outcome = MappingOutcome::parse(Some(text));
        assert_eq!(
            outcome.into_value(),
            serde_json::from_str::<Value>(text).unwrap()
        );
    }

    #[test]
    fn parseable_entries_missing_fields_are_not_rejected() {
        let outcome = MappingOutcome::parse(Some(r#"[{"sourceField":"x"}]"#));
        assert_eq!(outcome.into_value(), json!([{"sourceField": "x"}]));
    }

    #[test]
    fn invalid_json_falls_back_to_empty_array() {
        let outcome = MappingOutcome::parse(Some("Here is your mapping: [oops"));
        assert_eq!(outcome, MappingOutcome::Unparseable);
        assert_eq!(outcome.into_value(), json!([]));
    }

    #[test]
    fn missing_text_falls_back_to_empty_array() {
        assert_eq!(MappingOutcome::parse(None).into_value(), json!([]));
    }
}
