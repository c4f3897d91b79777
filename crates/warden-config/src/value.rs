//! Immutable, ordered collection of action entries backing one setting.
//!
//! # Design
//! - Entries live in an `Arc<[ActionEntry]>`; clones share storage and nothing mutates it.
//! - Parsing accepts the current per-node JSON format and the legacy flat-string format.
//! - `validate` reports at most one message: required, then duplicate, then structural.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::action::ActionEntry;
use crate::certificate::CertificateInspector;
use crate::document::{ACTION_SYNTAX, SettingDocument, ValueNode, legacy_entry};
use crate::error::{ConfigError, ConfigResult};
use crate::locale::LocaleCode;

/// Validation message for a required setting without entries.
pub const REQUIRED_VALUE_MISSING: &str = "required value missing";

/// Field appended to API mappings of entries that pin certificates.
pub const CERTIFICATE_INFOS_FIELD: &str = "certificateInfos";

/// Ordered action entries for one setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionValue {
    entries: Arc<[ActionEntry]>,
}

impl ActionValue {
    /// Build a value from already-constructed entries.
    #[must_use]
    pub fn new(entries: Vec<ActionEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Parse per-entry structured payloads.
    ///
    /// `null`, empty objects and blank strings are dropped. String payloads are decoded as JSON
    /// text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when any remaining payload is not a known action variant.
    pub fn parse(raw: &[Value]) -> ConfigResult<Self> {
        let mut entries = Vec::with_capacity(raw.len());
        for (index, payload) in raw.iter().enumerate() {
            if is_blank(payload) {
                debug!(index, "dropping empty action payload");
                continue;
            }
            entries.push(decode_payload(index, payload)?);
        }
        Ok(Self::new(entries))
    }

    /// Parse a whole value stored as a single JSON array.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the text is not an array of action payloads.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|err| ConfigError::parse(format!("invalid JSON document: {err}")))?;
        match document {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => Self::parse(&items),
            other => Err(ConfigError::parse(format!(
                "expected an array of actions, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a stored setting document in either syntax.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a current-format node holds an unknown payload.
    pub fn from_document(document: &SettingDocument) -> ConfigResult<Self> {
        if document.is_legacy() {
            return Ok(Self::parse_legacy_document(document));
        }
        let payloads = document
            .values
            .iter()
            .map(|node| Value::String(node.text.clone()))
            .collect::<Vec<_>>();
        Self::parse(&payloads)
    }

    /// Migrate a flat-string document.
    ///
    /// Nodes carrying a locale attribute have no counterpart in the action model and are dropped.
    #[must_use]
    pub fn parse_legacy_document(document: &SettingDocument) -> Self {
        let entries = document
            .values
            .iter()
            .filter(|node| !node.text.is_empty())
            .filter(|node| {
                if let Some(locale) = &node.locale {
                    debug!(locale = %locale, "dropping localized legacy action value");
                    false
                } else {
                    true
                }
            })
            .map(|node| legacy_entry(&node.text))
            .collect();
        Self::new(entries)
    }

    /// Structured payload for every entry, in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if an entry cannot be encoded.
    pub fn serialize(&self) -> ConfigResult<Vec<Value>> {
        self.entries
            .iter()
            .map(|entry| {
                serde_json::to_value(entry).map_err(|source| ConfigError::Serialize { source })
            })
            .collect()
    }

    /// Persisted document form: one node per entry holding its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if an entry cannot be encoded.
    pub fn to_document(&self) -> ConfigResult<SettingDocument> {
        let values = self
            .entries
            .iter()
            .map(|entry| {
                serde_json::to_string(entry)
                    .map(ValueNode::new)
                    .map_err(|source| ConfigError::Serialize { source })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(SettingDocument {
            syntax: Some(ACTION_SYNTAX.to_string()),
            values,
        })
    }

    /// Validate the value for a setting, returning at most one message.
    #[must_use]
    pub fn validate(&self, required: bool) -> Vec<String> {
        if required && self.entries.is_empty() {
            return vec![REQUIRED_VALUE_MISSING.to_string()];
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            if !seen.insert(entry.name().to_lowercase()) {
                return vec![format!(
                    "each action name must be unique: {}",
                    entry.name()
                )];
            }
        }

        for entry in self.entries.iter() {
            if let Err(err) = entry.validate() {
                return vec![format!("format error: {}", err.debug_str())];
            }
        }

        Vec::new()
    }

    /// Human-readable rendering, one block per entry.
    ///
    /// Blocks are numbered from zero only when the value holds more than one entry.
    #[must_use]
    pub fn describe_for_display(&self, _locale: LocaleCode) -> String {
        let numbered = self.entries.len() > 1;
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let label = if numbered {
                    format!("Action{index}")
                } else {
                    "Action".to_string()
                };
                format!("{label}-{}: [{}]", entry.kind_label(), entry.display_body())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generic mappings for API consumers, with certificate facts for pinned certificates.
    ///
    /// Certificate facts come from the first entry carrying the same exact name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if an entry cannot be encoded.
    pub fn describe_for_api(
        &self,
        inspector: &dyn CertificateInspector,
    ) -> ConfigResult<Vec<Map<String, Value>>> {
        let mut described = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            let mut mapping = match serde_json::to_value(entry)
                .map_err(|source| ConfigError::Serialize { source })?
            {
                Value::Object(mapping) => mapping,
                other => {
                    let mut mapping = Map::new();
                    mapping.insert("value".to_string(), other);
                    mapping
                }
            };
            let certificates = self
                .lookup(entry.name())
                .unwrap_or(entry)
                .trusted_certificates();
            if !certificates.is_empty() {
                let infos = certificates
                    .iter()
                    .map(|pem| {
                        let facts = inspector
                            .describe(pem)
                            .into_iter()
                            .map(|(key, value)| (key, Value::String(value)))
                            .collect::<Map<_, _>>();
                        Value::Object(facts)
                    })
                    .collect();
                mapping.insert(CERTIFICATE_INFOS_FIELD.to_string(), Value::Array(infos));
            }
            described.push(mapping);
        }
        Ok(described)
    }

    /// First entry whose name matches exactly.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ActionEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Entries in stored order.
    #[must_use]
    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the value holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, ActionEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ActionValue {
    type Item = &'a ActionEntry;
    type IntoIter = std::slice::Iter<'a, ActionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ActionEntry> for ActionValue {
    fn from_iter<T: IntoIterator<Item = ActionEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty() || text.trim() == "null",
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn decode_payload(index: usize, payload: &Value) -> ConfigResult<ActionEntry> {
    let decoded = match payload {
        Value::String(text) => serde_json::from_str::<ActionEntry>(text),
        other => serde_json::from_value::<ActionEntry>(other.clone()),
    };
    decoded.map_err(|err| ConfigError::parse(format!("action payload #{index}: {err}")))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, WebServiceAction, WebServiceMethod};
    use serde_json::json;

    fn sample() -> ActionValue {
        ActionValue::new(vec![
            ActionEntry::directory("Foo", "pwdReset", "true"),
            ActionEntry::web_service("notify", WebServiceMethod::Post, "https://hooks.example.com"),
            ActionEntry::directory("stamp", "description", "changed"),
        ])
    }

    #[test]
    fn parse_drops_null_and_empty_payloads() {
        let raw = vec![
            Value::Null,
            json!({"name": "a", "type": "directory", "attributeName": "cn"}),
            json!(""),
            json!({}),
        ];
        let value = ActionValue::parse(&raw).expect("payloads should parse");
        assert_eq!(value.len(), 1);
        assert_eq!(value.entries()[0].name(), "a");
    }

    #[test]
    fn parse_rejects_unknown_variants() {
        let raw = vec![json!({"name": "a", "type": "smtp"})];
        let err = ActionValue::parse(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("#0"));
    }

    #[test]
    fn from_json_accepts_null_and_rejects_objects() {
        assert!(ActionValue::from_json("null").expect("null is empty").is_empty());
        assert!(ActionValue::from_json(r#"{"name": "x"}"#).is_err());
        let value = ActionValue::from_json(
            r#"[null, {"name": "x", "type": "webservice", "method": "get", "url": "https://a"}]"#,
        )
        .expect("array parses");
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let value = sample();
        let payloads = value.serialize().expect("serialise");
        assert_eq!(ActionValue::parse(&payloads).expect("parse"), value);

        let document = value.to_document().expect("document");
        assert_eq!(document.syntax.as_deref(), Some(ACTION_SYNTAX));
        assert_eq!(ActionValue::from_document(&document).expect("parse"), value);
    }

    #[test]
    fn validate_checks_required_first() {
        let empty = ActionValue::default();
        assert_eq!(empty.validate(true), vec![REQUIRED_VALUE_MISSING.to_string()]);
        assert!(empty.validate(false).is_empty());
    }

    #[test]
    fn validate_reports_single_duplicate() {
        let value = ActionValue::new(vec![
            ActionEntry::directory("Foo", "a", "1"),
            ActionEntry::directory("foo", "", "2"),
            ActionEntry::directory("FOO", "c", "3"),
        ]);
        let messages = value.validate(false);
        assert_eq!(messages, vec!["each action name must be unique: foo".to_string()]);
    }

    #[test]
    fn validate_reports_first_structural_error() {
        let value = ActionValue::new(vec![
            ActionEntry::directory("ok", "cn", "x"),
            ActionEntry::directory("broken", "", "x"),
            ActionEntry::web_service("hook", WebServiceMethod::Get, ""),
        ]);
        let messages = value.validate(true);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("format error: ERROR_CONFIG_FORMAT"));
        assert!(messages[0].contains("broken"));
    }

    #[test]
    fn display_numbers_blocks_only_for_multiple_entries() {
        let single = ActionValue::new(vec![ActionEntry::directory("x", "cn", "v")]);
        assert_eq!(
            single.describe_for_display(LocaleCode::En),
            "Action-directory: [Directory: method=replace attribute=cn value=v]"
        );

        let rendered = sample().describe_for_display(LocaleCode::En);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Action0-directory: ["));
        assert!(lines[1].starts_with("Action1-webservice: [WebService: method=post"));
        assert!(lines[2].starts_with("Action2-directory: ["));
    }

    #[test]
    fn lookup_is_exact_match() {
        let value = sample();
        assert!(value.lookup("Foo").is_some());
        assert!(value.lookup("foo").is_none());
    }

    struct CountingInspector;

    impl CertificateInspector for CountingInspector {
        fn describe(&self, pem: &str) -> std::collections::BTreeMap<String, String> {
            std::collections::BTreeMap::from([("length".to_string(), pem.len().to_string())])
        }
    }

    fn pinned(name: &str, certificates: Vec<String>) -> ActionEntry {
        ActionEntry::new(
            name,
            ActionKind::WebService(WebServiceAction {
                method: Some(WebServiceMethod::Get),
                url: "https://hooks.example.com".to_string(),
                trusted_certificates: certificates,
                ..WebServiceAction::default()
            }),
        )
    }

    #[test]
    fn api_certificates_resolve_through_first_exact_name() {
        let value = ActionValue::new(vec![
            pinned("hook", vec!["abc".to_string()]),
            pinned("hook", vec!["abcdef".to_string(), "xy".to_string()]),
            pinned("Hook", Vec::new()),
        ]);
        let described = value.describe_for_api(&CountingInspector).expect("describe");
        for mapping in &described[..2] {
            assert_eq!(
                mapping[CERTIFICATE_INFOS_FIELD],
                json!([{"length": "3"}])
            );
        }
        assert!(!described[2].contains_key(CERTIFICATE_INFOS_FIELD));
    }

    #[test]
    fn legacy_document_drops_localized_nodes() {
        let document = SettingDocument {
            syntax: Some(crate::document::LEGACY_SYNTAX.into()),
            values: vec![
                ValueNode::new("cn=x"),
                ValueNode::localized("de", "sn=y"),
                ValueNode::new(""),
            ],
        };
        let value = ActionValue::from_document(&document).expect("legacy parses");
        assert_eq!(value.len(), 1);
        assert_eq!(value.entries()[0].name(), "cn");
    }
}
