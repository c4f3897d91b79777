//! Persisted setting documents and the legacy flat-string conversion.
//!
//! A stored setting is an ordered list of value nodes. Current documents carry one JSON entry per
//! node; documents written with the `STRING_ARRAY` syntax carry `attribute=value` strings, some of
//! them tagged with a locale.

use serde::{Deserialize, Serialize};

use crate::action::ActionEntry;

/// Syntax attribute marking documents written in the flat-string format.
pub const LEGACY_SYNTAX: &str = "STRING_ARRAY";
/// Syntax attribute written for current documents.
pub const ACTION_SYNTAX: &str = "ACTION";

/// A stored setting: syntax marker plus ordered value nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDocument {
    /// Syntax the document was written with; absent means the current format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
    /// Value nodes in persisted order.
    #[serde(default)]
    pub values: Vec<ValueNode>,
}

/// One persisted value node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueNode {
    /// Locale attribute, only meaningful in legacy documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Text content of the node.
    #[serde(default)]
    pub text: String,
}

impl SettingDocument {
    /// Whether the document uses the flat-string syntax.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.syntax.as_deref() == Some(LEGACY_SYNTAX)
    }
}

impl ValueNode {
    /// Node without a locale attribute.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }

    /// Node carrying a locale attribute.
    #[must_use]
    pub fn localized(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }
}

/// Convert one legacy `attribute=value` string into a directory entry.
///
/// The text before the first `=` names both the entry and the attribute; the remainder is the
/// value. Text without `=` yields an attribute with an empty value.
#[must_use]
pub fn legacy_entry(text: &str) -> ActionEntry {
    let (attribute, value) = text.split_once('=').unwrap_or((text, ""));
    ActionEntry::directory(attribute, attribute, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, DirectoryMethod};

    #[test]
    fn legacy_entry_splits_at_first_equals() {
        let entry = legacy_entry("description=a=b");
        assert_eq!(entry.name(), "description");
        let ActionKind::Directory(directory) = entry.action() else {
            panic!("legacy strings convert to directory actions");
        };
        assert_eq!(directory.attribute_name, "description");
        assert_eq!(directory.attribute_value, "a=b");
        assert_eq!(directory.method, DirectoryMethod::Replace);
    }

    #[test]
    fn legacy_entry_without_separator_keeps_attribute() {
        let entry = legacy_entry("pwdReset");
        let ActionKind::Directory(directory) = entry.action() else {
            panic!("legacy strings convert to directory actions");
        };
        assert_eq!(directory.attribute_name, "pwdReset");
        assert!(directory.attribute_value.is_empty());
    }

    #[test]
    fn syntax_marker_detects_legacy_documents() {
        let legacy = SettingDocument {
            syntax: Some(LEGACY_SYNTAX.into()),
            values: vec![ValueNode::new("cn=x")],
        };
        assert!(legacy.is_legacy());
        assert!(!SettingDocument::default().is_legacy());
    }
}
