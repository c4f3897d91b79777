//! Read-only configuration snapshot consumed by the health rules.
//!
//! # Design
//!
//! - The settings store is an external collaborator; rules only see the [`ConfigSnapshot`] trait.
//! - Profile-scoped settings must be read with a profile id and global settings without one.
//! - [`MemorySnapshot`] is the in-process implementation used by the CLI and tests. Absent values
//!   read as the catalog default.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_config::ActionValue;

use crate::error::{SnapshotError, SnapshotResult};
use crate::setting::{AppProperty, ProfileCategory, Setting};

/// Secret setting value. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordData(String);

impl PasswordData {
    /// Wrap a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Clear-text secret, for scoring only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordData(***)")
    }
}

/// Read accessors over one immutable configuration.
pub trait ConfigSnapshot: Send + Sync {
    /// Boolean setting value.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the value is not a boolean or the scope is wrong.
    fn read_bool(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<bool>;

    /// String setting value.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the value is not textual or the scope is wrong.
    fn read_string(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<String>;

    /// String list setting value.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the value is not a list of strings or the scope is wrong.
    fn read_string_list(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<Vec<String>>;

    /// Password setting value; `None` when unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the value is not textual or the scope is wrong.
    fn read_password(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<Option<PasswordData>>;

    /// Action setting value; empty when unset.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the stored payloads are not action entries or the scope is
    /// wrong.
    fn read_actions(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<ActionValue>;

    /// Profile identifiers defined for `category`, in configuration order.
    fn profiles(&self, category: ProfileCategory) -> Vec<String>;

    /// Built-in default of `setting`.
    fn default_value(&self, setting: Setting) -> Value {
        setting.default_value()
    }

    /// Whether `setting` is still at its built-in default.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the scope is wrong.
    fn is_default(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<bool>;

    /// Application property value, if set.
    fn read_app_property(&self, property: AppProperty) -> Option<String>;
}

/// Serialized snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    /// Global settings keyed by storage key.
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
    /// Profile-scoped settings.
    #[serde(default)]
    pub profiles: ProfileSets,
    /// Application properties.
    #[serde(default)]
    pub app_properties: BTreeMap<String, String>,
}

/// Profiles grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSets {
    /// Directory profiles.
    #[serde(default)]
    pub ldap: Vec<ProfileDocument>,
    /// Password policy profiles.
    #[serde(default)]
    pub password_policy: Vec<ProfileDocument>,
}

impl ProfileSets {
    fn category(&self, category: ProfileCategory) -> &[ProfileDocument] {
        match category {
            ProfileCategory::Ldap => &self.ldap,
            ProfileCategory::PasswordPolicy => &self.password_policy,
        }
    }

    fn category_mut(&mut self, category: ProfileCategory) -> &mut Vec<ProfileDocument> {
        match category {
            ProfileCategory::Ldap => &mut self.ldap,
            ProfileCategory::PasswordPolicy => &mut self.password_policy,
        }
    }
}

/// One profile and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Profile identifier.
    pub id: String,
    /// Settings keyed by storage key.
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

/// In-memory [`ConfigSnapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySnapshot {
    document: SnapshotDocument,
}

impl MemorySnapshot {
    /// Wrap a decoded document.
    #[must_use]
    pub const fn new(document: SnapshotDocument) -> Self {
        Self { document }
    }

    /// Decode a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Document`] when the text is not a snapshot document.
    pub fn from_json(text: &str) -> SnapshotResult<Self> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|err| SnapshotError::Document {
                reason: err.to_string(),
            })
    }

    /// Start an empty builder.
    #[must_use]
    pub fn builder() -> MemorySnapshotBuilder {
        MemorySnapshotBuilder::default()
    }

    /// Underlying document.
    #[must_use]
    pub const fn document(&self) -> &SnapshotDocument {
        &self.document
    }

    fn stored(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<Option<&Value>> {
        match (setting.profile_category(), profile) {
            (None, None) => Ok(self.document.settings.get(setting.key())),
            (Some(category), Some(id)) => self
                .document
                .profiles
                .category(category)
                .iter()
                .find(|candidate| candidate.id == id)
                .map(|found| found.settings.get(setting.key()))
                .ok_or_else(|| SnapshotError::UnknownProfile {
                    category: category.as_str(),
                    profile: id.to_string(),
                }),
            (None, Some(_)) => Err(SnapshotError::UnknownSetting {
                key: setting.key().to_string(),
                scope: "on profiles",
            }),
            (Some(_), None) => Err(SnapshotError::UnknownSetting {
                key: setting.key().to_string(),
                scope: "outside a profile",
            }),
        }
    }

    fn effective(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<Cow<'_, Value>> {
        Ok(self.stored(setting, profile)?.map_or_else(
            || Cow::Owned(setting.default_value()),
            Cow::Borrowed,
        ))
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(setting: Setting, expected: &'static str, found: &Value) -> SnapshotError {
    SnapshotError::TypeMismatch {
        key: setting.key().to_string(),
        expected,
        found: kind_of(found),
    }
}

impl ConfigSnapshot for MemorySnapshot {
    fn read_bool(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<bool> {
        match self.effective(setting, profile)?.as_ref() {
            Value::Bool(flag) => Ok(*flag),
            Value::Null => Ok(false),
            other => Err(mismatch(setting, "boolean", other)),
        }
    }

    fn read_string(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<String> {
        match self.effective(setting, profile)?.as_ref() {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(mismatch(setting, "string", other)),
        }
    }

    fn read_string_list(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<Vec<String>> {
        match self.effective(setting, profile)?.as_ref() {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(ToString::to_string)
                        .ok_or_else(|| mismatch(setting, "string array", item))
                })
                .collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(mismatch(setting, "string array", other)),
        }
    }

    fn read_password(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<Option<PasswordData>> {
        match self.effective(setting, profile)?.as_ref() {
            Value::String(secret) if secret.is_empty() => Ok(None),
            Value::String(secret) => Ok(Some(PasswordData::new(secret.clone()))),
            Value::Null => Ok(None),
            other => Err(mismatch(setting, "password", other)),
        }
    }

    fn read_actions(
        &self,
        setting: Setting,
        profile: Option<&str>,
    ) -> SnapshotResult<ActionValue> {
        match self.effective(setting, profile)?.as_ref() {
            Value::Array(payloads) => {
                ActionValue::parse(payloads).map_err(|err| SnapshotError::InvalidAction {
                    key: setting.key().to_string(),
                    reason: err.to_string(),
                })
            }
            Value::Null => Ok(ActionValue::default()),
            other => Err(mismatch(setting, "action list", other)),
        }
    }

    fn profiles(&self, category: ProfileCategory) -> Vec<String> {
        self.document
            .profiles
            .category(category)
            .iter()
            .map(|profile| profile.id.clone())
            .collect()
    }

    fn is_default(&self, setting: Setting, profile: Option<&str>) -> SnapshotResult<bool> {
        Ok(self
            .stored(setting, profile)?
            .is_none_or(|value| *value == setting.default_value()))
    }

    fn read_app_property(&self, property: AppProperty) -> Option<String> {
        self.document.app_properties.get(property.key()).cloned()
    }
}

/// Incremental construction of a [`MemorySnapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotBuilder {
    document: SnapshotDocument,
}

impl MemorySnapshotBuilder {
    /// Set a global setting.
    #[must_use]
    pub fn setting(mut self, setting: Setting, value: impl Into<Value>) -> Self {
        self.document
            .settings
            .insert(setting.key().to_string(), value.into());
        self
    }

    /// Declare a profile without settings.
    #[must_use]
    pub fn profile(mut self, category: ProfileCategory, id: &str) -> Self {
        self.profile_entry(category, id);
        self
    }

    /// Set a profile-scoped setting, declaring the profile if needed.
    #[must_use]
    pub fn profile_setting(
        mut self,
        category: ProfileCategory,
        id: &str,
        setting: Setting,
        value: impl Into<Value>,
    ) -> Self {
        self.profile_entry(category, id)
            .settings
            .insert(setting.key().to_string(), value.into());
        self
    }

    /// Set an application property.
    #[must_use]
    pub fn app_property(mut self, property: AppProperty, value: impl Into<String>) -> Self {
        self.document
            .app_properties
            .insert(property.key().to_string(), value.into());
        self
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> MemorySnapshot {
        MemorySnapshot::new(self.document)
    }

    fn profile_entry(&mut self, category: ProfileCategory, id: &str) -> &mut ProfileDocument {
        let profiles = self.document.profiles.category_mut(category);
        let index = match profiles.iter().position(|profile| profile.id == id) {
            Some(index) => index,
            None => {
                profiles.push(ProfileDocument {
                    id: id.to_string(),
                    settings: BTreeMap::new(),
                });
                profiles.len() - 1
            }
        };
        &mut profiles[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_settings_read_as_defaults() {
        let snapshot = MemorySnapshot::default();
        assert_eq!(
            snapshot
                .read_string(Setting::SiteUrl, None)
                .expect("site url"),
            crate::setting::DEFAULT_SITE_URL
        );
        assert!(
            !snapshot
                .read_bool(Setting::LdapEnableWireTrace, None)
                .expect("wire trace")
        );
        assert!(
            snapshot
                .is_default(Setting::SiteUrl, None)
                .expect("default check")
        );
        assert!(
            snapshot
                .read_password(Setting::DatabasePassword, None)
                .expect("password")
                .is_none()
        );
    }

    #[test]
    fn action_settings_decode_into_action_values() {
        let snapshot = MemorySnapshot::builder()
            .setting(
                Setting::ChangePasswordWriteAttributes,
                json!([
                    null,
                    {"name": "stamp", "type": "directory", "attributeName": "description", "attributeValue": "reset"},
                    {"name": "notify", "type": "webservice", "method": "post", "url": "https://hooks.example.com"}
                ]),
            )
            .build();
        let actions = snapshot
            .read_actions(Setting::ChangePasswordWriteAttributes, None)
            .expect("actions");
        assert_eq!(actions.len(), 2);
        assert!(actions.lookup("notify").is_some());
        assert!(actions.validate(true).is_empty());

        assert!(
            MemorySnapshot::default()
                .read_actions(Setting::ChangePasswordWriteAttributes, None)
                .expect("default actions")
                .is_empty()
        );
    }

    #[test]
    fn malformed_action_payload_is_rejected() {
        let snapshot = MemorySnapshot::builder()
            .setting(
                Setting::ChangePasswordWriteAttributes,
                json!([{"name": "x", "type": "carrier-pigeon"}]),
            )
            .build();
        let err = snapshot
            .read_actions(Setting::ChangePasswordWriteAttributes, None)
            .expect_err("unknown variant");
        assert!(matches!(
            err,
            SnapshotError::InvalidAction { ref key, .. } if key == "changePassword.writeAttributes"
        ));

        let scalar = MemorySnapshot::builder()
            .setting(Setting::ChangePasswordWriteAttributes, "stamp")
            .build();
        assert!(matches!(
            scalar.read_actions(Setting::ChangePasswordWriteAttributes, None),
            Err(SnapshotError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn explicit_default_value_still_counts_as_default() {
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::SiteUrl, crate::setting::DEFAULT_SITE_URL)
            .build();
        assert!(snapshot.is_default(Setting::SiteUrl, None).expect("check"));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::LdapEnableWireTrace, "yes")
            .build();
        let err = snapshot
            .read_bool(Setting::LdapEnableWireTrace, None)
            .expect_err("string is not a boolean");
        assert!(matches!(
            err,
            SnapshotError::TypeMismatch {
                expected: "boolean",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn profile_scope_is_enforced() {
        let snapshot = MemorySnapshot::builder()
            .profile(ProfileCategory::Ldap, "default")
            .build();
        assert!(matches!(
            snapshot.read_string(Setting::LdapTestUserDn, None),
            Err(SnapshotError::UnknownSetting { .. })
        ));
        assert!(matches!(
            snapshot.read_string(Setting::SiteUrl, Some("default")),
            Err(SnapshotError::UnknownSetting { .. })
        ));
        assert!(matches!(
            snapshot.read_string(Setting::LdapTestUserDn, Some("backup")),
            Err(SnapshotError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn document_decodes_profiles_in_order() {
        let snapshot = MemorySnapshot::from_json(
            &json!({
                "settings": { "pwm.selfURL": "https://id.example.com" },
                "profiles": {
                    "ldap": [
                        { "id": "default", "settings": { "ldap.serverUrls": ["ldaps://a"] } },
                        { "id": "backup" }
                    ],
                    "passwordPolicy": [{ "id": "default" }]
                },
                "appProperties": { "ldap.promiscuousEnable": "true" }
            })
            .to_string(),
        )
        .expect("decode snapshot");

        assert_eq!(
            snapshot.profiles(ProfileCategory::Ldap),
            vec!["default".to_string(), "backup".to_string()]
        );
        assert_eq!(
            snapshot
                .read_string_list(Setting::LdapServerUrls, Some("default"))
                .expect("urls"),
            vec!["ldaps://a".to_string()]
        );
        assert_eq!(
            snapshot.read_app_property(AppProperty::LdapPromiscuousEnable),
            Some("true".to_string())
        );
    }

    #[test]
    fn numeric_values_read_as_text() {
        let snapshot = MemorySnapshot::builder()
            .profile_setting(
                ProfileCategory::PasswordPolicy,
                "default",
                Setting::PasswordPolicyMinimumLength,
                8,
            )
            .build();
        assert_eq!(
            snapshot
                .read_string(Setting::PasswordPolicyMinimumLength, Some("default"))
                .expect("min length"),
            "8"
        );
    }

    #[test]
    fn password_debug_is_redacted() {
        let secret = PasswordData::new("hunter2");
        assert_eq!(format!("{secret:?}"), "PasswordData(***)");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            MemorySnapshot::from_json("[1, 2]"),
            Err(SnapshotError::Document { .. })
        ));
    }
}
