//! Action entries: one configured directory write or web-service call.
//!
//! # Design
//! - `ActionKind` is an internally tagged enum so the wire form stays a flat JSON object
//!   (`{"name": .., "type": "webservice", "url": ..}`) and serde keeps both variants exhaustive.
//! - Entries are built once through the constructors below; `ActionValue` only hands out shared
//!   references afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EntryError;

/// A named action attached to a configuration setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    action: ActionKind,
}

/// Variant payload of an action entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    /// Write an attribute on the user's directory entry.
    #[serde(alias = "ldap")]
    Directory(DirectoryAction),
    /// Invoke an external web service.
    WebService(WebServiceAction),
}

/// Directory attribute write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAction {
    /// How the attribute value is applied.
    #[serde(default, alias = "ldapMethod")]
    pub method: DirectoryMethod,
    /// Target attribute.
    #[serde(default)]
    pub attribute_name: String,
    /// Value written to the attribute; may contain macros resolved at execution time.
    #[serde(default)]
    pub attribute_value: String,
}

/// Web-service invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebServiceAction {
    /// HTTP method; absent methods fail validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<WebServiceMethod>,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Request headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Request body template.
    #[serde(default)]
    pub body: String,
    /// PEM-encoded certificates pinned for the target host.
    #[serde(default, rename = "certificates", skip_serializing_if = "Vec::is_empty")]
    pub trusted_certificates: Vec<String>,
}

/// Directory modification methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMethod {
    /// Replace all existing values.
    #[default]
    Replace,
    /// Add a value, keeping existing ones.
    Add,
    /// Remove the given value.
    Remove,
}

impl DirectoryMethod {
    /// Render the method as its wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// HTTP methods accepted for web-service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebServiceMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl WebServiceMethod {
    /// Render the method as its wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

impl ActionEntry {
    /// Build an entry from a name and its payload.
    #[must_use]
    pub fn new(name: impl Into<String>, action: ActionKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            action,
        }
    }

    /// Directory entry replacing `attribute_name` with `attribute_value`.
    #[must_use]
    pub fn directory(
        name: impl Into<String>,
        attribute_name: impl Into<String>,
        attribute_value: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            ActionKind::Directory(DirectoryAction {
                method: DirectoryMethod::Replace,
                attribute_name: attribute_name.into(),
                attribute_value: attribute_value.into(),
            }),
        )
    }

    /// Web-service entry calling `url` with `method`.
    #[must_use]
    pub fn web_service(
        name: impl Into<String>,
        method: WebServiceMethod,
        url: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            ActionKind::WebService(WebServiceAction {
                method: Some(method),
                url: url.into(),
                ..WebServiceAction::default()
            }),
        )
    }

    /// Attach a free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Entry name, unique (case-insensitively) within a value.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Variant payload.
    #[must_use]
    pub const fn action(&self) -> &ActionKind {
        &self.action
    }

    /// Discriminant label used in renderings (`directory` or `webservice`).
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self.action {
            ActionKind::Directory(_) => "directory",
            ActionKind::WebService(_) => "webservice",
        }
    }

    /// Pinned certificates; always empty for directory entries.
    #[must_use]
    pub fn trusted_certificates(&self) -> &[String] {
        match &self.action {
            ActionKind::WebService(web) => &web.trusted_certificates,
            ActionKind::Directory(_) => &[],
        }
    }

    /// Check the structural invariants of the payload.
    ///
    /// # Errors
    ///
    /// Returns `EntryError` when a directory entry has no attribute name, or a web-service entry
    /// has no URL or method.
    pub fn validate(&self) -> Result<(), EntryError> {
        match &self.action {
            ActionKind::Directory(directory) if directory.attribute_name.trim().is_empty() => {
                Err(EntryError::MissingAttributeName {
                    name: self.name.clone(),
                })
            }
            ActionKind::WebService(web) if web.url.trim().is_empty() => Err(EntryError::MissingUrl {
                name: self.name.clone(),
            }),
            ActionKind::WebService(web) if web.method.is_none() => {
                Err(EntryError::MissingMethod {
                    name: self.name.clone(),
                })
            }
            ActionKind::Directory(_) | ActionKind::WebService(_) => Ok(()),
        }
    }

    /// Bracketed body of the display rendering. Certificates are never included.
    pub(crate) fn display_body(&self) -> String {
        match &self.action {
            ActionKind::WebService(web) => {
                let headers = serde_json::to_string(&web.headers).unwrap_or_default();
                format!(
                    "WebService: method={} url={} headers={} body={}",
                    web.method.map_or("", WebServiceMethod::as_str),
                    web.url,
                    headers,
                    web.body
                )
            }
            ActionKind::Directory(directory) => format!(
                "Directory: method={} attribute={} value={}",
                directory.method.as_str(),
                directory.attribute_name,
                directory.attribute_value
            ),
        }
    }
}

impl WebServiceAction {
    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
