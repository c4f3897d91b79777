//! Diagnostic findings and the message identifiers they reference.

use serde::{Deserialize, Serialize};
use warden_config::LocaleCode;

use crate::i18n::MessageCatalog;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// Informational notice.
    Info,
    /// Unsafe or incomplete configuration.
    Warn,
    /// Configuration that prevents correct operation.
    Severe,
}

impl HealthStatus {
    /// Upper-case label used in renderings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Severe => "SEVERE",
        }
    }
}

/// Category tag attached to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthTopic {
    /// General application configuration.
    Configuration,
    /// Directory connectivity settings.
    #[serde(rename = "LDAP")]
    Ldap,
    /// Secondary storage settings.
    Database,
    /// Password policy profiles.
    PasswordPolicy,
}

impl HealthTopic {
    /// Label used in renderings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "Configuration",
            Self::Ldap => "LDAP",
            Self::Database => "Database",
            Self::PasswordPolicy => "PasswordPolicy",
        }
    }
}

/// Catalogued diagnostic messages with their fixed severity and topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthMessage {
    /// Application is running in configuration mode.
    ConfigMode,
    /// Site URL missing or left at its default.
    NoSiteUrl,
    /// Directory wire tracing is enabled.
    LdapWireTrace,
    /// Promiscuous directory mode enabled through an app property.
    PromiscuousLdap,
    /// Detailed errors are shown to end users.
    ShowDetailedErrors,
    /// Directory profile has no test user.
    AddTestUser,
    /// Directory server URL uses a non-secure scheme.
    LdapUnsecure,
    /// A setting value could not be parsed.
    ParseError,
    /// A stored password is weak.
    WeakPassword,
    /// Responses stored in the directory but no response attribute configured.
    MissingLdapResponseAttr,
    /// Database storage requested but no database configured.
    MissingDb,
    /// Responses stored in the local embedded database.
    UsingLocalDbResponseStorage,
    /// Password policy contains contradictory rules.
    PasswordPolicyProblem,
}

impl HealthMessage {
    /// Catalog key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ConfigMode => "HealthMessage_Config_ConfigMode",
            Self::NoSiteUrl => "HealthMessage_Config_NoSiteURL",
            Self::LdapWireTrace => "HealthMessage_Config_LDAPWireTrace",
            Self::PromiscuousLdap => "HealthMessage_Config_PromiscuousLDAP",
            Self::ShowDetailedErrors => "HealthMessage_Config_ShowDetailedErrors",
            Self::AddTestUser => "HealthMessage_Config_AddTestUser",
            Self::LdapUnsecure => "HealthMessage_Config_LDAPUnsecure",
            Self::ParseError => "HealthMessage_Config_ParseError",
            Self::WeakPassword => "HealthMessage_Config_WeakPassword",
            Self::MissingLdapResponseAttr => "HealthMessage_Config_MissingLDAPResponseAttr",
            Self::MissingDb => "HealthMessage_Config_MissingDB",
            Self::UsingLocalDbResponseStorage => "HealthMessage_Config_UsingLocalDBResponseStorage",
            Self::PasswordPolicyProblem => "HealthMessage_Config_PasswordPolicyProblem",
        }
    }

    /// Severity every finding of this message carries.
    #[must_use]
    pub const fn status(self) -> HealthStatus {
        match self {
            Self::UsingLocalDbResponseStorage => HealthStatus::Info,
            _ => HealthStatus::Warn,
        }
    }

    /// Topic every finding of this message carries.
    #[must_use]
    pub const fn topic(self) -> HealthTopic {
        match self {
            Self::LdapWireTrace
            | Self::PromiscuousLdap
            | Self::AddTestUser
            | Self::LdapUnsecure
            | Self::MissingLdapResponseAttr => HealthTopic::Ldap,
            Self::MissingDb | Self::UsingLocalDbResponseStorage => HealthTopic::Database,
            Self::PasswordPolicyProblem => HealthTopic::PasswordPolicy,
            Self::ConfigMode
            | Self::NoSiteUrl
            | Self::ShowDetailedErrors
            | Self::ParseError
            | Self::WeakPassword => HealthTopic::Configuration,
        }
    }
}

/// One audit finding. Rendering to text is left to a [`MessageCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Severity.
    pub severity: HealthStatus,
    /// Category tag.
    pub topic: HealthTopic,
    /// Catalog key of the message.
    pub message_key: String,
    /// Ordered substitution parameters.
    pub parameters: Vec<String>,
    /// Locale the parameters were produced for.
    pub locale: LocaleCode,
}

impl HealthRecord {
    /// Finding for a catalogued message.
    #[must_use]
    pub fn for_message<I, S>(message: HealthMessage, locale: LocaleCode, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            severity: message.status(),
            topic: message.topic(),
            message_key: message.key().to_string(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            locale,
        }
    }

    /// Render the finding text in the record's locale.
    #[must_use]
    pub fn render(&self, catalog: &dyn MessageCatalog) -> String {
        catalog.render(self.locale, &self.message_key, &self.parameters)
    }
}
