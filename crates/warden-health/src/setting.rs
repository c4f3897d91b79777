//! Catalog of the settings read by the health rules.
//!
//! The full settings store owns many more properties; this catalog only describes the ones the
//! audit needs: storage key, navigation path, syntax, profile scope and built-in default.

use serde_json::{Value, json};
use warden_config::LocaleCode;

use crate::i18n::navigation_separator;

/// Value syntax of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingSyntax {
    /// `true` / `false`.
    Boolean,
    /// Single string (numbers are stored as text).
    String,
    /// Ordered list of strings.
    StringArray,
    /// Secret value.
    Password,
    /// Action entries.
    Action,
}

/// Profile categories whose settings are stored per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCategory {
    /// Directory connection profiles.
    Ldap,
    /// Password policy profiles.
    PasswordPolicy,
}

impl ProfileCategory {
    /// Key used by snapshot documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ldap => "ldap",
            Self::PasswordPolicy => "passwordPolicy",
        }
    }

    /// Navigation path of the category's profile list.
    #[must_use]
    pub const fn path(self) -> &'static [&'static str] {
        match self {
            Self::Ldap => &["LDAP", "LDAP Directories"],
            Self::PasswordPolicy => &["Policies", "Password Policies"],
        }
    }

    /// Human location of one profile, e.g. `Settings ⇨ Policies ⇨ Password Policies ⇨ default`.
    #[must_use]
    pub fn location(self, profile: &str, locale: LocaleCode) -> String {
        let mut segments = vec!["Settings"];
        segments.extend_from_slice(self.path());
        segments.push(profile);
        segments.join(&navigation_separator(locale))
    }
}

/// Application properties consulted by the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppProperty {
    /// Skips certificate verification for directory connections.
    LdapPromiscuousEnable,
}

impl AppProperty {
    /// Property key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LdapPromiscuousEnable => "ldap.promiscuousEnable",
        }
    }

    /// Human location path of the property.
    #[must_use]
    pub fn location(self, locale: LocaleCode) -> String {
        format!("AppProperty{}{}", navigation_separator(locale), self.key())
    }
}

macro_rules! settings {
    ($(
        $variant:ident => {
            key: $key:literal,
            label: $label:literal,
            path: [$($segment:literal),+],
            syntax: $syntax:ident,
            profile: $profile:expr,
        }
    ),+ $(,)?) => {
        /// Settings known to the audit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Setting {
            $(
                #[doc = $label]
                $variant,
            )+
        }

        impl Setting {
            /// Every catalogued setting in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Storage key.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Display label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Navigation path below the settings root.
            #[must_use]
            pub const fn path(self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($segment),+],)+
                }
            }

            /// Value syntax.
            #[must_use]
            pub const fn syntax(self) -> SettingSyntax {
                match self {
                    $(Self::$variant => SettingSyntax::$syntax,)+
                }
            }

            /// Owning profile category, if the setting is stored per profile.
            #[must_use]
            pub const fn profile_category(self) -> Option<ProfileCategory> {
                match self {
                    $(Self::$variant => $profile,)+
                }
            }
        }
    };
}

settings! {
    SiteUrl => {
        key: "pwm.selfURL",
        label: "Site URL",
        path: ["Application", "Application"],
        syntax: String,
        profile: None,
    },
    HideConfigurationHealthWarnings => {
        key: "display.hideConfigHealthWarnings",
        label: "Hide Configuration Health Warnings",
        path: ["User Interface", "Look & Feel"],
        syntax: Boolean,
        profile: None,
    },
    DisplayShowDetailedErrors => {
        key: "display.showDetailedErrors",
        label: "Show Detailed Error Messages",
        path: ["User Interface", "Look & Feel"],
        syntax: Boolean,
        profile: None,
    },
    LdapEnableWireTrace => {
        key: "ldap.wireTrace.enable",
        label: "Enable LDAP Wire Trace",
        path: ["LDAP", "LDAP Settings", "Global"],
        syntax: Boolean,
        profile: None,
    },
    LdapServerUrls => {
        key: "ldap.serverUrls",
        label: "LDAP URLs",
        path: ["LDAP", "LDAP Directories"],
        syntax: StringArray,
        profile: Some(ProfileCategory::Ldap),
    },
    LdapProxyUserPassword => {
        key: "ldap.proxy.password",
        label: "LDAP Proxy Password",
        path: ["LDAP", "LDAP Directories"],
        syntax: Password,
        profile: Some(ProfileCategory::Ldap),
    },
    LdapTestUserDn => {
        key: "ldap.testuser.username",
        label: "LDAP Test User",
        path: ["LDAP", "LDAP Directories"],
        syntax: String,
        profile: Some(ProfileCategory::Ldap),
    },
    ChallengeUserAttribute => {
        key: "challenge.userAttribute",
        label: "Response Storage Attribute",
        path: ["LDAP", "LDAP Directories"],
        syntax: String,
        profile: Some(ProfileCategory::Ldap),
    },
    ForgottenPasswordReadPreference => {
        key: "recovery.response.readPreference",
        label: "Read Responses Preference",
        path: ["Modules", "Forgotten Password", "Settings"],
        syntax: StringArray,
        profile: None,
    },
    ForgottenPasswordWritePreference => {
        key: "recovery.response.writePreference",
        label: "Write Responses Preference",
        path: ["Modules", "Forgotten Password", "Settings"],
        syntax: StringArray,
        profile: None,
    },
    OtpSecretReadPreference => {
        key: "otp.secret.readPreference",
        label: "OTP Secret Read Preference",
        path: ["Modules", "OTP", "Settings"],
        syntax: StringArray,
        profile: None,
    },
    OtpSecretWritePreference => {
        key: "otp.secret.writePreference",
        label: "OTP Secret Write Preference",
        path: ["Modules", "OTP", "Settings"],
        syntax: StringArray,
        profile: None,
    },
    DatabaseUrl => {
        key: "db.connection.url",
        label: "Database Connection String",
        path: ["Database", "Connection"],
        syntax: String,
        profile: None,
    },
    DatabaseClass => {
        key: "db.classname",
        label: "Database Driver Class",
        path: ["Database", "Connection"],
        syntax: String,
        profile: None,
    },
    DatabasePassword => {
        key: "db.password",
        label: "Database Password",
        path: ["Database", "Connection"],
        syntax: Password,
        profile: None,
    },
    EmailServerPassword => {
        key: "email.smtp.password",
        label: "SMTP Server Password",
        path: ["Notifications", "Email", "Email Servers"],
        syntax: Password,
        profile: None,
    },
    SmsGatewayPassword => {
        key: "sms.gatewayPassword",
        label: "SMS Gateway Password",
        path: ["Notifications", "SMS", "SMS Gateway"],
        syntax: Password,
        profile: None,
    },
    ChangePasswordWriteAttributes => {
        key: "changePassword.writeAttributes",
        label: "Post Password Change Actions",
        path: ["Modules", "Change Password"],
        syntax: Action,
        profile: None,
    },
    PasswordPolicyMinimumLength => {
        key: "password.policy.minimumLength",
        label: "Minimum Length",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumLength => {
        key: "password.policy.maximumLength",
        label: "Maximum Length",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMinimumAlpha => {
        key: "password.policy.minimumAlpha",
        label: "Minimum Alpha",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumAlpha => {
        key: "password.policy.maximumAlpha",
        label: "Maximum Alpha",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMinimumNumeric => {
        key: "password.policy.minimumNumeric",
        label: "Minimum Numeric",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumNumeric => {
        key: "password.policy.maximumNumeric",
        label: "Maximum Numeric",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMinimumSpecial => {
        key: "password.policy.minimumSpecial",
        label: "Minimum Special",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumSpecial => {
        key: "password.policy.maximumSpecial",
        label: "Maximum Special",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMinimumUpperCase => {
        key: "password.policy.minimumUpperCase",
        label: "Minimum Uppercase",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumUpperCase => {
        key: "password.policy.maximumUpperCase",
        label: "Maximum Uppercase",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMinimumLowerCase => {
        key: "password.policy.minimumLowerCase",
        label: "Minimum Lowercase",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
    PasswordPolicyMaximumLowerCase => {
        key: "password.policy.maximumLowerCase",
        label: "Maximum Lowercase",
        path: ["Policies", "Password Policies"],
        syntax: String,
        profile: Some(ProfileCategory::PasswordPolicy),
    },
}

/// Built-in default of the public site URL.
pub const DEFAULT_SITE_URL: &str = "http://localhost:8080/warden";

impl Setting {
    /// Look a setting up by its storage key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|setting| setting.key() == key)
    }

    /// Built-in default value.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::SiteUrl => json!(DEFAULT_SITE_URL),
            Self::ChallengeUserAttribute => json!("pwmResponseSet"),
            Self::ForgottenPasswordReadPreference
            | Self::ForgottenPasswordWritePreference
            | Self::OtpSecretReadPreference
            | Self::OtpSecretWritePreference => json!(["LDAP"]),
            Self::PasswordPolicyMinimumLength => json!("2"),
            Self::PasswordPolicyMaximumLength => json!("64"),
            Self::PasswordPolicyMinimumAlpha
            | Self::PasswordPolicyMaximumAlpha
            | Self::PasswordPolicyMinimumNumeric
            | Self::PasswordPolicyMaximumNumeric
            | Self::PasswordPolicyMinimumSpecial
            | Self::PasswordPolicyMaximumSpecial
            | Self::PasswordPolicyMinimumUpperCase
            | Self::PasswordPolicyMaximumUpperCase
            | Self::PasswordPolicyMinimumLowerCase
            | Self::PasswordPolicyMaximumLowerCase => json!("0"),
            other => match other.syntax() {
                SettingSyntax::Boolean => json!(false),
                SettingSyntax::String => json!(""),
                SettingSyntax::StringArray | SettingSyntax::Action => json!([]),
                SettingSyntax::Password => Value::Null,
            },
        }
    }

    /// Human location path, e.g. `Settings ⇨ LDAP ⇨ LDAP Directories ⇨ default ⇨ LDAP URLs`.
    #[must_use]
    pub fn menu_location(self, profile: Option<&str>, locale: LocaleCode) -> String {
        let separator = navigation_separator(locale);
        let mut segments = Vec::with_capacity(self.path().len() + 3);
        segments.push("Settings");
        segments.extend_from_slice(self.path());
        if let Some(profile) = profile {
            segments.push(profile);
        }
        segments.push(self.label());
        segments.join(&separator)
    }
}
