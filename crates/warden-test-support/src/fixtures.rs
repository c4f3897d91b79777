//! Snapshots, action entries and certificates for integration suites.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rcgen::{CertifiedKey, generate_simple_self_signed};
use serde_json::{Value, json};
use warden_config::{ActionEntry, ActionKind, WebServiceAction, WebServiceMethod};
use warden_health::{AppProperty, MemorySnapshot, ProfileCategory, Setting};

/// Password that scores 100 with the character class scorer.
pub const STRONG_PASSWORD: &str = "Tr0ub4dor&3-Horse!Staple";

/// Snapshot that passes every default health rule.
#[must_use]
pub fn hardened_snapshot() -> MemorySnapshot {
    MemorySnapshot::builder()
        .setting(Setting::SiteUrl, "https://id.example.com/warden")
        .setting(Setting::DatabaseUrl, "jdbc:postgresql://db.example.com/warden")
        .setting(Setting::DatabaseClass, "org.postgresql.Driver")
        .setting(Setting::DatabasePassword, STRONG_PASSWORD)
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::LdapServerUrls,
            json!(["ldaps://directory.example.com:636"]),
        )
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::LdapTestUserDn,
            "cn=probe,ou=service,o=example",
        )
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::LdapProxyUserPassword,
            STRONG_PASSWORD,
        )
        .profile(ProfileCategory::PasswordPolicy, "default")
        .build()
}

/// Snapshot that trips every default health rule at least once.
///
/// Findings in audit order: no site URL, wire trace, promiscuous mode, detailed errors, missing
/// test user, insecure URL, unparseable URL, weak password, missing response attribute, missing
/// database, local database storage, contradictory password policy.
#[must_use]
pub fn insecure_snapshot() -> MemorySnapshot {
    MemorySnapshot::builder()
        .setting(Setting::LdapEnableWireTrace, true)
        .setting(Setting::DisplayShowDetailedErrors, true)
        .setting(Setting::DatabasePassword, "secret")
        .setting(Setting::ForgottenPasswordWritePreference, json!(["LOCALDB"]))
        .setting(Setting::OtpSecretReadPreference, json!(["DB"]))
        .app_property(AppProperty::LdapPromiscuousEnable, "true")
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::LdapServerUrls,
            json!(["ldap://directory.example.com", "not a url"]),
        )
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::ChallengeUserAttribute,
            "",
        )
        .profile_setting(
            ProfileCategory::Ldap,
            "default",
            Setting::LdapProxyUserPassword,
            STRONG_PASSWORD,
        )
        .profile_setting(
            ProfileCategory::PasswordPolicy,
            "default",
            Setting::PasswordPolicyMinimumLength,
            "12",
        )
        .profile_setting(
            ProfileCategory::PasswordPolicy,
            "default",
            Setting::PasswordPolicyMaximumLength,
            "8",
        )
        .build()
}

/// A directory entry and a web service entry.
#[must_use]
pub fn sample_entries() -> Vec<ActionEntry> {
    vec![
        ActionEntry::directory("mark-changed", "pwmLastChange", "@CurrentTime@")
            .with_description("Record the change time"),
        ActionEntry::web_service(
            "notify-hr",
            WebServiceMethod::Post,
            "https://hr.example.com/hooks/password",
        ),
    ]
}

/// Web service entry pinned to `certificates`.
#[must_use]
pub fn pinned_web_service(name: &str, certificates: Vec<String>) -> ActionEntry {
    ActionEntry::new(
        name,
        ActionKind::WebService(WebServiceAction {
            method: Some(WebServiceMethod::Get),
            url: "https://audit.example.com/ping".to_string(),
            trusted_certificates: certificates,
            ..WebServiceAction::default()
        }),
    )
}

/// PEM-encoded self-signed certificate for `host`.
///
/// # Errors
///
/// Returns an error if certificate generation fails.
pub fn self_signed_certificate(host: &str) -> Result<String> {
    let CertifiedKey { cert, .. } = generate_simple_self_signed(vec![host.to_string()])
        .context("failed to generate self-signed certificate")?;
    Ok(cert.pem())
}

/// Write `value` as pretty JSON to `dir/name`.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded or the file cannot be written.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).context("failed to encode fixture")?;
    fs::write(&path, text).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(path)
}

/// JSON document form of a snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be encoded.
pub fn snapshot_json(snapshot: &MemorySnapshot) -> Result<Value> {
    serde_json::to_value(snapshot.document()).context("failed to encode snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_health::ConfigSnapshot;

    #[test]
    fn sample_entries_validate() {
        let value = warden_config::ActionValue::new(sample_entries());
        assert!(value.validate(true).is_empty());
    }

    #[test]
    fn certificate_is_pem() {
        let pem = self_signed_certificate("localhost").expect("certificate");
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn snapshots_declare_one_directory_profile() {
        assert_eq!(
            hardened_snapshot().profiles(ProfileCategory::Ldap),
            vec!["default".to_string()]
        );
        assert_eq!(
            insecure_snapshot().profiles(ProfileCategory::Ldap),
            vec!["default".to_string()]
        );
    }
}
