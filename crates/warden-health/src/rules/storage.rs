//! Response and secret storage checks.

use tracing::warn;
use warden_config::LocaleCode;

use super::HealthRule;
use crate::error::RuleResult;
use crate::record::{HealthMessage, HealthRecord};
use crate::setting::{ProfileCategory, Setting};
use crate::snapshot::ConfigSnapshot;

const LDAP_STORAGE: &str = "LDAP";
const DB_STORAGE: &str = "DB";
const LOCAL_DB_STORAGE: &str = "LOCALDB";

fn names_method(
    snapshot: &dyn ConfigSnapshot,
    setting: Setting,
    method: &str,
) -> RuleResult<bool> {
    Ok(snapshot
        .read_string_list(setting, None)?
        .iter()
        .any(|entry| entry.trim().eq_ignore_ascii_case(method)))
}

/// Responses stored in the directory without a response attribute on some profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAttributeRule;

impl HealthRule for ResponseAttributeRule {
    fn name(&self) -> &'static str {
        "response-attribute"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        for preference in [
            Setting::ForgottenPasswordReadPreference,
            Setting::ForgottenPasswordWritePreference,
        ] {
            if !names_method(snapshot, preference, LDAP_STORAGE)? {
                continue;
            }
            for profile in snapshot.profiles(ProfileCategory::Ldap) {
                let attribute =
                    match snapshot.read_string(Setting::ChallengeUserAttribute, Some(&profile)) {
                        Ok(attribute) => attribute,
                        Err(err) => {
                            warn!(
                                profile = %profile,
                                setting = Setting::ChallengeUserAttribute.key(),
                                error = %err,
                                "skipping directory profile response attribute check"
                            );
                            continue;
                        }
                    };
                if attribute.trim().is_empty() {
                    findings.push(HealthRecord::for_message(
                        HealthMessage::MissingLdapResponseAttr,
                        locale,
                        [
                            preference.menu_location(None, locale),
                            Setting::ChallengeUserAttribute.menu_location(Some(&profile), locale),
                        ],
                    ));
                }
            }
        }
        Ok(findings)
    }
}

/// Database storage requested without a database, and local database storage in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseConfiguredRule;

impl HealthRule for DatabaseConfiguredRule {
    fn name(&self) -> &'static str {
        "database-configured"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();

        let url = snapshot.read_string(Setting::DatabaseUrl, None)?;
        let class = snapshot.read_string(Setting::DatabaseClass, None)?;
        if url.trim().is_empty() || class.trim().is_empty() {
            let mut wants_db = false;
            for preference in [
                Setting::ForgottenPasswordReadPreference,
                Setting::ForgottenPasswordWritePreference,
                Setting::OtpSecretReadPreference,
                Setting::OtpSecretWritePreference,
            ] {
                wants_db |= names_method(snapshot, preference, DB_STORAGE)?;
            }
            if wants_db {
                findings.push(HealthRecord::for_message(
                    HealthMessage::MissingDb,
                    locale,
                    [""; 0],
                ));
            }
        }

        for preference in [
            Setting::ForgottenPasswordWritePreference,
            Setting::OtpSecretWritePreference,
        ] {
            if names_method(snapshot, preference, LOCAL_DB_STORAGE)? {
                findings.push(HealthRecord::for_message(
                    HealthMessage::UsingLocalDbResponseStorage,
                    locale,
                    [preference.menu_location(None, locale)],
                ));
            }
        }
        Ok(findings)
    }
}
