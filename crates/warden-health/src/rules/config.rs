//! General application checks.

use warden_config::LocaleCode;

use super::HealthRule;
use crate::error::RuleResult;
use crate::record::{HealthMessage, HealthRecord};
use crate::setting::{AppProperty, Setting};
use crate::snapshot::ConfigSnapshot;

/// Site URL missing or still at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteUrlRule;

impl HealthRule for SiteUrlRule {
    fn name(&self) -> &'static str {
        "site-url"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let url = snapshot.read_string(Setting::SiteUrl, None)?;
        if url.trim().is_empty() || snapshot.is_default(Setting::SiteUrl, None)? {
            return Ok(vec![HealthRecord::for_message(
                HealthMessage::NoSiteUrl,
                locale,
                [Setting::SiteUrl.menu_location(None, locale)],
            )]);
        }
        Ok(Vec::new())
    }
}

/// Directory wire tracing enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireTraceRule;

impl HealthRule for WireTraceRule {
    fn name(&self) -> &'static str {
        "ldap-wire-trace"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        flag_finding(
            snapshot,
            locale,
            Setting::LdapEnableWireTrace,
            HealthMessage::LdapWireTrace,
        )
    }
}

/// Promiscuous directory mode switched on through an app property.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromiscuousLdapRule;

impl HealthRule for PromiscuousLdapRule {
    fn name(&self) -> &'static str {
        "ldap-promiscuous"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let property = AppProperty::LdapPromiscuousEnable;
        let enabled = snapshot
            .read_app_property(property)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
        if enabled {
            return Ok(vec![HealthRecord::for_message(
                HealthMessage::PromiscuousLdap,
                locale,
                [property.location(locale)],
            )]);
        }
        Ok(Vec::new())
    }
}

/// Detailed error messages shown to end users.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailedErrorsRule;

impl HealthRule for DetailedErrorsRule {
    fn name(&self) -> &'static str {
        "detailed-errors"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        flag_finding(
            snapshot,
            locale,
            Setting::DisplayShowDetailedErrors,
            HealthMessage::ShowDetailedErrors,
        )
    }
}

fn flag_finding(
    snapshot: &dyn ConfigSnapshot,
    locale: LocaleCode,
    setting: Setting,
    message: HealthMessage,
) -> RuleResult<Vec<HealthRecord>> {
    if snapshot.read_bool(setting, None)? {
        return Ok(vec![HealthRecord::for_message(
            message,
            locale,
            [setting.menu_location(None, locale)],
        )]);
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshot;

    #[test]
    fn default_site_url_is_reported() {
        let findings = SiteUrlRule
            .audit(&MemorySnapshot::default(), LocaleCode::En)
            .expect("audit");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message_key, HealthMessage::NoSiteUrl.key());
        assert_eq!(
            findings[0].parameters,
            vec!["Settings ⇨ Application ⇨ Application ⇨ Site URL".to_string()]
        );
    }

    #[test]
    fn blank_site_url_is_reported() {
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::SiteUrl, "   ")
            .build();
        assert_eq!(
            SiteUrlRule
                .audit(&snapshot, LocaleCode::En)
                .expect("audit")
                .len(),
            1
        );
    }

    #[test]
    fn configured_site_url_passes() {
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::SiteUrl, "https://id.example.com")
            .build();
        assert!(
            SiteUrlRule
                .audit(&snapshot, LocaleCode::En)
                .expect("audit")
                .is_empty()
        );
    }

    #[test]
    fn enabled_flags_are_reported() {
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::LdapEnableWireTrace, true)
            .setting(Setting::DisplayShowDetailedErrors, true)
            .build();
        let wire = WireTraceRule.audit(&snapshot, LocaleCode::En).expect("audit");
        let detailed = DetailedErrorsRule
            .audit(&snapshot, LocaleCode::En)
            .expect("audit");
        assert_eq!(wire[0].message_key, HealthMessage::LdapWireTrace.key());
        assert_eq!(detailed[0].message_key, HealthMessage::ShowDetailedErrors.key());
    }

    #[test]
    fn promiscuous_property_is_case_insensitive() {
        let snapshot = MemorySnapshot::builder()
            .app_property(AppProperty::LdapPromiscuousEnable, "TRUE")
            .build();
        let findings = PromiscuousLdapRule
            .audit(&snapshot, LocaleCode::En)
            .expect("audit");
        assert_eq!(
            findings[0].parameters,
            vec!["AppProperty ⇨ ldap.promiscuousEnable".to_string()]
        );

        let off = MemorySnapshot::builder()
            .app_property(AppProperty::LdapPromiscuousEnable, "false")
            .build();
        assert!(
            PromiscuousLdapRule
                .audit(&off, LocaleCode::En)
                .expect("audit")
                .is_empty()
        );
    }
}
