use serde_json::{Value, json};
use warden_config::{
    ActionEntry, ActionKind, ActionValue, CERTIFICATE_INFOS_FIELD, DirectoryMethod, LEGACY_SYNTAX,
    LocaleCode, REQUIRED_VALUE_MISSING, SettingDocument, ValueNode, X509Inspector,
};
use warden_test_support::fixtures::{pinned_web_service, sample_entries, self_signed_certificate};

#[test]
fn document_round_trip_preserves_entries() {
    let value = ActionValue::new(sample_entries());
    let document = value.to_document().expect("encode document");
    assert_eq!(document.values.len(), 2);
    let restored = ActionValue::from_document(&document).expect("decode document");
    assert_eq!(restored, value);
}

#[test]
fn legacy_document_migrates_unlocalized_nodes() {
    let document = SettingDocument {
        syntax: Some(LEGACY_SYNTAX.to_string()),
        values: vec![
            ValueNode::new("cn=x"),
            ValueNode::localized("de", "sn=y"),
            ValueNode::new("description=a=b"),
        ],
    };
    let value = ActionValue::from_document(&document).expect("legacy document");
    assert_eq!(value.len(), 2);

    let first = value.lookup("cn").expect("cn entry");
    match first.action() {
        ActionKind::Directory(directory) => {
            assert_eq!(directory.method, DirectoryMethod::Replace);
            assert_eq!(directory.attribute_name, "cn");
            assert_eq!(directory.attribute_value, "x");
        }
        ActionKind::WebService(_) => panic!("legacy entries are directory writes"),
    }
    let second = value.lookup("description").expect("description entry");
    match second.action() {
        ActionKind::Directory(directory) => assert_eq!(directory.attribute_value, "a=b"),
        ActionKind::WebService(_) => panic!("legacy entries are directory writes"),
    }
}

#[test]
fn stored_payloads_accept_strings_and_objects() {
    let raw = vec![
        Value::Null,
        json!({"name": "a", "type": "ldap", "attributeName": "cn", "attributeValue": "1"}),
        Value::String(
            json!({"name": "b", "type": "webservice", "method": "get", "url": "https://x"})
                .to_string(),
        ),
    ];
    let value = ActionValue::parse(&raw).expect("parse payloads");
    assert_eq!(value.len(), 2);
    assert!(value.validate(true).is_empty());
}

#[test]
fn validation_is_single_message_in_priority_order() {
    assert_eq!(
        ActionValue::default().validate(true),
        vec![REQUIRED_VALUE_MISSING.to_string()]
    );

    let duplicate_and_broken = ActionValue::new(vec![
        ActionEntry::directory("Foo", "", ""),
        ActionEntry::directory("foo", "cn", "x"),
    ]);
    let messages = duplicate_and_broken.validate(false);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("each action name must be unique"));
    assert!(messages[0].contains("foo"));
}

#[test]
fn api_description_reports_certificate_facts_without_pem() {
    let pem = self_signed_certificate("audit.example.com").expect("certificate");
    let value = ActionValue::new(vec![
        ActionEntry::directory("plain", "cn", "x"),
        pinned_web_service("pinned", vec![pem.clone()]),
    ]);

    let described = value
        .describe_for_api(&X509Inspector)
        .expect("describe for api");
    assert!(!described[0].contains_key(CERTIFICATE_INFOS_FIELD));

    let infos = described[1][CERTIFICATE_INFOS_FIELD]
        .as_array()
        .expect("certificate infos");
    assert_eq!(infos.len(), 1);
    let facts = infos[0].as_object().expect("facts map");
    for key in ["subject", "issuer", "serial", "issueDate", "expireDate", "sha256Hash"] {
        assert!(facts.contains_key(key), "missing {key}");
    }
    let body = pem
        .lines()
        .find(|line| !line.starts_with("-----"))
        .expect("base64 body");
    for fact in facts.values() {
        let text = fact.as_str().unwrap_or_default();
        assert!(!text.contains("BEGIN CERTIFICATE"));
        assert!(!text.contains(body));
    }
}

#[test]
fn display_rendering_numbers_multiple_entries() {
    let value = ActionValue::new(sample_entries());
    let text = value.describe_for_display(LocaleCode::En);
    let lines = text.lines().collect::<Vec<_>>();
    assert!(lines[0].starts_with("Action0-directory: [Directory:"));
    assert!(lines[1].starts_with("Action1-webservice: [WebService:"));
}
