#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

//! Typed action values for security-sensitive settings.
//!
//! Layout: `action.rs` (entry variants and structural validation), `value.rs` (`ActionValue`
//! parsing, serialisation, validation and rendering), `document.rs` (persisted node format and
//! legacy conversion), `certificate.rs` (redacted certificate facts), `locale.rs`, `error.rs`.

pub mod action;
pub mod certificate;
pub mod document;
pub mod error;
pub mod locale;
pub mod value;

pub use action::{
    ActionEntry, ActionKind, DirectoryAction, DirectoryMethod, WebServiceAction, WebServiceMethod,
};
pub use certificate::{CertificateFacts, CertificateInspector, X509Inspector};
pub use document::{ACTION_SYNTAX, LEGACY_SYNTAX, SettingDocument, ValueNode, legacy_entry};
pub use error::{ConfigError, ConfigResult, EntryError};
pub use locale::LocaleCode;
pub use value::{ActionValue, CERTIFICATE_INFOS_FIELD, REQUIRED_VALUE_MISSING};
