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

//! Configuration health audit.
//!
//! Layout: `record.rs` (findings and message identifiers), `setting.rs` (catalog of audited
//! settings), `snapshot.rs` (read contract and in-memory snapshot), `strength.rs` (password
//! scoring), `rules/` (individual checks), `engine.rs` (ordered, fault-isolated execution),
//! `i18n.rs` (bundled message catalog), `error.rs`.

pub mod engine;
pub mod error;
pub mod i18n;
pub mod record;
pub mod rules;
pub mod setting;
pub mod snapshot;
pub mod strength;

pub use engine::{ApplicationMode, HealthEngine};
pub use error::{RuleError, RuleResult, ScoreError, SnapshotError, SnapshotResult};
pub use i18n::{BundledCatalog, MessageCatalog, localize, navigation_separator};
pub use record::{HealthMessage, HealthRecord, HealthStatus, HealthTopic};
pub use rules::{HealthRule, default_rules};
pub use setting::{AppProperty, ProfileCategory, Setting, SettingSyntax};
pub use snapshot::{
    ConfigSnapshot, MemorySnapshot, MemorySnapshotBuilder, PasswordData, ProfileDocument,
    ProfileSets, SnapshotDocument,
};
pub use strength::{CharacterClassScorer, PasswordStrengthScorer};
