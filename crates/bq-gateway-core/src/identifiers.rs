// crates/bq-gateway-core/src/identifiers.rs
// ============================================================================
// Module: Warehouse Identifiers
// Description: Opaque identifiers for warehouse resources and shape checks.
// Purpose: Provide typed IDs and the allow-list validation used before any
//          identifier is embedded into statement text.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings scoped project ⊃ dataset ⊃ table/model.
//! The wrappers themselves do not validate; listing and schema lookups only
//! require non-empty values. Anything embedded into generated statement text
//! must first pass [`IdentifierKind::validate`], which enforces a strict
//! allowed-character pattern per resource kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum project identifier length (excluding an optional domain prefix).
const MAX_PROJECT_LENGTH: usize = 30;
/// Maximum domain prefix length for domain-scoped projects.
const MAX_PROJECT_DOMAIN_LENGTH: usize = 253;
/// Maximum dataset and model identifier length.
const MAX_DATASET_LENGTH: usize = 1024;
/// Maximum table identifier length.
const MAX_TABLE_LENGTH: usize = 1024;
/// Maximum column name length.
const MAX_COLUMN_LENGTH: usize = 300;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

macro_rules! opaque_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, ".")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_identifier!(
    /// Warehouse project identifier (the outermost resource scope).
    ProjectId,
    "project identifier"
);
opaque_identifier!(
    /// Dataset identifier scoped to a project.
    DatasetId,
    "dataset identifier"
);
opaque_identifier!(
    /// Table identifier scoped to a dataset.
    TableId,
    "table identifier"
);
opaque_identifier!(
    /// Model identifier scoped to a dataset.
    ModelId,
    "model identifier"
);
opaque_identifier!(
    /// Column name within a table.
    ColumnName,
    "column name"
);

// ============================================================================
// SECTION: Shape Validation
// ============================================================================

/// Resource kinds with distinct identifier shape rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Project identifiers: lowercase letters, digits, hyphens.
    Project,
    /// Dataset identifiers: letters, digits, underscores.
    Dataset,
    /// Table identifiers: letters, digits, underscores, hyphens.
    Table,
    /// Model identifiers: letters, digits, underscores.
    Model,
    /// Column names: letters, digits, underscores; no leading digit.
    Column,
}

impl IdentifierKind {
    /// Returns a stable label for error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project_id",
            Self::Dataset => "dataset_id",
            Self::Table => "table_id",
            Self::Model => "model_name",
            Self::Column => "column",
        }
    }

    /// Validates that `value` matches the strict shape for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is empty, too long, or
    /// contains a character outside the allow-list.
    pub fn validate(self, value: &str) -> Result<(), IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::Empty(self));
        }
        match self {
            Self::Project => validate_project(value),
            Self::Dataset | Self::Model => {
                check_length(self, value, MAX_DATASET_LENGTH)?;
                check_chars(self, value, |ch| ch.is_ascii_alphanumeric() || ch == '_')
            }
            Self::Table => {
                check_length(self, value, MAX_TABLE_LENGTH)?;
                check_chars(self, value, |ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
            }
            Self::Column => {
                check_length(self, value, MAX_COLUMN_LENGTH)?;
                if value.starts_with(|ch: char| ch.is_ascii_digit()) {
                    return Err(IdentifierError::InvalidStart(self));
                }
                check_chars(self, value, |ch| ch.is_ascii_alphanumeric() || ch == '_')
            }
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier shape validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier is empty.
    #[error("{0} must not be empty")]
    Empty(IdentifierKind),
    /// The identifier exceeds the maximum length for its kind.
    #[error("{kind} exceeds {max} characters")]
    TooLong {
        /// Identifier kind.
        kind: IdentifierKind,
        /// Maximum allowed length.
        max: usize,
    },
    /// The identifier contains a disallowed character.
    #[error("{0} contains a disallowed character")]
    InvalidCharacter(IdentifierKind),
    /// The identifier starts with a disallowed character.
    #[error("{0} has an invalid leading character")]
    InvalidStart(IdentifierKind),
}

/// Validates a project identifier with an optional `domain:` prefix.
fn validate_project(value: &str) -> Result<(), IdentifierError> {
    let kind = IdentifierKind::Project;
    let (domain, project) = match value.split_once(':') {
        Some((domain, project)) => (Some(domain), project),
        None => (None, value),
    };
    if let Some(domain) = domain {
        if domain.is_empty() || domain.len() > MAX_PROJECT_DOMAIN_LENGTH {
            return Err(IdentifierError::InvalidCharacter(kind));
        }
        check_chars(kind, domain, |ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '-'
        })?;
    }
    if project.is_empty() {
        return Err(IdentifierError::Empty(kind));
    }
    check_length(kind, project, MAX_PROJECT_LENGTH)?;
    if !project.starts_with(|ch: char| ch.is_ascii_lowercase()) {
        return Err(IdentifierError::InvalidStart(kind));
    }
    check_chars(kind, project, |ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Rejects values longer than `max` characters.
fn check_length(kind: IdentifierKind, value: &str, max: usize) -> Result<(), IdentifierError> {
    if value.chars().count() > max {
        return Err(IdentifierError::TooLong {
            kind,
            max,
        });
    }
    Ok(())
}

/// Rejects values containing characters outside the allow-list.
fn check_chars(
    kind: IdentifierKind,
    value: &str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), IdentifierError> {
    if value.chars().all(allowed) {
        Ok(())
    } else {
        Err(IdentifierError::InvalidCharacter(kind))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only assertions."
    )]

    use proptest::prelude::*;

    use super::IdentifierError;
    use super::IdentifierKind;
    use super::ProjectId;

    #[test]
    fn project_accepts_plain_and_domain_scoped_ids() {
        assert!(IdentifierKind::Project.validate("bq-sample-project-456713").is_ok());
        assert!(IdentifierKind::Project.validate("p").is_ok());
        assert!(IdentifierKind::Project.validate("example.com:analytics-prod").is_ok());
    }

    #[test]
    fn project_rejects_uppercase_backticks_and_leading_digit() {
        assert_eq!(
            IdentifierKind::Project.validate("Upper"),
            Err(IdentifierError::InvalidStart(IdentifierKind::Project))
        );
        assert!(IdentifierKind::Project.validate("p`x").is_err());
        assert!(IdentifierKind::Project.validate("1abc").is_err());
        assert!(IdentifierKind::Project.validate(":abc").is_err());
    }

    #[test]
    fn column_rejects_leading_digit() {
        assert_eq!(
            IdentifierKind::Column.validate("1col"),
            Err(IdentifierError::InvalidStart(IdentifierKind::Column))
        );
        assert!(IdentifierKind::Column.validate("row_id").is_ok());
    }

    #[test]
    fn table_allows_hyphen_but_dataset_does_not() {
        assert!(IdentifierKind::Table.validate("events-2024").is_ok());
        assert!(IdentifierKind::Dataset.validate("events-2024").is_err());
    }

    #[test]
    fn column_length_limit_is_enforced() {
        let long = "c".repeat(301);
        assert_eq!(
            IdentifierKind::Column.validate(&long),
            Err(IdentifierError::TooLong {
                kind: IdentifierKind::Column,
                max: 300,
            })
        );
    }

    #[test]
    fn identifiers_serialize_as_plain_strings() {
        let id = ProjectId::new("proj");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"proj\"");
        assert_eq!(id.to_string(), "proj");
    }

    proptest! {
        #[test]
        fn quoting_characters_are_refused_for_every_kind(
            head in "[a-z]{1,8}",
            quote in "[`'\" ;\\\\]",
            tail in "[a-z0-9]{0,8}"
        ) {
            let value = format!("{head}{quote}{tail}");
            for kind in [
                IdentifierKind::Project,
                IdentifierKind::Dataset,
                IdentifierKind::Table,
                IdentifierKind::Model,
                IdentifierKind::Column,
            ] {
                prop_assert!(kind.validate(&value).is_err());
            }
        }

        #[test]
        fn lowercase_words_are_valid_tables(value in "[a-z][a-z0-9_-]{0,40}") {
            prop_assert!(IdentifierKind::Table.validate(&value).is_ok());
        }
    }
}
