// crates/bq-gateway-core/src/safety.rs
// ============================================================================
// Module: Query Safety Filter
// Description: Denylist guard for raw SQL statements.
// Purpose: Reject mutating statements before they reach the warehouse.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The safety filter is a case-sensitive substring denylist, not a parser.
//! A statement containing a denylisted token anywhere (inside a string
//! literal, an identifier, or a comment) is rejected regardless of intent.
//! Lowercase spellings are not matched. A read-only warehouse credential is
//! the real enforcement boundary.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tokens rejected by the default filter.
pub const DEFAULT_DENYLIST: &[&str] = &["DROP", "DELETE", "UPDATE"];

/// Reason returned when a statement is rejected.
pub const UNSAFE_QUERY_REASON: &str = "Unsafe query detected. Query execution aborted.";

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Verdict produced by [`SafetyFilter::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    /// Statement may be executed.
    Allowed,
    /// Statement must not be executed.
    Rejected {
        /// Human-readable rejection reason.
        reason: String,
        /// Denylisted token that matched.
        token: String,
    },
}

impl SafetyVerdict {
    /// Returns true when the statement is allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Substring denylist filter for statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyFilter {
    /// Tokens that cause rejection when present.
    denylist: Vec<String>,
}

impl SafetyFilter {
    /// Creates a filter with a custom denylist.
    #[must_use]
    pub fn new<I, S>(denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: denylist.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks a statement against the denylist.
    #[must_use]
    pub fn check(&self, statement: &str) -> SafetyVerdict {
        self.denylist.iter().find(|token| statement.contains(token.as_str())).map_or(
            SafetyVerdict::Allowed,
            |token| SafetyVerdict::Rejected {
                reason: UNSAFE_QUERY_REASON.to_string(),
                token: token.clone(),
            },
        )
    }
}

impl Default for SafetyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
