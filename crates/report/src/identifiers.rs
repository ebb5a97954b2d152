//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging —
//! for example — a [`RepoName`] with a [`BranchName`] even though both are
//! `String` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (GitHub names)
// ---------------------------------------------------------------------------

string_id! {
    /// A GitHub organization login (e.g. `"rust-lang"`).
    ///
    /// One report run is scoped to exactly one organization; a CLI invocation
    /// may process several organizations in sequence.
    OrgName
}

string_id! {
    /// A repository name within its organization (e.g. `"cargo"`).
    RepoName
}

string_id! {
    /// A Git branch name (e.g. `"main"`, `"feature/pagination"`).
    BranchName
}

string_id! {
    /// A GitHub user login, used both for activity attribution and for
    /// roster membership.
    UserLogin
}

string_id! {
    /// An opaque pagination cursor returned by the remote query API.
    ///
    /// Cursors are never inspected; they are handed back verbatim to request
    /// the next page.
    Cursor
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single report run (one CLI invocation).
///
/// Generated fresh for every invocation; propagated through spans so all
/// activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(OrgName::new("").is_none());
        assert!(UserLogin::new("").is_none());
    }

    #[test]
    fn identifier_round_trips_its_value() {
        let org = OrgName::new("rust-lang").unwrap();
        assert_eq!(org.as_str(), "rust-lang");
        assert_eq!(org.to_string(), "rust-lang");
    }
}
