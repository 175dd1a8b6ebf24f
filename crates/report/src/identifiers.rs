//! Newtype domain identifiers.
//!
//! Every name the report passes to the hosting API is a distinct newtype
//! wrapping a `String`. This prevents accidentally interchanging, for example,
//! a [`RepositoryName`] with an [`AuthorLogin`] even though both are plain
//! strings on the wire.

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
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
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
// Identifiers: String-backed (hosting API names)
// ---------------------------------------------------------------------------

string_id! {
    /// The organization whose repositories are scanned (e.g. `"acme"`).
    ///
    /// Also used as the `owner` segment of every repository-scoped API call.
    Organization
}

string_id! {
    /// A repository name within the organization (e.g. `"billing-service"`).
    RepositoryName
}

string_id! {
    /// A Git commit SHA as reported by the hosting API.
    ///
    /// Only unique within one repository's history; see [`crate::CommitKey`].
    CommitSha
}

string_id! {
    /// The commit-author identity used to filter commit listings
    /// (a GitHub login or a commit email address).
    AuthorLogin
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single report run (one invocation of the binary).
///
/// Generated fresh for every invocation and attached to the root tracing span
/// so all activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRunId(Uuid);

impl ReportRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ReportRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
