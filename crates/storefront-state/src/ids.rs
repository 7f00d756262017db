//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a line ID where a merchandise ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by line IDs the projector invents for unconfirmed adds.
pub const PROVISIONAL_LINE_PREFIX: &str = "pending-line:";

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CartId);
define_id!(LineId);
define_id!(MerchandiseId);

impl LineId {
    /// Line ID for a line that only exists because of the given pending add.
    pub fn provisional(action: ActionId) -> Self {
        Self(format!("{}{}", PROVISIONAL_LINE_PREFIX, action.0))
    }

    /// Whether the line was invented locally and has no server identity yet.
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_LINE_PREFIX)
    }
}

impl From<&VariantId> for MerchandiseId {
    fn from(id: &VariantId) -> Self {
        Self(id.0.clone())
    }
}

/// Identity of a pending cart action, unique within one session.
///
/// Action IDs are handed out in submission order, so comparing two IDs
/// from the same [`ActionIdGenerator`] compares their submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(u64);

impl ActionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of [`ActionId`]s for one session.
#[derive(Debug, Clone, Default)]
pub struct ActionIdGenerator {
    next: u64,
}

impl ActionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next ID.
    pub fn next_id(&mut self) -> ActionId {
        let id = ActionId(self.next);
        self.next += 1;
        id
    }
}
