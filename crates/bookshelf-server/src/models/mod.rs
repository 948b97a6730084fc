//! Shared domain types
//!
//! Record structs used across features live next to the queries that produce
//! them; the types here are the ones shared between features and the schema.

use serde::{Deserialize, Serialize};

/// Lifecycle of a soft-deletable record.
///
/// The transition is one-way: `Active` -> `Deleted`. The `deleted_at`
/// timestamp is set in the same statement that changes the state, so the two
/// cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "record_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Deleted,
}

/// Honorific carried on a user profile. Matches the `user_title` enum in the
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_title")]
pub enum Title {
    Mr,
    Mrs,
    Miss,
}

impl Title {
    pub fn as_str(&self) -> &'static str {
        match self {
            Title::Mr => "Mr",
            Title::Mrs => "Mrs",
            Title::Miss => "Miss",
        }
    }
}

impl std::str::FromStr for Title {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mr" => Ok(Title::Mr),
            "Mrs" => Ok(Title::Mrs),
            "Miss" => Ok(Title::Miss),
            _ => Err(()),
        }
    }
}

/// Postal address attached to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}
