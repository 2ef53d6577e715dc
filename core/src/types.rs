//! Domain types for the todo collection.
//!
//! # Design
//! `TodoId` wraps a 12-byte object identifier but serializes as its
//! 24-character hex string, which is the shape clients see in JSON. The
//! document-store form of the id field is `_id`, kept as the JSON name so a
//! todo travels unchanged between the HTTP surface and the store.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Opaque, immutable identifier of a stored todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(ObjectId);

/// Returned when a string is not a 24-character hex object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid todo id {0:?}")]
pub struct InvalidTodoId(pub String);

impl TodoId {
    /// Generate a fresh, unique id.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidTodoId> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidTodoId(raw.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for TodoId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for TodoId {
    type Err = InvalidTodoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// A single todo document.
///
/// Missing `title`, `body` and `completed` fields decode to their empty
/// defaults; it is up to the caller to reject empty text where required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TodoId>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// `null` and the empty string both mean "no id yet".
fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<TodoId>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => TodoId::parse(&raw).map(Some).map_err(de::Error::custom),
    }
}

impl Todo {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            completed: false,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Field-level changes merged into a stored document.
///
/// Keys are not checked against the `Todo` shape; any field present is
/// written verbatim.
pub type TodoPatch = serde_json::Map<String, serde_json::Value>;
