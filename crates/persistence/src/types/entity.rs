//! The attributes every stored entity carries.
//!
//! Both entity kinds embed an [`EntityMeta`] (flattened into the top level of
//! their JSON form) and implement [`Entity`], which is the capability set the
//! repository contract is generic over.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity and timestamp bookkeeping shared by all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    /// Opaque identifier. Empty until the entity is first saved, unless the
    /// caller assigns one.
    #[serde(default)]
    pub id: String,

    /// When the entity was first saved. Never changes after that.
    #[serde(with = "timestamp")]
    pub created_date: DateTime<Utc>,

    /// When the entity was last saved.
    #[serde(default, with = "timestamp::option")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl EntityMeta {
    /// Creates unsaved metadata with no id.
    pub fn new() -> Self {
        Self {
            id: String::new(),
            created_date: Utc::now(),
            updated_date: None,
        }
    }

    /// Creates metadata with a caller-assigned id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A storable entity kind.
///
/// Implementors only expose their [`EntityMeta`]; the accessors are provided.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the entity kind. Document backends use it as the default
    /// container name.
    const KIND: &'static str;

    /// Returns the shared metadata.
    fn meta(&self) -> &EntityMeta;

    /// Returns the shared metadata mutably.
    fn meta_mut(&mut self) -> &mut EntityMeta;

    /// Returns the entity id (empty if unassigned).
    fn id(&self) -> &str {
        &self.meta().id
    }

    /// Returns true if the entity carries a non-blank id.
    fn has_id(&self) -> bool {
        !self.meta().id.trim().is_empty()
    }

    /// Assigns the entity id.
    fn set_id(&mut self, id: String) {
        self.meta_mut().id = id;
    }

    /// Returns the creation timestamp.
    fn created_date(&self) -> DateTime<Utc> {
        self.meta().created_date
    }

    /// Sets the creation timestamp.
    fn set_created_date(&mut self, at: DateTime<Utc>) {
        self.meta_mut().created_date = at;
    }

    /// Returns the last-save timestamp.
    fn updated_date(&self) -> Option<DateTime<Utc>> {
        self.meta().updated_date
    }

    /// Sets the last-save timestamp.
    fn set_updated_date(&mut self, at: DateTime<Utc>) {
        self.meta_mut().updated_date = Some(at);
    }
}

/// Generates a new entity id: 128 random bits as 32 lowercase hex characters.
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fixed-width RFC 3339 timestamps.
///
/// Nine fractional digits are always written so the lexical order of the
/// serialized form matches chronological order. Any RFC 3339 timestamp is
/// accepted on input.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Formats a timestamp in the fixed-width form.
    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    /// Serializes in the fixed-width form.
    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    /// Deserializes any RFC 3339 timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    /// The same format for optional timestamps.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serializes `None` as null.
        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => serializer.serialize_str(&super::format(at)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes null as `None`.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
