//! Identifiers and references between records.
//!
//! The backend sometimes populates a relation (sends the whole document) and sometimes only
//! sends its id, depending on the endpoint. [`Reference`] makes both shapes explicit so that
//! resolution happens once, before anything is displayed.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{artist::Artist, user::User};

/// Opaque document id assigned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(Arc<str>);

impl Id {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything stored by the backend under an [`Id`].
pub trait Record {
    fn id(&self) -> &Id;
}

/// A relation that is either just an id, or the populated document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Unresolved(Id),
    Resolved(Box<T>),
}

pub type ArtistRef = Reference<Artist>;
pub type UserRef = Reference<User>;

impl<T: Record> Reference<T> {
    /// The id of the referenced record, whichever shape it arrived in.
    #[must_use]
    pub fn id(&self) -> &Id {
        match self {
            Self::Unresolved(id) => id,
            Self::Resolved(record) => record.id(),
        }
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(record) => Some(record),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Replace a bare id with the matching record from `index`.
    ///
    /// Returns `true` if the reference is resolved afterwards.
    pub fn resolve(&mut self, index: &HashMap<Id, T>) -> bool
    where
        T: Clone,
    {
        if let Self::Unresolved(id) = self {
            match index.get(id) {
                Some(record) => *self = Self::Resolved(Box::new(record.clone())),
                None => return false,
            }
        }
        true
    }

    /// Reduce a populated reference to its id, which is what the backend expects on writes.
    #[must_use]
    pub fn to_unresolved(&self) -> Self {
        Self::Unresolved(self.id().clone())
    }
}

impl<T> From<Id> for Reference<T> {
    fn from(id: Id) -> Self {
        Self::Unresolved(id)
    }
}

/// Build an id-keyed index of records, e.g. for [`Reference::resolve`].
pub fn index_by_id<T, I>(records: I) -> HashMap<Id, T>
where
    T: Record,
    I: IntoIterator<Item = T>,
{
    records
        .into_iter()
        .map(|record| (record.id().clone(), record))
        .collect()
}
