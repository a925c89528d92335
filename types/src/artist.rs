#![allow(clippy::module_name_repetitions)]
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    reference::{Id, Record, UserRef},
    release::Release,
    validation::FieldErrors,
};

pub type ArtistId = Id;

/// This struct holds all the metadata about a particular [`Artist`].
/// An [`Artist`] is credited on any number of [`Release`]s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// the unique identifier for this [`Artist`].
    #[serde(rename = "_id")]
    pub id: ArtistId,

    /// The [`Artist`]'s name.
    pub name: Arc<str>,

    #[serde(default)]
    pub genre: Arc<str>,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub formed_year: Option<i32>,

    #[serde(default)]
    pub biography: String,

    /// URL of a picture of the [`Artist`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// the user who added this [`Artist`] to the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,

    /// Only populated by the single-artist endpoint.
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl Record for Artist {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Artist {
    /// Whether `user` uploaded this artist, and may therefore edit or delete it.
    #[must_use]
    pub fn is_owned_by(&self, user: &Id) -> bool {
        self.user.as_ref().is_some_and(|owner| owner.id() == user)
    }

    /// Fold the server's reply to an update into the record we already hold.
    ///
    /// The update endpoint does not populate relations, so the owner and the release list
    /// are kept from `self`.
    #[must_use]
    pub fn merge_update(self, updated: Self) -> Self {
        Self {
            user: self.user,
            releases: self.releases,
            ..updated
        }
    }
}

/// Form data for a new [`Artist`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDraft {
    pub name: String,
    pub genre: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formed_year: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub biography: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ArtistDraft {
    /// Check the required fields before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns the message for every blank required field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Artist name is required");
        errors.require("genre", &self.genre, "Genre is required");
        errors.into_result()
    }
}

/// Partial update of an [`Artist`]; unset fields are left alone by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formed_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ArtistChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
