#![allow(clippy::module_name_repetitions)]
use std::sync::Arc;

use one_or_many::OneOrMany;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    UNKNOWN_ARTIST,
    artist::ArtistId,
    reference::{ArtistRef, Id, Record, UserRef},
    review::{Review, ReviewId},
    validation::FieldErrors,
};

pub type ReleaseId = Id;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ReleaseType {
    Single,
    #[default]
    Album,
    #[serde(rename = "EP")]
    #[strum(serialize = "EP")]
    Ep,
    Mixtape,
}

/// This struct holds all the metadata about a particular [`Release`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// the unique identifier for this [`Release`].
    #[serde(rename = "_id")]
    pub id: ReleaseId,

    /// Title of the [`Release`].
    pub title: Arc<str>,

    /// Year of release.
    pub year: i32,

    #[serde(default)]
    pub genre: Arc<str>,

    #[serde(default)]
    pub release_type: ReleaseType,

    /// URL of the cover art.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub track_list: Vec<String>,

    /// the user who uploaded this [`Release`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,

    pub artist: ArtistRef,

    /// The backend sends `null`, a single review, or a list.
    #[serde(default)]
    pub reviews: OneOrMany<Review>,
}

impl Record for Release {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Release {
    /// The artist's name, or [`UNKNOWN_ARTIST`] if the reference was never resolved.
    #[must_use]
    pub fn artist_name(&self) -> &str {
        self.artist
            .resolved()
            .map_or(UNKNOWN_ARTIST, |artist| artist.name.as_ref())
    }

    /// Whether `user` uploaded this release, and may therefore edit or delete it.
    #[must_use]
    pub fn is_owned_by(&self, user: &Id) -> bool {
        self.user.as_ref().is_some_and(|owner| owner.id() == user)
    }

    /// Fold the server's reply to an update into the record we already hold.
    ///
    /// The update endpoint does not populate the uploader, so it's kept from `self`.
    #[must_use]
    pub fn merge_update(self, updated: Self) -> Self {
        Self {
            user: self.user,
            ..updated
        }
    }

    /// Attach a freshly created review.
    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    /// Swap in the server's copy of an edited review.
    ///
    /// Returns `false` if no review with that id is attached.
    pub fn replace_review(&mut self, review: Review) -> bool {
        let id = review.id.clone();
        self.reviews.replace_first(|r| r.id == id, review).is_ok()
    }

    /// Returns `false` if no review with that id was attached.
    pub fn remove_review(&mut self, id: &ReviewId) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| &r.id != id);
        self.reviews.len() != before
    }

    #[must_use]
    pub fn find_review(&self, id: &ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.id == id)
    }

    /// Mean star rating, if there are any reviews.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_stars(&self) -> Option<f32> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.stars.get())).sum();
        Some(total as f32 / self.reviews.len() as f32)
    }
}

/// Which artist a new release is credited to.
///
/// The backend accepts either an existing artist's id, or the name of an artist to create
/// alongside the release, in the same `artist` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtistChoice {
    Existing(ArtistId),
    New(String),
}

impl ArtistChoice {
    fn as_str(&self) -> &str {
        match self {
            Self::Existing(id) => id.as_str(),
            Self::New(name) => name,
        }
    }
}

impl Serialize for ArtistChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Form data for a new [`Release`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub artist: Option<ArtistChoice>,
    pub year: Option<i32>,
    pub genre: String,
    pub track_list: Vec<String>,
    pub release_type: ReleaseType,
}

impl ReleaseDraft {
    /// Fill the track list from the multi-line text of the form.
    pub fn set_track_list(&mut self, text: &str) {
        self.track_list = parse_track_list(text);
    }

    /// # Errors
    ///
    /// Returns the message for every missing required field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        match &self.artist {
            None => errors.insert("artist", "Artist is required"),
            Some(choice) => errors.require("artist", choice.as_str(), "Artist is required"),
        }
        if self.year.is_none() {
            errors.insert("year", "Year is required");
        }
        errors.require("genre", &self.genre, "Genre is required");
        errors.into_result()
    }
}

/// Partial update of a [`Release`]; unset fields are left alone by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<ArtistId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<ReleaseType>,
}

impl ReleaseChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Split the multi-line track list text of a form into track titles.
///
/// Lines are trimmed and blank lines dropped.
#[must_use]
pub fn parse_track_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Render a track list for display, numbering every track that isn't numbered already.
///
/// The number is the track's position in the list, counting from 1.
#[must_use]
pub fn format_track_list<S: AsRef<str>>(tracks: &[S]) -> String {
    tracks
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, track)| {
            if is_numbered(track) {
                track.to_string()
            } else {
                format!("{}. {track}", i + 1)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"3. Foo"` or `"3 Foo"`: digits, an optional dot, then whitespace.
fn is_numbered(track: &str) -> bool {
    let rest = track.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == track.len() {
        return false;
    }
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.starts_with(char::is_whitespace)
}
