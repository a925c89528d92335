#![allow(clippy::module_name_repetitions)]
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    reference::{Id, Record, UserRef},
    validation::FieldErrors,
};

pub type ReviewId = Id;

/// Star rating, always within `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    #[must_use]
    pub const fn new(stars: u8) -> Option<Self> {
        if stars >= Self::MIN && stars <= Self::MAX {
            Some(Self(stars))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("star rating must be between 1 and 5, got {value}"))
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in Self::MIN..=Self::MAX {
            f.write_str(if i <= self.0 { "★" } else { "☆" })?;
        }
        Ok(())
    }
}

/// A user's review of a [`crate::Release`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub stars: Stars,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourite_track: Option<String>,
    /// the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

impl Record for Review {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Review {
    #[must_use]
    pub fn is_authored_by(&self, user: &Id) -> bool {
        self.user.as_ref().is_some_and(|author| author.id() == user)
    }
}

/// Form data for creating or editing a [`Review`].
///
/// `stars` is 0 until the user picks a rating.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub stars: u8,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub favourite_track: String,
}

impl ReviewDraft {
    /// Set the rating as if star `n` was clicked. Clicks outside `1..=5` are ignored.
    pub fn click_star(&mut self, n: u8) {
        if Stars::new(n).is_some() {
            self.stars = n;
        }
    }

    /// Clear the form after a successful submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// # Errors
    ///
    /// Fails if no valid rating is set or the text is blank.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if Stars::new(self.stars).is_none() {
            errors.insert("stars", "Please select a rating between 1 and 5");
        }
        errors.require("text", &self.text, "Review text is required");
        errors.into_result()
    }
}

impl From<&Review> for ReviewDraft {
    fn from(review: &Review) -> Self {
        Self {
            stars: review.stars.get(),
            text: review.text.clone(),
            favourite_track: review.favourite_track.clone().unwrap_or_default(),
        }
    }
}
