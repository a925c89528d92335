//! Records of the music catalog, as the backend sends and accepts them.
//!
//! Everything here is a cached copy of data owned by the backend. Records are created and
//! changed through the client, never persisted locally.

pub mod artist;
pub mod reference;
pub mod release;
pub mod review;
pub mod user;
pub mod validation;

pub use artist::{Artist, ArtistChangeSet, ArtistDraft, ArtistId};
pub use reference::{ArtistRef, Id, Record, Reference, UserRef};
pub use release::{ArtistChoice, Release, ReleaseChangeSet, ReleaseDraft, ReleaseId, ReleaseType};
pub use review::{Review, ReviewDraft, ReviewId, Stars};
pub use user::{Credentials, PasswordReset, ProfileUser, SignupForm, Token, User, UserId};
pub use validation::FieldErrors;

/// Name shown for a release whose artist could not be resolved.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
