//! State held by a view between user actions.

pub mod edit;
pub mod favourite;
pub mod profile;

pub use edit::{EditState, ReviewEditor};
pub use favourite::{
    FavouriteAction, FavouriteFailure, FavouriteState, FavouriteToggle, ToggleRefused,
};
pub use profile::{ProfileTab, ProfileView};

/// Where a view is in loading its data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    /// Holds the message to show instead of the data.
    Failed(String),
    Loaded(T),
}

impl<T> LoadState<T> {
    /// Settle a fetch, keeping the error's message.
    #[inline]
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    #[inline]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    #[inline]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Failed(message) => LoadState::Failed(message),
            Self::Loaded(value) => LoadState::Loaded(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_state() {
        let state: LoadState<u32> = LoadState::default();
        assert!(state.is_loading());
        assert_eq!(state.loaded(), None);

        let mut state = LoadState::<u32>::from_result(Ok::<_, String>(3));
        assert_eq!(state.loaded(), Some(&3));
        *state.loaded_mut().unwrap() += 1;
        assert_eq!(state.clone().map(|n| n * 2), LoadState::Loaded(8));

        let state = LoadState::<u32>::from_result(Err("Failed to fetch artists."));
        assert_eq!(state.error(), Some("Failed to fetch artists."));
        assert_eq!(state.map(|n| n + 1).error(), Some("Failed to fetch artists."));
    }
}
