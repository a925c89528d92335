//! The favourite switch on a release's page.

use waxlog_types::Id;

pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized. Please log in again.";

/// What the user and the backend agree on about one (user, release) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FavouriteState {
    /// Not looked up yet, e.g. nobody is logged in.
    #[default]
    Unknown,
    NotFavourited,
    Favourited,
}

/// The request a toggle needs the backend to carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavouriteAction {
    /// `POST /user/:id/favourites/:releaseId`
    Add,
    /// `DELETE /user/:id/favourites/:releaseId`
    Remove,
}

/// Why the backend refused a toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FavouriteFailure {
    Unauthorized,
    Failed(String),
}

impl FavouriteFailure {
    #[must_use]
    #[inline]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
            Self::Failed(reason) => format!("Failed to update favourite status: {reason}"),
        }
    }
}

/// Why a toggle wasn't started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ToggleRefused {
    #[error("Favourite status is not known yet.")]
    Unknown,
    #[error("A favourite update is already in progress.")]
    InFlight,
}

/// Favourite state for one release, reconciled against the backend.
///
/// A toggle is a two-step affair: [`Self::begin`] says which request to send, and
/// [`Self::complete`] records how it went. Only a successful request flips the state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavouriteToggle {
    state: FavouriteState,
    in_flight: bool,
    error: Option<String>,
}

impl FavouriteToggle {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle the state from the user's favourites.
    #[inline]
    pub fn resolve<'a, I>(&mut self, release: &Id, favourites: I)
    where
        I: IntoIterator<Item = &'a Id>,
    {
        self.state = if favourites.into_iter().any(|id| id == release) {
            FavouriteState::Favourited
        } else {
            FavouriteState::NotFavourited
        };
    }

    #[must_use]
    #[inline]
    pub const fn state(&self) -> FavouriteState {
        self.state
    }

    #[must_use]
    #[inline]
    pub const fn is_favourited(&self) -> Option<bool> {
        match self.state {
            FavouriteState::Unknown => None,
            FavouriteState::NotFavourited => Some(false),
            FavouriteState::Favourited => Some(true),
        }
    }

    /// The message from the last failed toggle, cleared when the next one starts.
    #[must_use]
    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a toggle.
    ///
    /// # Errors
    ///
    /// Refused while the state is unknown, or while another toggle is waiting on the backend.
    #[inline]
    pub fn begin(&mut self) -> Result<FavouriteAction, ToggleRefused> {
        if self.in_flight {
            return Err(ToggleRefused::InFlight);
        }
        let action = match self.state {
            FavouriteState::Unknown => return Err(ToggleRefused::Unknown),
            FavouriteState::NotFavourited => FavouriteAction::Add,
            FavouriteState::Favourited => FavouriteAction::Remove,
        };
        self.in_flight = true;
        self.error = None;
        Ok(action)
    }

    /// Record the backend's answer to the toggle started by [`Self::begin`].
    #[inline]
    pub fn complete(&mut self, action: FavouriteAction, outcome: Result<(), FavouriteFailure>) {
        self.in_flight = false;
        match outcome {
            Ok(()) => {
                self.state = match action {
                    FavouriteAction::Add => FavouriteState::Favourited,
                    FavouriteAction::Remove => FavouriteState::NotFavourited,
                };
            }
            Err(failure) => {
                log::warn!("favourite toggle failed: {failure:?}");
                self.error = Some(failure.message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn known(favourited: bool) -> FavouriteToggle {
        let mut toggle = FavouriteToggle::new();
        let release = Id::from("r1");
        let favourites = if favourited {
            vec![Id::from("r0"), Id::from("r1")]
        } else {
            vec![Id::from("r0")]
        };
        toggle.resolve(&release, &favourites);
        toggle
    }

    #[test]
    fn test_resolve() {
        assert_eq!(FavouriteToggle::new().state(), FavouriteState::Unknown);
        assert_eq!(known(true).is_favourited(), Some(true));
        assert_eq!(known(false).is_favourited(), Some(false));
    }

    #[test]
    fn test_toggle_while_unknown_is_refused() {
        let mut toggle = FavouriteToggle::new();
        assert_eq!(toggle.begin(), Err(ToggleRefused::Unknown));
    }

    #[test]
    fn test_second_toggle_while_in_flight_is_refused() {
        let mut toggle = known(false);
        let action = toggle.begin().unwrap();
        assert_eq!(toggle.begin(), Err(ToggleRefused::InFlight));
        toggle.complete(action, Ok(()));
        assert_eq!(toggle.begin(), Ok(FavouriteAction::Remove));
    }

    #[rstest]
    #[case::add(false, FavouriteAction::Add, FavouriteState::Favourited)]
    #[case::remove(true, FavouriteAction::Remove, FavouriteState::NotFavourited)]
    fn test_successful_toggle_flips(
        #[case] favourited: bool,
        #[case] expected_action: FavouriteAction,
        #[case] expected_state: FavouriteState,
    ) {
        let mut toggle = known(favourited);
        let action = toggle.begin().unwrap();
        assert_eq!(action, expected_action);
        toggle.complete(action, Ok(()));
        assert_eq!(toggle.state(), expected_state);
        assert_eq!(toggle.error(), None);
    }

    #[rstest]
    #[case::unauthorized(FavouriteFailure::Unauthorized, "You are not authorized. Please log in again.")]
    #[case::other(
        FavouriteFailure::Failed("Release not found".into()),
        "Failed to update favourite status: Release not found"
    )]
    fn test_failed_toggle_keeps_state(#[case] failure: FavouriteFailure, #[case] message: &str) {
        let mut toggle = known(false);
        let action = toggle.begin().unwrap();
        toggle.complete(action, Err(failure));
        assert_eq!(toggle.state(), FavouriteState::NotFavourited);
        assert_eq!(toggle.error(), Some(message));

        // the next attempt starts clean
        assert_eq!(toggle.begin(), Ok(FavouriteAction::Add));
        assert_eq!(toggle.error(), None);
    }

    #[test]
    fn test_repeated_successful_adds_converge() {
        let mut toggle = known(false);
        for _ in 0..3 {
            toggle.complete(FavouriteAction::Add, Ok(()));
            assert_eq!(toggle.state(), FavouriteState::Favourited);
        }
    }
}
