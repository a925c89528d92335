use reqwest::Method;
use waxlog_core::state::{
    FavouriteAction, FavouriteFailure, FavouriteToggle, ToggleRefused,
    profile::{resolve_artists, unresolved_artist_ids},
};
use waxlog_types::{ProfileUser, Release, ReleaseId, UserId};

use crate::{ApiError, CatalogClient};

/// Everything the profile page shows, with artists resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub user: ProfileUser,
    pub uploads: Vec<Release>,
    pub favourites: Vec<Release>,
}

impl CatalogClient {
    /// `GET /user/:id/profile`
    ///
    /// # Errors
    ///
    /// [`ApiError::NotLoggedIn`] without a session.
    #[tracing::instrument(skip(self))]
    pub async fn profile_user(&self, user: &UserId) -> Result<ProfileUser, ApiError> {
        let url = self.url(["user", user.as_str(), "profile"])?;
        self.send_json(self.authed(Method::GET, url).await?).await
    }

    /// `GET /user/:id/uploads`
    ///
    /// # Errors
    ///
    /// [`ApiError::NotLoggedIn`] without a session.
    #[tracing::instrument(skip(self))]
    pub async fn uploads(&self, user: &UserId) -> Result<Vec<Release>, ApiError> {
        let url = self.url(["user", user.as_str(), "uploads"])?;
        self.send_json(self.authed(Method::GET, url).await?).await
    }

    /// `GET /user/:id/favourites`
    ///
    /// # Errors
    ///
    /// [`ApiError::NotLoggedIn`] without a session.
    #[tracing::instrument(skip(self))]
    pub async fn favourites(&self, user: &UserId) -> Result<Vec<Release>, ApiError> {
        let url = self.url(["user", user.as_str(), "favourites"])?;
        self.send_json(self.authed(Method::GET, url).await?).await
    }

    /// `POST /user/:id/favourites/:releaseId`
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn add_favourite(&self, user: &UserId, release: &ReleaseId) -> Result<(), ApiError> {
        let url = self.url(["user", user.as_str(), "favourites", release.as_str()])?;
        self.send(self.authed(Method::POST, url).await?).await?;
        Ok(())
    }

    /// `DELETE /user/:id/favourites/:releaseId`
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn remove_favourite(
        &self,
        user: &UserId,
        release: &ReleaseId,
    ) -> Result<(), ApiError> {
        let url = self.url(["user", user.as_str(), "favourites", release.as_str()])?;
        self.send(self.authed(Method::DELETE, url).await?).await?;
        Ok(())
    }

    /// Whether `user` has favourited `release`, as a toggle ready to be flipped.
    ///
    /// # Errors
    ///
    /// Fails if the favourites can't be fetched.
    #[inline]
    pub async fn favourite_toggle(
        &self,
        user: &UserId,
        release: &ReleaseId,
    ) -> Result<FavouriteToggle, ApiError> {
        let favourites = self.favourites(user).await?;
        let mut toggle = FavouriteToggle::new();
        toggle.resolve(release, favourites.iter().map(|r| &r.id));
        Ok(toggle)
    }

    /// Flip `toggle` by sending the request it asks for.
    ///
    /// A failed request leaves the state as it was and sets the toggle's error message.
    ///
    /// # Errors
    ///
    /// Refused, with nothing sent, while the state is unknown or another toggle is in flight.
    #[tracing::instrument(skip(self, toggle))]
    pub async fn toggle_favourite(
        &self,
        toggle: &mut FavouriteToggle,
        user: &UserId,
        release: &ReleaseId,
    ) -> Result<FavouriteAction, ToggleRefused> {
        let action = toggle.begin()?;
        let outcome = match action {
            FavouriteAction::Add => self.add_favourite(user, release).await,
            FavouriteAction::Remove => self.remove_favourite(user, release).await,
        };
        toggle.complete(action, outcome.map_err(FavouriteFailure::from));
        Ok(action)
    }

    /// The profile page of `user`: their details, uploads and favourites, fetched together,
    /// then the artists those releases refer to.
    ///
    /// # Errors
    ///
    /// Fails if any of the requests fails; nothing partial is returned.
    #[tracing::instrument(skip(self))]
    pub async fn profile(&self, user: &UserId) -> Result<Profile, ApiError> {
        let (profile, mut uploads, mut favourites) = tokio::try_join!(
            self.profile_user(user),
            self.uploads(user),
            self.favourites(user)
        )?;

        let ids = unresolved_artist_ids(uploads.iter().chain(&favourites));
        if !ids.is_empty() {
            let artists = self.artists_by_ids(&ids).await?;
            resolve_artists(&mut uploads, artists.iter().cloned());
            resolve_artists(&mut favourites, artists);
        }

        Ok(Profile {
            user: profile,
            uploads,
            favourites,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ApiError,
        test_utils::{FakeBackend, FakeCatalog},
    };
    use pretty_assertions::assert_eq;
    use waxlog_core::state::{FavouriteAction, FavouriteState, ToggleRefused};
    use waxlog_types::Id;

    #[tokio::test]
    async fn test_profile_resolves_artists() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u1"));

        let profile = client.profile(&Id::from("u1")).await.unwrap();
        assert_eq!(profile.user.username.as_ref(), "kode9");
        assert_eq!(
            profile.uploads.iter().map(|r| r.artist_name()).collect::<Vec<_>>(),
            vec!["Burial", "Burial"]
        );
        assert_eq!(profile.favourites.len(), 1);
        assert_eq!(profile.favourites[0].artist_name(), "Actress");

        // one lookup for both artists, after the three concurrent fetches
        let requests = backend.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3], "GET /api/artists");
    }

    #[tokio::test]
    async fn test_profile_without_session() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);

        assert!(matches!(
            client.profile(&Id::from("u1")).await,
            Err(ApiError::NotLoggedIn)
        ));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_profile_fails_as_a_whole() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u1"));

        let error = client.profile(&Id::from("u9")).await.unwrap_err();
        assert_eq!(error.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_toggle_favourite() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u1"));
        let (user, release) = (Id::from("u1"), Id::from("r1"));

        let mut toggle = client.favourite_toggle(&user, &release).await.unwrap();
        assert_eq!(toggle.state(), FavouriteState::NotFavourited);

        let action = client
            .toggle_favourite(&mut toggle, &user, &release)
            .await
            .unwrap();
        assert_eq!(action, FavouriteAction::Add);
        assert_eq!(toggle.state(), FavouriteState::Favourited);
        assert_eq!(
            client
                .favourite_toggle(&user, &release)
                .await
                .unwrap()
                .state(),
            FavouriteState::Favourited
        );

        let action = client
            .toggle_favourite(&mut toggle, &user, &release)
            .await
            .unwrap();
        assert_eq!(action, FavouriteAction::Remove);
        assert_eq!(toggle.state(), FavouriteState::NotFavourited);
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_state() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u1"));
        let user = Id::from("u1");

        let mut toggle = client
            .favourite_toggle(&user, &Id::from("gone"))
            .await
            .unwrap();
        client
            .toggle_favourite(&mut toggle, &user, &Id::from("gone"))
            .await
            .unwrap();
        assert_eq!(toggle.state(), FavouriteState::NotFavourited);
        assert_eq!(
            toggle.error(),
            Some("Failed to update favourite status: Release not found")
        );

        // a 401 tells the user to log in again
        backend.catalog().users[0].token = None;
        client
            .toggle_favourite(&mut toggle, &user, &Id::from("r1"))
            .await
            .unwrap();
        assert_eq!(
            toggle.error(),
            Some("You are not authorized. Please log in again.")
        );
        assert!(!client.session().is_logged_in().await);

        let mut unknown = waxlog_core::state::FavouriteToggle::new();
        assert_eq!(
            client.toggle_favourite(&mut unknown, &user, &Id::from("r1")).await,
            Err(ToggleRefused::Unknown)
        );
    }
}
