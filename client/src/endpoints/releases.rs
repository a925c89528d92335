use reqwest::Method;
use waxlog_core::state::profile::resolve_artists;
use waxlog_types::{Artist, Reference, Release, ReleaseChangeSet, ReleaseDraft, ReleaseId};

use crate::{ApiError, CatalogClient};

impl CatalogClient {
    /// `GET /releases`, as sent: artists are usually bare ids.
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip_all)]
    pub async fn releases(&self) -> Result<Vec<Release>, ApiError> {
        let url = self.url(["releases"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    /// `GET /releases` and `GET /artists` together, with every release's artist filled in.
    ///
    /// # Errors
    ///
    /// Fails if either request fails.
    #[tracing::instrument(skip_all)]
    pub async fn releases_with_artists(&self) -> Result<Vec<Release>, ApiError> {
        let (mut releases, artists) = tokio::try_join!(self.releases(), self.artists())?;
        resolve_artists(&mut releases, artists);
        Ok(releases)
    }

    /// `GET /releases/:id`, then `GET /artists/:id` if the artist wasn't populated.
    ///
    /// An artist that can't be fetched is left unresolved, and displays as unknown.
    ///
    /// # Errors
    ///
    /// Fails if the release doesn't exist, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn release(&self, id: &ReleaseId) -> Result<Release, ApiError> {
        let url = self.url(["releases", id.as_str()])?;
        let mut release: Release = self.send_json(self.request(Method::GET, url)).await?;

        if !release.artist.is_resolved() {
            let url = self.url(["artists", release.artist.id().as_str()])?;
            match self.send_json::<Artist>(self.request(Method::GET, url)).await {
                Ok(artist) => release.artist = Reference::Resolved(Box::new(artist)),
                Err(e) => tracing::warn!(
                    artist = %release.artist.id(),
                    "failed to fetch the artist of release {id}: {e}"
                ),
            }
        }
        Ok(release)
    }

    /// `POST /releases`. Naming a new artist in the draft creates it alongside.
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] if required fields are missing; nothing is sent in that case.
    #[tracing::instrument(skip_all, fields(title = %draft.title))]
    pub async fn create_release(&self, draft: &ReleaseDraft) -> Result<Release, ApiError> {
        draft.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["releases"])?;
        self.send_json(self.authed(Method::POST, url).await?.json(draft))
            .await
    }

    /// `PUT /releases/:id`. The reply is merged into `current`, keeping its uploader.
    ///
    /// # Errors
    ///
    /// Fails if the session doesn't own the release, or the request fails.
    #[tracing::instrument(skip_all, fields(id = %current.id))]
    pub async fn update_release(
        &self,
        current: Release,
        changes: &ReleaseChangeSet,
    ) -> Result<Release, ApiError> {
        let url = self.url(["releases", current.id.as_str()])?;
        let mut updated: Release = self
            .send_json(self.authed(Method::PUT, url).await?.json(changes))
            .await?;
        // keep the populated artist unless the update credited someone else
        if !updated.artist.is_resolved() && updated.artist.id() == current.artist.id() {
            updated.artist = current.artist.clone();
        }
        Ok(current.merge_update(updated))
    }

    /// `DELETE /releases/:id`
    ///
    /// # Errors
    ///
    /// Fails if the session doesn't own the release, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_release(&self, id: &ReleaseId) -> Result<(), ApiError> {
        let url = self.url(["releases", id.as_str()])?;
        self.send(self.authed(Method::DELETE, url).await?).await?;
        Ok(())
    }
}
