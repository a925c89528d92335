use reqwest::Method;
use serde::Deserialize;
use waxlog_types::{Artist, ArtistChangeSet, ArtistDraft, ArtistId, Id, Reference};

use crate::{ApiError, CatalogClient};

/// `{"exists": bool}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct NameCheck {
    pub exists: bool,
}

impl CatalogClient {
    /// `GET /artists`
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip_all)]
    pub async fn artists(&self) -> Result<Vec<Artist>, ApiError> {
        let url = self.url(["artists"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    /// `GET /artists?ids=a,b`. An empty `ids` sends nothing.
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip_all, fields(count = ids.len()))]
    pub async fn artists_by_ids(&self, ids: &[Id]) -> Result<Vec<Artist>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(Id::as_str).collect::<Vec<_>>().join(",");
        let url = self.url(["artists"])?;
        let request = match self.session.token().await {
            Some(token) => self.request(Method::GET, url).bearer_auth(token.as_str()),
            None => self.request(Method::GET, url),
        };
        self.send_json(request.query(&[("ids", joined)])).await
    }

    /// `GET /artists/:id`, with the artist's releases.
    ///
    /// The releases are credited to the artist itself, so they display its name.
    ///
    /// # Errors
    ///
    /// Fails if the artist doesn't exist, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn artist(&self, id: &ArtistId) -> Result<Artist, ApiError> {
        let url = self.url(["artists", id.as_str()])?;
        let mut artist: Artist = self.send_json(self.request(Method::GET, url)).await?;

        let credited = Artist {
            releases: Vec::new(),
            ..artist.clone()
        };
        for release in &mut artist.releases {
            if !release.artist.is_resolved() && release.artist.id() == &artist.id {
                release.artist = Reference::Resolved(Box::new(credited.clone()));
            }
        }
        Ok(artist)
    }

    /// `POST /artists`
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] if required fields are blank; nothing is sent in that case.
    #[tracing::instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_artist(&self, draft: &ArtistDraft) -> Result<Artist, ApiError> {
        draft.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["artists"])?;
        self.send_json(self.authed(Method::POST, url).await?.json(draft))
            .await
    }

    /// `PUT /artists/:id`. The reply is merged into `current`, keeping the relations it holds.
    ///
    /// # Errors
    ///
    /// Fails if the session doesn't own the artist, or the request fails.
    #[tracing::instrument(skip_all, fields(id = %current.id))]
    pub async fn update_artist(
        &self,
        current: Artist,
        changes: &ArtistChangeSet,
    ) -> Result<Artist, ApiError> {
        let url = self.url(["artists", current.id.as_str()])?;
        let updated: Artist = self
            .send_json(self.authed(Method::PUT, url).await?.json(changes))
            .await?;
        Ok(current.merge_update(updated))
    }

    /// `DELETE /artists/:id`
    ///
    /// # Errors
    ///
    /// Fails if the session doesn't own the artist, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_artist(&self, id: &ArtistId) -> Result<(), ApiError> {
        let url = self.url(["artists", id.as_str()])?;
        self.send(self.authed(Method::DELETE, url).await?).await?;
        Ok(())
    }

    /// `GET /artists/check-name/:name`: whether an artist of that name is already catalogued.
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn check_artist_name(&self, name: &str) -> Result<NameCheck, ApiError> {
        let url = self.url(["artists", "check-name", name.trim()])?;
        self.send_json(self.request(Method::GET, url)).await
    }
}
