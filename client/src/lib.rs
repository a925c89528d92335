//! A typed client for the catalog backend's REST API.
//!
//! [`CatalogClient`] owns the HTTP connection pool and the [`Session`]. Every endpoint is an
//! `async` method returning the records from `waxlog-types`; failures are mapped to [`ApiError`]
//! before they reach the caller, and a 401 from any endpoint logs the session out.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;
use waxlog_core::config::ClientSettings;

pub mod errors;
mod endpoints;
pub mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use endpoints::{artists::NameCheck, auth::Message, users::Profile};
pub use errors::ApiError;
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};

use errors::ErrorBody;

/// Client for one backend, and the session logged in to it.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl CatalogClient {
    /// # Errors
    ///
    /// Fails if `api_base` isn't an absolute http(s) URL, or if the HTTP client can't be built.
    #[inline]
    pub fn new(api_base: &str, timeout: Duration, session: Session) -> Result<Self, ApiError> {
        let base = Url::parse(api_base)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BadBase(base));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("waxlog/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    /// Build a client from the `[client]` section of the settings, restoring the session from
    /// the configured token file.
    ///
    /// # Errors
    ///
    /// See [`Self::new`]. Also fails if the token file can't be located or read.
    #[inline]
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ApiError> {
        let token_path = settings
            .token_path()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;
        let session = Session::load(FileTokenStore::new(token_path))?;
        Self::new(
            &settings.api_base,
            Duration::from_secs(settings.timeout_secs),
            session,
        )
    }

    #[must_use]
    #[inline]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    #[inline]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// The URL of an endpoint below the API base. Each segment is percent-encoded.
    fn url<I, S>(&self, segments: I) -> Result<Url, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::BadBase(self.base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// A request carrying the session's bearer token.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotLoggedIn`] if there's no session, in which case nothing should be sent.
    async fn authed(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().await.ok_or_else(|| {
            tracing::debug!(%method, path = url.path(), "not logged in, request not sent");
            ApiError::NotLoggedIn
        })?;
        Ok(self.request(method, url).bearer_auth(token.as_str()))
    }

    /// Send a request, turning any non-success status into an [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = request.build()?;
        tracing::debug!(method = %request.method(), path = request.url().path(), "sending request");
        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = response.url().path(), "backend answered 401, logging out");
            self.session.clear().await?;
            return Err(ApiError::Unauthorized);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        tracing::debug!(%status, ?body, "request failed");
        Err(body.into_error(status))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json().await?)
    }
}

/// `{"token": "..."}`
#[derive(Deserialize)]
struct TokenBody {
    token: waxlog_types::Token,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn client(base: &str) -> Result<CatalogClient, ApiError> {
        CatalogClient::new(
            base,
            Duration::from_secs(1),
            Session::load(MemoryTokenStore::new()).unwrap(),
        )
    }

    #[rstest]
    #[case("http://localhost:8000/api", &["artists"], "http://localhost:8000/api/artists")]
    #[case("http://localhost:8000/api/", &["artists", "a1"], "http://localhost:8000/api/artists/a1")]
    #[case("http://localhost:8000", &["releases"], "http://localhost:8000/releases")]
    #[case(
        "http://localhost:8000/api",
        &["artists", "check-name", "Sunn O)))/Boris"],
        "http://localhost:8000/api/artists/check-name/Sunn%20O)))%2FBoris"
    )]
    fn test_endpoint_urls(#[case] base: &str, #[case] segments: &[&str], #[case] expected: &str) {
        let client = client(base).unwrap();
        assert_eq!(client.url(segments).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn test_bad_base(#[case] base: &str) {
        assert!(client(base).is_err());
    }

    #[tokio::test]
    async fn test_authed_request_without_session() {
        let client = client("http://localhost:8000/api").unwrap();
        let url = client.url(["user"]).unwrap();
        assert!(matches!(
            client.authed(Method::GET, url).await,
            Err(ApiError::NotLoggedIn)
        ));
    }
}
