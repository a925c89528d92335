use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use waxlog_types::{Credentials, PasswordReset, SignupForm, User};

use crate::{ApiError, CatalogClient, TokenBody};

/// `{"message": "..."}`, the reply of endpoints that only confirm an action.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message: String,
}

impl CatalogClient {
    /// `POST /signup`. The account can't log in until its email is confirmed.
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] if the form is incomplete, [`ApiError::Validation`] if the backend
    /// rejects it (e.g. the email is taken).
    #[tracing::instrument(skip_all, fields(username = %form.username))]
    pub async fn signup(&self, form: &SignupForm) -> Result<(), ApiError> {
        form.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["signup"])?;
        self.send(self.request(Method::POST, url).json(form)).await?;
        Ok(())
    }

    /// `POST /login`, then `GET /user`. The token is stored in the session.
    ///
    /// # Errors
    ///
    /// Fails if the credentials are blank or wrong, or the token can't be persisted.
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        credentials.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["login"])?;
        let TokenBody { token } = self
            .send_json(self.request(Method::POST, url).json(credentials))
            .await?;
        self.session.set(token).await?;
        self.current_user().await
    }

    /// Forget the session. Nothing is sent; the backend keeps no session state.
    ///
    /// # Errors
    ///
    /// Fails if the stored token can't be removed.
    #[inline]
    pub async fn logout(&self) -> Result<(), ApiError> {
        Ok(self.session.clear().await?)
    }

    /// `GET /user`: who the session belongs to.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotLoggedIn`] without a session.
    #[tracing::instrument(skip_all)]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.url(["user"])?;
        self.send_json(self.authed(Method::GET, url).await?).await
    }

    /// `GET /confirm-email/:token`
    ///
    /// # Errors
    ///
    /// Fails if the backend doesn't accept the token.
    #[tracing::instrument(skip_all)]
    pub async fn confirm_email(&self, token: &str) -> Result<Message, ApiError> {
        let url = self.url(["confirm-email", token])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    /// `POST /forgot-password`: have a reset link emailed to `email`.
    ///
    /// # Errors
    ///
    /// Fails if `email` is blank, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<Message, ApiError> {
        let mut errors = waxlog_types::FieldErrors::new();
        errors.require("email", email, "Email is required");
        errors.into_result().map_err(ApiError::Invalid)?;

        let url = self.url(["forgot-password"])?;
        self.send_json(
            self.request(Method::POST, url)
                .json(&json!({ "email": email })),
        )
        .await
    }

    /// `PUT /reset-password/:token`
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] if the passwords don't match; nothing is sent in that case.
    #[tracing::instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        reset: &PasswordReset,
    ) -> Result<Message, ApiError> {
        reset.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["reset-password", token])?;
        self.send_json(self.request(Method::PUT, url).json(reset))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ApiError,
        test_utils::{CONFIRM_TOKEN, FakeBackend, FakeCatalog, PASSWORD, RESET_TOKEN},
    };
    use pretty_assertions::assert_eq;
    use waxlog_types::{Credentials, PasswordReset, SignupForm};

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_sets_session() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);

        let user = client
            .login(&credentials("kode9@hyperdub.net", PASSWORD))
            .await
            .unwrap();
        assert_eq!(user.username.as_ref(), "kode9");
        assert!(client.session().is_logged_in().await);

        client.logout().await.unwrap();
        assert!(!client.session().is_logged_in().await);
        assert!(matches!(
            client.current_user().await,
            Err(ApiError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);

        let result = client
            .login(&credentials("kode9@hyperdub.net", "wrong"))
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!client.session().is_logged_in().await);
    }

    #[tokio::test]
    async fn test_blank_login_is_not_sent() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);

        let error = client.login(&credentials("", "")).await.unwrap_err();
        let errors = error.field_errors().unwrap();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_signup() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);
        let mut form = SignupForm {
            username: "loraine".into(),
            email: "loraine@example.com".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        };

        client.signup(&form).await.unwrap();
        assert_eq!(backend.catalog().users.len(), 3);

        // the email is taken now
        let error = client.signup(&form).await.unwrap_err();
        assert_eq!(
            error.field_errors().and_then(|e| e.get("email")),
            Some("Email already in use")
        );

        form.confirm_password = "other".into();
        let error = client.signup(&form).await.unwrap_err();
        assert!(matches!(error, ApiError::Invalid(_)));
        assert_eq!(error.to_string(), "confirmPassword: Passwords don't match");
    }

    #[tokio::test]
    async fn test_email_and_password_flows() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(None);

        assert!(client.confirm_email(CONFIRM_TOKEN).await.is_ok());
        let error = client.confirm_email("bogus").await.unwrap_err();
        assert_eq!(error.to_string(), "Invalid or expired confirmation token");

        assert!(client.forgot_password("kode9@hyperdub.net").await.is_ok());
        assert!(matches!(
            client.forgot_password(" ").await,
            Err(ApiError::Invalid(_))
        ));

        let reset = PasswordReset {
            password: "new".into(),
            confirm_password: "new".into(),
        };
        let message = client.reset_password(RESET_TOKEN, &reset).await.unwrap();
        assert_eq!(message.message, "Password has been reset");

        let mismatched = PasswordReset {
            password: "new".into(),
            confirm_password: "old".into(),
        };
        let sent = backend.requests().len();
        assert!(client.reset_password(RESET_TOKEN, &mismatched).await.is_err());
        assert_eq!(backend.requests().len(), sent);
    }
}
