#![allow(clippy::module_name_repetitions)]
use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    reference::{Id, Record, Reference},
    release::Release,
    validation::FieldErrors,
};

pub type UserId = Id;

/// An account on the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: Arc<str>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<Reference<Release>>>,
    #[serde(
        default,
        alias = "favorites",
        skip_serializing_if = "Option::is_none"
    )]
    pub favourites: Option<Vec<Reference<Release>>>,
}

impl Record for User {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// The public part of a [`User`], as shown on their profile page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Bearer token handed out by the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// keep tokens out of logs
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

/// Login form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns the message for every blank field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");
        errors.into_result()
    }
}

/// Sign-up form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the message for every blank field, and for a confirmation that does not match.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Username is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");
        errors.require(
            "confirmPassword",
            &self.confirm_password,
            "Please confirm your password",
        );
        if errors.get("confirmPassword").is_none() && self.password != self.confirm_password {
            errors.insert("confirmPassword", PASSWORD_MISMATCH);
        }
        errors.into_result()
    }
}

const PASSWORD_MISMATCH: &str = "Passwords don't match";

/// New password, sent along with the token from a reset email.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub password: String,
    pub confirm_password: String,
}

impl PasswordReset {
    /// # Errors
    ///
    /// Fails if the password is blank or the confirmation does not match.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("password", &self.password, "Password is required");
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", PASSWORD_MISMATCH);
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_deserialize_user() {
        let json = r#"{
            "_id": "u1",
            "username": "kode9",
            "email": "k@hyperdub.net",
            "createdAt": "2024-02-01T10:00:00.000Z",
            "updatedAt": "2024-02-02T10:00:00.000Z",
            "__v": 0,
            "favorites": ["r1"]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id(), &Id::from("u1"));
        assert_eq!(user.created_at.as_deref(), Some("2024-02-01T10:00:00.000Z"));
        assert_eq!(user.uploads, None);
        assert_eq!(
            user.favourites,
            Some(vec![Reference::Unresolved(Id::from("r1"))])
        );
    }

    #[test]
    fn test_token_is_not_logged() {
        let token = Token::new("secret");
        assert_eq!(format!("{token:?}"), "Token(..)");
        assert_eq!(token.as_str(), "secret");
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""secret""#);
    }

    #[rstest]
    #[case::ok("hunter2", "hunter2", &[])]
    #[case::mismatch("hunter2", "hunter3", &["confirmPassword"])]
    #[case::blank_confirmation("hunter2", "", &["confirmPassword"])]
    fn test_signup_validation(
        #[case] password: &str,
        #[case] confirm: &str,
        #[case] failed: &[&str],
    ) {
        let form = SignupForm {
            username: "kode9".into(),
            email: "k@hyperdub.net".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        };
        let errors = form.validate().err().unwrap_or_default();
        assert_eq!(errors.iter().map(|(f, _)| f).collect::<Vec<_>>(), failed);
    }

    #[test]
    fn test_signup_serializes_camel_case() {
        let form = SignupForm {
            username: "a".into(),
            email: "b".into(),
            password: "c".into(),
            confirm_password: "c".into(),
        };
        assert_eq!(
            serde_json::to_string(&form).unwrap(),
            r#"{"username":"a","email":"b","password":"c","confirmPassword":"c"}"#
        );
    }

    #[test]
    fn test_password_reset_mismatch() {
        let reset = PasswordReset {
            password: "one".into(),
            confirm_password: "two".into(),
        };
        let errors = reset.validate().unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some("Passwords don't match"));

        let reset = PasswordReset {
            password: "one".into(),
            confirm_password: "one".into(),
        };
        assert!(reset.validate().is_ok());
    }
}
