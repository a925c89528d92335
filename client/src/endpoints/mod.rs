//! One module per resource of the API, each adding methods to [`crate::CatalogClient`].

pub mod artists;
pub mod auth;
pub mod releases;
pub mod reviews;
pub mod users;
