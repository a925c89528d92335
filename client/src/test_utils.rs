//! An in-process fake of the catalog backend, serving the same routes over real HTTP.
//!
//! It keeps just enough state to behave like the backend does from the client's side of the
//! wire: bearer tokens, ownership checks, `{message}` and `{errors}` failure bodies, and
//! relations that are sent as bare ids.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use waxlog_types::{
    Artist, Id, ProfileUser, Reference, Release, ReleaseId, ReleaseType, Review, Stars, Token,
    User, UserId,
};

use crate::{CatalogClient, MemoryTokenStore, Session};

/// Token accepted by `GET /confirm-email/:token`.
pub const CONFIRM_TOKEN: &str = "confirm-me";
/// Token accepted by `PUT /reset-password/:token`.
pub const RESET_TOKEN: &str = "reset-me";
/// Password of every seeded user.
pub const PASSWORD: &str = "hunter22";

#[derive(Clone, Debug)]
pub struct FakeUser {
    pub user: User,
    pub password: String,
    pub token: Option<String>,
}

/// Everything the fake backend knows.
#[derive(Clone, Debug, Default)]
pub struct FakeCatalog {
    pub users: Vec<FakeUser>,
    pub artists: Vec<Artist>,
    /// Stored with bare artist ids, like the backend keeps them.
    pub releases: Vec<Release>,
    pub favourites: HashMap<UserId, Vec<ReleaseId>>,
    /// `"METHOD /path"` of every request received, in order.
    pub requests: Vec<String>,
    next_id: usize,
}

impl FakeCatalog {
    /// Two users, two artists, three releases.
    ///
    /// - `u1` (kode9) uploaded the artist `a1` (Burial) and the releases `r1` and `r2`, and
    ///   favourited `r3`.
    /// - `u2` (actress) uploaded the artist `a2` (Actress) and the release `r3`, which has a
    ///   review `v1` by `u1`.
    #[must_use]
    pub fn seeded() -> Self {
        let mut catalog = Self::default();
        let u1 = catalog.add_user("kode9", "kode9@hyperdub.net");
        let u2 = catalog.add_user("actress", "darren@werkdiscs.com");

        let a1 = catalog.add_artist("a1", "Burial", "Garage", &u1);
        let a2 = catalog.add_artist("a2", "Actress", "Techno", &u2);

        catalog.add_release("r1", "Untrue", &a1, 2007, "Garage", &u1);
        catalog.add_release("r2", "Burial", &a1, 2006, "Garage", &u1);
        let r3 = catalog.add_release("r3", "R.I.P", &a2, 2012, "Techno", &u2);

        if let Some(release) = catalog.release_mut(&r3) {
            release.push_review(Review {
                id: Id::from("v1"),
                stars: Stars::new(4).expect("valid rating"),
                text: "Cold and beautiful".into(),
                favourite_track: Some("Serpent".into()),
                user: Some(Reference::Unresolved(u1.clone())),
            });
        }
        catalog.favourites.insert(u1, vec![r3]);
        catalog
    }

    fn fresh_id(&mut self, prefix: &str) -> Id {
        self.next_id += 1;
        Id::from(format!("{prefix}{}", self.next_id + 100))
    }

    /// Add a confirmed user with [`PASSWORD`], returning their id (`u1`, `u2`, ...).
    pub fn add_user(&mut self, username: &str, email: &str) -> UserId {
        let id = Id::from(format!("u{}", self.users.len() + 1));
        self.users.push(FakeUser {
            user: User {
                id: id.clone(),
                username: username.into(),
                email: email.into(),
                created_at: Some("2024-01-01T00:00:00.000Z".into()),
                updated_at: None,
                uploads: None,
                favourites: None,
            },
            password: PASSWORD.into(),
            token: None,
        });
        id
    }

    pub fn add_artist(&mut self, id: &str, name: &str, genre: &str, owner: &UserId) -> Id {
        let id = Id::from(id);
        self.artists.push(Artist {
            id: id.clone(),
            name: name.into(),
            genre: genre.into(),
            country: String::new(),
            formed_year: None,
            biography: String::new(),
            image: None,
            user: Some(Reference::Unresolved(owner.clone())),
            releases: Vec::new(),
        });
        id
    }

    pub fn add_release(
        &mut self,
        id: &str,
        title: &str,
        artist: &Id,
        year: i32,
        genre: &str,
        owner: &UserId,
    ) -> ReleaseId {
        let id = Id::from(id);
        self.releases.push(Release {
            id: id.clone(),
            title: title.into(),
            year,
            genre: genre.into(),
            release_type: ReleaseType::Album,
            image: None,
            track_list: Vec::new(),
            user: Some(Reference::Unresolved(owner.clone())),
            artist: Reference::Unresolved(artist.clone()),
            reviews: Default::default(),
        });
        id
    }

    /// Issue a session token for `user`, as logging in would.
    pub fn log_in(&mut self, user: &UserId) -> Token {
        let token = format!("token-{user}");
        if let Some(fake) = self.users.iter_mut().find(|u| &u.user.id == user) {
            fake.token = Some(token.clone());
        }
        Token::new(token)
    }

    #[must_use]
    pub fn release(&self, id: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.id.as_str() == id)
    }

    fn release_mut(&mut self, id: &Id) -> Option<&mut Release> {
        self.releases.iter_mut().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn artist(&self, id: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id.as_str() == id)
    }

    fn caller(&self, headers: &HeaderMap) -> Result<UserId, Response> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| {
                self.users
                    .iter()
                    .find(|u| u.token.as_deref() == Some(token))
            })
            .map(|u| u.user.id.clone())
            .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// A running fake backend. The server stops when this is dropped.
#[derive(Debug)]
pub struct FakeBackend {
    state: Shared,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Serve `catalog` on a free local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(catalog: FakeCatalog) -> Self {
        let state: Shared = Arc::new(Mutex::new(catalog));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("fake backend stopped: {e}");
            }
        });
        Self {
            state,
            addr,
            server,
        }
    }

    #[must_use]
    pub fn api_base(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// The backend's state, to seed or inspect it.
    pub fn catalog(&self) -> MutexGuard<'_, FakeCatalog> {
        lock(&self.state)
    }

    /// A client for this backend, logged in as `user` if given.
    ///
    /// # Panics
    ///
    /// Panics if the client can't be built.
    pub fn client(&self, user: Option<&str>) -> CatalogClient {
        let store = match user {
            Some(user) => MemoryTokenStore::with_token(self.catalog().log_in(&Id::from(user))),
            None => MemoryTokenStore::new(),
        };
        CatalogClient::new(
            &self.api_base(),
            Duration::from_secs(5),
            Session::load(store).expect("memory store"),
        )
        .expect("client")
    }

    /// A client holding a token the backend doesn't (or no longer does) accept.
    ///
    /// # Panics
    ///
    /// Panics if the client can't be built.
    pub fn client_with_stale_token(&self) -> CatalogClient {
        CatalogClient::new(
            &self.api_base(),
            Duration::from_secs(5),
            Session::load(MemoryTokenStore::with_token(Token::new("expired")))
                .expect("memory store"),
        )
        .expect("client")
    }

    /// `"METHOD /path"` of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.catalog().requests.clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

type Shared = Arc<Mutex<FakeCatalog>>;
type Reply = Result<Response, Response>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeCatalog> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn field_error(field: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Validation failed", "errors": { field: message } })),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    message(StatusCode::NOT_FOUND, &format!("{what} not found"))
}

fn forbidden() -> Response {
    message(StatusCode::FORBIDDEN, "Unauthorized: you are not the owner")
}

fn ok<T: Serialize>(value: T) -> Reply {
    Ok(Json(value).into_response())
}

fn created<T: Serialize>(value: T) -> Reply {
    Ok((StatusCode::CREATED, Json(value)).into_response())
}

fn owned_by(owner: Option<&Reference<User>>, user: &UserId) -> bool {
    owner.is_some_and(|owner| owner.id() == user)
}

/// Apply a partial update the way the backend does: keys present in `changes` replace the
/// record's.
fn patch<T: Serialize + DeserializeOwned>(record: &T, changes: Value) -> Result<T, Response> {
    let bad_request = |e: serde_json::Error| message(StatusCode::BAD_REQUEST, &e.to_string());
    let mut value = serde_json::to_value(record).map_err(bad_request)?;
    if let (Value::Object(target), Value::Object(changes)) = (&mut value, changes) {
        target.extend(changes);
    }
    serde_json::from_value(value).map_err(bad_request)
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/user", get(current_user))
        .route("/confirm-email/:token", get(confirm_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", put(reset_password))
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/check-name/:name", get(check_name))
        .route(
            "/artists/:id",
            get(show_artist).put(update_artist).delete(delete_artist),
        )
        .route("/releases", get(list_releases).post(create_release))
        .route(
            "/releases/:id",
            get(show_release).put(update_release).delete(delete_release),
        )
        .route("/releases/:id/reviews", post(create_review))
        .route(
            "/releases/:id/reviews/:review_id",
            put(update_review).delete(delete_review),
        )
        .route("/user/:id/profile", get(profile))
        .route("/user/:id/uploads", get(uploads))
        .route("/user/:id/favourites", get(favourites))
        .route(
            "/user/:id/favourites/:release_id",
            post(add_favourite).delete(remove_favourite),
        );

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    lock(&state)
        .requests
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

// auth

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
}

async fn signup(State(state): State<Shared>, Json(body): Json<SignupBody>) -> Reply {
    let mut catalog = lock(&state);
    if body.password != body.confirm_password {
        return Err(field_error("confirmPassword", "Passwords don't match"));
    }
    if catalog.users.iter().any(|u| u.user.email == body.email) {
        return Err(field_error("email", "Email already in use"));
    }
    let id = catalog.add_user(&body.username, &body.email);
    if let Some(user) = catalog.users.iter_mut().find(|u| u.user.id == id) {
        user.password = body.password;
    }
    created(json!({ "message": "Signup successful. Please check your email to confirm your account." }))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Reply {
    let mut catalog = lock(&state);
    let id = catalog
        .users
        .iter()
        .find(|u| u.user.email == body.email && u.password == body.password)
        .map(|u| u.user.id.clone())
        .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
    let token = catalog.log_in(&id);
    ok(json!({ "token": token }))
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let catalog = lock(&state);
    let id = catalog.caller(&headers)?;
    let user = catalog
        .users
        .iter()
        .find(|u| u.user.id == id)
        .map(|u| u.user.clone())
        .ok_or_else(|| not_found("User"))?;
    ok(user)
}

async fn confirm_email(Path(token): Path<String>) -> Reply {
    if token == CONFIRM_TOKEN {
        ok(json!({ "message": "Email confirmed successfully. You can now log in." }))
    } else {
        Err(message(
            StatusCode::BAD_REQUEST,
            "Invalid or expired confirmation token",
        ))
    }
}

#[derive(Deserialize)]
struct ForgotBody {
    #[allow(dead_code)]
    email: String,
}

async fn forgot_password(Json(_body): Json<ForgotBody>) -> Reply {
    ok(json!({ "message": "If that email is registered, a reset link has been sent." }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetBody {
    password: String,
    confirm_password: String,
}

async fn reset_password(Path(token): Path<String>, Json(body): Json<ResetBody>) -> Reply {
    if token != RESET_TOKEN {
        return Err(message(
            StatusCode::BAD_REQUEST,
            "Password reset token is invalid or has expired",
        ));
    }
    if body.password != body.confirm_password {
        return Err(field_error("confirmPassword", "Passwords don't match"));
    }
    ok(json!({ "message": "Password has been reset" }))
}

// artists

async fn list_artists(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let catalog = lock(&state);
    let artists: Vec<&Artist> = match query.get("ids") {
        Some(ids) => {
            let ids: Vec<&str> = ids.split(',').collect();
            catalog
                .artists
                .iter()
                .filter(|a| ids.contains(&a.id.as_str()))
                .collect()
        }
        None => catalog.artists.iter().collect(),
    };
    ok(artists)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtistBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    country: String,
    formed_year: Option<i32>,
    #[serde(default)]
    biography: String,
    image: Option<String>,
}

async fn create_artist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ArtistBody>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    if body.name.trim().is_empty() {
        return Err(field_error("name", "Artist name is required"));
    }
    let id = catalog.fresh_id("a");
    let artist = Artist {
        id,
        name: body.name.into(),
        genre: body.genre.into(),
        country: body.country,
        formed_year: body.formed_year,
        biography: body.biography,
        image: body.image,
        user: Some(Reference::Unresolved(user)),
        releases: Vec::new(),
    };
    catalog.artists.push(artist.clone());
    created(artist)
}

async fn check_name(State(state): State<Shared>, Path(name): Path<String>) -> Reply {
    let catalog = lock(&state);
    let exists = catalog
        .artists
        .iter()
        .any(|a| a.name.eq_ignore_ascii_case(&name));
    ok(json!({ "exists": exists }))
}

async fn show_artist(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let catalog = lock(&state);
    let mut artist = catalog.artist(&id).cloned().ok_or_else(|| not_found("Artist"))?;
    artist.releases = catalog
        .releases
        .iter()
        .filter(|r| r.artist.id() == &artist.id)
        .cloned()
        .collect();
    ok(artist)
}

async fn update_artist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(changes): Json<Value>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let index = catalog
        .artists
        .iter()
        .position(|a| a.id.as_str() == id)
        .ok_or_else(|| not_found("Artist"))?;
    if !owned_by(catalog.artists[index].user.as_ref(), &user) {
        return Err(forbidden());
    }
    let updated: Artist = patch(&catalog.artists[index], changes)?;
    catalog.artists[index] = updated.clone();
    // relations are not populated in the reply
    ok(Artist {
        user: None,
        releases: Vec::new(),
        ..updated
    })
}

async fn delete_artist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let index = catalog
        .artists
        .iter()
        .position(|a| a.id.as_str() == id)
        .ok_or_else(|| not_found("Artist"))?;
    if !owned_by(catalog.artists[index].user.as_ref(), &user) {
        return Err(forbidden());
    }
    catalog.artists.remove(index);
    ok(json!({ "message": "Artist deleted" }))
}

// releases

async fn list_releases(State(state): State<Shared>) -> Reply {
    ok(lock(&state).releases.clone())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseBody {
    #[serde(default)]
    title: String,
    image: Option<String>,
    artist: Option<String>,
    year: Option<i32>,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    track_list: Vec<String>,
    #[serde(default)]
    release_type: ReleaseType,
}

async fn create_release(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ReleaseBody>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    if body.title.trim().is_empty() {
        return Err(field_error("title", "Title is required"));
    }
    let Some(year) = body.year else {
        return Err(field_error("year", "Year is required"));
    };
    let artist = match body.artist.filter(|a| !a.trim().is_empty()) {
        Some(existing) if catalog.artist(&existing).is_some() => Id::from(existing),
        // anything else names a new artist
        Some(name) => {
            let id = catalog.fresh_id("a");
            let genre = body.genre.clone();
            catalog.add_artist(id.as_str(), &name, &genre, &user)
        }
        None => return Err(field_error("artist", "Artist is required")),
    };
    let id = catalog.fresh_id("r");
    let release = Release {
        id,
        title: body.title.into(),
        year,
        genre: body.genre.into(),
        release_type: body.release_type,
        image: body.image,
        track_list: body.track_list,
        user: Some(Reference::Unresolved(user)),
        artist: Reference::Unresolved(artist),
        reviews: Default::default(),
    };
    catalog.releases.push(release.clone());
    created(release)
}

async fn show_release(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let catalog = lock(&state);
    catalog
        .release(&id)
        .cloned()
        .map_or_else(|| Err(not_found("Release")), ok)
}

async fn update_release(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(changes): Json<Value>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let index = catalog
        .releases
        .iter()
        .position(|r| r.id.as_str() == id)
        .ok_or_else(|| not_found("Release"))?;
    if !owned_by(catalog.releases[index].user.as_ref(), &user) {
        return Err(forbidden());
    }
    let updated: Release = patch(&catalog.releases[index], changes)?;
    catalog.releases[index] = updated.clone();
    ok(Release {
        user: None,
        ..updated
    })
}

async fn delete_release(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let index = catalog
        .releases
        .iter()
        .position(|r| r.id.as_str() == id)
        .ok_or_else(|| not_found("Release"))?;
    if !owned_by(catalog.releases[index].user.as_ref(), &user) {
        return Err(forbidden());
    }
    catalog.releases.remove(index);
    ok(json!({ "message": "Release deleted" }))
}

// reviews

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    stars: u8,
    #[serde(default)]
    text: String,
    favourite_track: Option<String>,
}

impl ReviewBody {
    fn stars(&self) -> Result<Stars, Response> {
        Stars::new(self.stars)
            .ok_or_else(|| field_error("stars", "Stars must be between 1 and 5"))
    }
}

async fn create_review(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let stars = body.stars()?;
    let review_id = catalog.fresh_id("v");
    let review = Review {
        id: review_id,
        stars,
        text: body.text,
        favourite_track: body.favourite_track.filter(|t| !t.is_empty()),
        user: Some(Reference::Unresolved(user)),
    };
    let release = catalog
        .release_mut(&Id::from(id))
        .ok_or_else(|| not_found("Release"))?;
    release.push_review(review.clone());
    created(review)
}

async fn update_review(
    State(state): State<Shared>,
    Path((id, review_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let stars = body.stars()?;
    let release = catalog
        .release_mut(&Id::from(id))
        .ok_or_else(|| not_found("Release"))?;
    let existing = release
        .find_review(&Id::from(review_id))
        .ok_or_else(|| not_found("Review"))?;
    if !owned_by(existing.user.as_ref(), &user) {
        return Err(forbidden());
    }
    let review = Review {
        stars,
        text: body.text,
        favourite_track: body.favourite_track.filter(|t| !t.is_empty()),
        ..existing.clone()
    };
    release.replace_review(review.clone());
    ok(review)
}

async fn delete_review(
    State(state): State<Shared>,
    Path((id, review_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    let release = catalog
        .release_mut(&Id::from(id))
        .ok_or_else(|| not_found("Release"))?;
    let review_id = Id::from(review_id);
    let existing = release
        .find_review(&review_id)
        .ok_or_else(|| not_found("Review"))?;
    if !owned_by(existing.user.as_ref(), &user) {
        return Err(forbidden());
    }
    release.remove_review(&review_id);
    ok(json!({ "message": "Review deleted" }))
}

// users

async fn profile(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let catalog = lock(&state);
    catalog.caller(&headers)?;
    let user = catalog
        .users
        .iter()
        .find(|u| u.user.id.as_str() == id)
        .ok_or_else(|| not_found("User"))?;
    ok(ProfileUser {
        id: user.user.id.clone(),
        username: user.user.username.clone(),
        created_at: user.user.created_at.clone(),
    })
}

async fn uploads(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let catalog = lock(&state);
    catalog.caller(&headers)?;
    let id = Id::from(id);
    let releases: Vec<&Release> = catalog
        .releases
        .iter()
        .filter(|r| owned_by(r.user.as_ref(), &id))
        .collect();
    ok(releases)
}

async fn favourites(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let catalog = lock(&state);
    catalog.caller(&headers)?;
    let ids = catalog
        .favourites
        .get(&Id::from(id))
        .cloned()
        .unwrap_or_default();
    let releases: Vec<&Release> = catalog
        .releases
        .iter()
        .filter(|r| ids.contains(&r.id))
        .collect();
    ok(releases)
}

async fn add_favourite(
    State(state): State<Shared>,
    Path((id, release_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    if user.as_str() != id {
        return Err(forbidden());
    }
    if catalog.release(&release_id).is_none() {
        return Err(not_found("Release"));
    }
    let favourites = catalog.favourites.entry(user).or_default();
    let release_id = Id::from(release_id);
    if !favourites.contains(&release_id) {
        favourites.push(release_id);
    }
    ok(json!({ "message": "Added to favourites" }))
}

async fn remove_favourite(
    State(state): State<Shared>,
    Path((id, release_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    let mut catalog = lock(&state);
    let user = catalog.caller(&headers)?;
    if user.as_str() != id {
        return Err(forbidden());
    }
    let release_id = Id::from(release_id);
    if let Some(favourites) = catalog.favourites.get_mut(&user) {
        favourites.retain(|r| r != &release_id);
    }
    ok(json!({ "message": "Removed from favourites" }))
}
