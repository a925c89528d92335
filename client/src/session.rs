//! The logged-in session, and where its token is kept between runs.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tokio::sync::RwLock;
use waxlog_types::Token;

/// Persistent storage for the session token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Fails if the store exists but can't be read.
    fn load(&self) -> io::Result<Option<Token>>;
    /// # Errors
    ///
    /// Fails if the store can't be written.
    fn save(&self, token: &Token) -> io::Result<()>;
    /// Forget the token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the store can't be written.
    fn clear(&self) -> io::Result<()>;
}

/// Keeps the token in a file, by default `token` in the data directory.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<Token>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| Token::new(token)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &Token) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.as_str())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Keeps the token for as long as the process lives.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    #[inline]
    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<Token>>> {
        self.token
            .lock()
            .map_err(|_| io::Error::other("token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<Token>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &Token) -> io::Result<()> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// The current login, shared by every request the client makes.
///
/// Loaded from its [`TokenStore`] once, then kept in sync with it: set on login, and cleared on
/// logout or whenever the backend answers 401.
#[derive(Debug)]
pub struct Session {
    token: RwLock<Option<Token>>,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Restore the session saved in `store`, if any.
    ///
    /// # Errors
    ///
    /// Fails if the store can't be read.
    #[inline]
    pub fn load(store: impl TokenStore + 'static) -> io::Result<Self> {
        let token = store.load()?;
        log::debug!("restored session: logged in = {}", token.is_some());
        Ok(Self {
            token: RwLock::new(token),
            store: Box::new(store),
        })
    }

    #[inline]
    pub async fn token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    #[inline]
    pub async fn is_logged_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// # Errors
    ///
    /// Fails if the token can't be persisted; the in-memory session is set regardless.
    #[inline]
    pub async fn set(&self, token: Token) -> io::Result<()> {
        let mut guard = self.token.write().await;
        let saved = self.store.save(&token);
        *guard = Some(token);
        saved
    }

    /// # Errors
    ///
    /// Fails if the persisted token can't be removed; the in-memory session is cleared regardless.
    #[inline]
    pub async fn clear(&self) -> io::Result<()> {
        let mut guard = self.token.write().await;
        *guard = None;
        self.store.clear()
    }
}
