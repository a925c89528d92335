pub mod complete;
pub mod implementations;
pub mod printing;
pub mod utils;


use clap::{Args, Subcommand, ValueEnum};
use clap_complete::ArgValueCandidates;
use waxlog_client::CatalogClient;
use waxlog_core::{
    config::PaginationSettings,
    projection::{ArtistSort, ReleaseSort},
    state::ProfileTab,
};
use waxlog_types::ReleaseType;

use complete::{CompletableTable, complete_things};
use utils::StdIn;

/// What every command runs against.
pub struct Context {
    pub client: CatalogClient,
    pub pagination: PaginationSettings,
}

pub trait CommandHandler {
    type Output;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &I,
    ) -> Self::Output;
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Create an account. Passwords not given as flags are read from stdin, one per line.
    Signup {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: Option<String>,
        #[clap(long)]
        confirm_password: Option<String>,
    },
    /// Log in. A password not given as a flag is read from stdin.
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Confirm an email address with the token from the confirmation email
    ConfirmEmail { token: String },
    /// Recover a forgotten password
    Password {
        #[clap(subcommand)]
        command: PasswordCommand,
    },
    /// Browse and manage artists
    #[clap(alias = "artist")]
    Artists {
        #[clap(subcommand)]
        command: ArtistCommand,
    },
    /// Browse and manage releases
    #[clap(alias = "release")]
    Releases {
        #[clap(subcommand)]
        command: ReleaseCommand,
    },
    /// Review releases
    #[clap(alias = "review")]
    Reviews {
        #[clap(subcommand)]
        command: ReviewCommand,
    },
    /// Check or flip whether a release is among your favourites
    #[clap(alias = "favorite")]
    Favourite {
        #[clap(subcommand)]
        command: FavouriteCommand,
    },
    /// Show a user's profile, with their uploads or favourites (defaults to your own)
    Profile {
        /// The id of the user
        user: Option<String>,
        /// Which list to show
        #[clap(long, value_enum, default_value_t = TabArg::Uploads)]
        tab: TabArg,
        #[clap(flatten)]
        list: ListArgs,
        /// How to order the releases (title, artist, year, genre)
        #[clap(long)]
        sort: Option<ReleaseSort>,
    },
}

/// Search and page flags shared by the list commands.
#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Only show records containing this text
    #[clap(long, short, default_value = "")]
    pub search: String,
    /// Which page to show, starting from 1
    #[clap(long, short, default_value_t = 1)]
    pub page: usize,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum TabArg {
    Uploads,
    #[clap(alias = "favorites")]
    Favourites,
}

impl From<TabArg> for ProfileTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Uploads => Self::Uploads,
            TabArg::Favourites => Self::Favourites,
        }
    }
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum PasswordCommand {
    /// Have a password reset link emailed to you
    Forgot { email: String },
    /// Set a new password with the token from the reset email.
    /// Passwords not given as flags are read from stdin, one per line.
    Reset {
        token: String,
        #[clap(long)]
        password: Option<String>,
        #[clap(long)]
        confirm_password: Option<String>,
    },
}

/// The fields of an artist's form. Required ones are only required when creating.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
pub struct ArtistFields {
    #[clap(long)]
    pub name: Option<String>,
    #[clap(long)]
    pub genre: Option<String>,
    #[clap(long)]
    pub country: Option<String>,
    #[clap(long)]
    pub formed_year: Option<i32>,
    #[clap(long)]
    pub biography: Option<String>,
    /// URL of a picture of the artist
    #[clap(long)]
    pub image: Option<String>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ArtistCommand {
    /// List artists
    List {
        #[clap(flatten)]
        list: ListArgs,
        /// How to order the artists (name, genre)
        #[clap(long)]
        sort: Option<ArtistSort>,
    },
    /// Show an artist and their releases
    Show {
        /// The id of the artist
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Artist)))]
        id: String,
        /// Which page of releases to show
        #[clap(long, short, default_value_t = 1)]
        page: usize,
    },
    /// Add an artist to the catalog
    Create {
        #[clap(flatten)]
        fields: ArtistFields,
    },
    /// Change an artist you added
    Update {
        /// The id of the artist
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Artist)))]
        id: String,
        #[clap(flatten)]
        fields: ArtistFields,
    },
    /// Remove an artist you added
    Delete {
        /// The id of the artist
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Artist)))]
        id: String,
    },
    /// Check whether an artist of that name is already in the catalog
    CheckName { name: String },
}

/// The fields of a release's form. Required ones are only required when creating.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
pub struct ReleaseFields {
    #[clap(long)]
    pub title: Option<String>,
    /// The id of the artist to credit
    #[clap(long, conflicts_with = "new_artist")]
    pub artist: Option<String>,
    /// Credit a new artist of this name, created along with the release
    #[clap(long)]
    pub new_artist: Option<String>,
    #[clap(long)]
    pub year: Option<i32>,
    #[clap(long)]
    pub genre: Option<String>,
    /// Single, Album, EP or Mixtape
    #[clap(long)]
    pub release_type: Option<ReleaseType>,
    /// URL of the cover art
    #[clap(long)]
    pub image: Option<String>,
    /// A track of the release, in order. Repeat for every track.
    #[clap(long = "track")]
    pub tracks: Vec<String>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ReleaseCommand {
    /// List releases
    List {
        #[clap(flatten)]
        list: ListArgs,
        /// How to order the releases (title, artist, year, genre)
        #[clap(long)]
        sort: Option<ReleaseSort>,
    },
    /// Show a release, its track list and reviews
    Show {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        id: String,
        /// Which page of reviews to show
        #[clap(long, short, default_value_t = 1)]
        page: usize,
    },
    /// Add a release to the catalog
    Create {
        #[clap(flatten)]
        fields: ReleaseFields,
    },
    /// Change a release you uploaded
    Update {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        id: String,
        #[clap(flatten)]
        fields: ReleaseFields,
    },
    /// Remove a release you uploaded
    Delete {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ReviewCommand {
    /// Review a release
    Add {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        release: String,
        /// Rating, from 1 to 5
        #[clap(long)]
        stars: u8,
        #[clap(long)]
        text: String,
        #[clap(long)]
        favourite_track: Option<String>,
    },
    /// Change a review you wrote
    Edit {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        release: String,
        /// The id of the review
        review: String,
        /// Rating, from 1 to 5
        #[clap(long)]
        stars: Option<u8>,
        #[clap(long)]
        text: Option<String>,
        #[clap(long)]
        favourite_track: Option<String>,
    },
    /// Delete a review you wrote
    Delete {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        release: String,
        /// The id of the review
        review: String,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum FavouriteCommand {
    /// Whether the release is among your favourites
    Status {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        release: String,
    },
    /// Add the release to your favourites, or remove it if it's there already
    Toggle {
        /// The id of the release
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Release)))]
        release: String,
    },
}
