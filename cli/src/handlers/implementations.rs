use std::sync::Arc;

use crate::handlers::{printing, utils};

use super::{
    ArtistCommand, ArtistFields, Command, CommandHandler, Context, FavouriteCommand, ListArgs,
    PasswordCommand, ReleaseCommand, ReleaseFields, ReviewCommand, utils::StdIn,
};

use anyhow::{anyhow, bail};
use waxlog_client::ApiError;
use waxlog_core::{
    projection::{ListView, Unsorted},
    state::{FavouriteAction, FavouriteState, ProfileView, ReviewEditor},
};
use waxlog_types::{
    ArtistChangeSet, ArtistChoice, ArtistDraft, Credentials, FieldErrors, Id, PasswordReset,
    ReleaseChangeSet, ReleaseDraft, Review, SignupForm, release::parse_track_list,
};

pub const SIGNUP_SUCCESS: &str =
    "Sign up successful! Please check your email to confirm your account.";
pub const PROFILE_UNAUTHORIZED: &str = "Unauthorized. Please log in.";
pub const PROFILE_FAILED: &str = "Failed to fetch user data. Please try again later.";

/// Records only their creator may change.
#[derive(Clone, Copy, Debug)]
enum Owned {
    Artist,
    Release,
    Review,
}

impl Owned {
    fn refusal(self, action: &str) -> anyhow::Error {
        match self {
            Self::Artist => anyhow!("Failed to {action} artist. Are you the original poster?"),
            Self::Release => anyhow!("Failed to {action} release. Are you the original poster?"),
            Self::Review => anyhow!("Failed to {action} review. Are you the author?"),
        }
    }

    /// Swap a 403 from the backend for the refusal message.
    fn check<T>(self, action: &str, result: Result<T, ApiError>) -> anyhow::Result<T> {
        result.map_err(|e| {
            if e.is_forbidden() {
                self.refusal(action)
            } else {
                e.into()
            }
        })
    }
}

/// Fill in the passwords missing from the flags from stdin, nudging the user if they're typing.
fn read_secrets<const N: usize, W: std::fmt::Write, I: StdIn>(
    flags: [Option<&String>; N],
    stdin: &I,
    stderr: &mut W,
) -> anyhow::Result<[String; N]> {
    if stdin.is_terminal() && flags.iter().any(Option::is_none) {
        writeln!(stderr, "Enter the missing passwords, one per line:")?;
    }
    utils::secrets(flags, stdin)
}

fn single_page(page: usize) -> ListArgs {
    ListArgs {
        page,
        ..ListArgs::default()
    }
}

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &I,
    ) -> Self::Output {
        match self {
            Self::Signup {
                username,
                email,
                password,
                confirm_password,
            } => {
                let [password, confirm_password] =
                    read_secrets([password.as_ref(), confirm_password.as_ref()], stdin, stderr)?;
                let form = SignupForm {
                    username: username.clone(),
                    email: email.clone(),
                    password,
                    confirm_password,
                };
                ctx.client.signup(&form).await?;
                writeln!(stdout, "{SIGNUP_SUCCESS}")?;
                Ok(())
            }
            Self::Login { email, password } => {
                let [password] = read_secrets([password.as_ref()], stdin, stderr)?;
                let credentials = Credentials {
                    email: email.clone(),
                    password,
                };
                let user = ctx.client.login(&credentials).await.map_err(|e| match e {
                    ApiError::Unauthorized => anyhow!("Invalid email or password."),
                    e => e.into(),
                })?;
                write!(stdout, "{}", printing::user(&user)?)?;
                Ok(())
            }
            Self::Logout => {
                ctx.client.logout().await?;
                writeln!(stdout, "Logged out.")?;
                Ok(())
            }
            Self::Whoami => {
                if !ctx.client.session().is_logged_in().await {
                    writeln!(stdout, "Not logged in.")?;
                    return Ok(());
                }
                let user = ctx.client.current_user().await?;
                write!(stdout, "{}", printing::user(&user)?)?;
                Ok(())
            }
            Self::ConfirmEmail { token } => {
                let reply = ctx.client.confirm_email(token).await?;
                writeln!(stdout, "{}", reply.message)?;
                Ok(())
            }
            Self::Password { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Artists { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Releases { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Reviews { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Favourite { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Profile {
                user,
                tab,
                list,
                sort,
            } => {
                if !ctx.client.session().is_logged_in().await {
                    bail!(PROFILE_UNAUTHORIZED);
                }
                let user = match user {
                    Some(id) => Id::from(id.as_str()),
                    None => ctx.client.current_user().await?.id,
                };
                let profile = ctx.client.profile(&user).await.map_err(|e| {
                    log::warn!("Failed to fetch the profile of {user}: {e}");
                    if e.needs_login() {
                        anyhow::Error::from(e)
                    } else {
                        anyhow!(PROFILE_FAILED)
                    }
                })?;

                let mut view = ProfileView::new(
                    profile.user,
                    profile.uploads,
                    profile.favourites,
                    ctx.pagination.profile,
                );
                view.set_tab((*tab).into());
                utils::apply_list_args(view.active_mut(), list, *sort)?;
                write!(stdout, "{}", printing::profile(&view)?)?;
                Ok(())
            }
        }
    }
}

impl CommandHandler for PasswordCommand {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &I,
    ) -> Self::Output {
        let reply = match self {
            Self::Forgot { email } => ctx.client.forgot_password(email.trim()).await?,
            Self::Reset {
                token,
                password,
                confirm_password,
            } => {
                let [password, confirm_password] =
                    read_secrets([password.as_ref(), confirm_password.as_ref()], stdin, stderr)?;
                let reset = PasswordReset {
                    password,
                    confirm_password,
                };
                ctx.client.reset_password(token, &reset).await?
            }
        };
        writeln!(stdout, "{}", reply.message)?;
        Ok(())
    }
}

impl ArtistFields {
    fn draft(&self) -> ArtistDraft {
        ArtistDraft {
            name: self.name.clone().unwrap_or_default().trim().to_string(),
            genre: self.genre.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            formed_year: self.formed_year,
            biography: self.biography.clone().unwrap_or_default(),
            image: self.image.clone(),
        }
    }

    fn change_set(&self) -> ArtistChangeSet {
        ArtistChangeSet {
            name: self.name.as_deref().map(|name| Arc::from(name.trim())),
            genre: self.genre.as_deref().map(Arc::from),
            country: self.country.clone(),
            formed_year: self.formed_year,
            biography: self.biography.clone(),
            image: self.image.clone(),
        }
    }
}

impl CommandHandler for ArtistCommand {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        _stderr: &mut W2,
        _stdin: &I,
    ) -> Self::Output {
        match self {
            Self::List { list, sort } => {
                let artists = ctx.client.artists().await?;
                let mut view = ListView::new(artists, ctx.pagination.artists);
                utils::apply_list_args(&mut view, list, *sort)?;
                write!(stdout, "{}", printing::artist_page(&view)?)?;
                Ok(())
            }
            Self::Show { id, page } => {
                let artist = ctx.client.artist(&Id::from(id.as_str())).await?;
                let mut releases =
                    ListView::new(artist.releases.clone(), ctx.pagination.artist_releases);
                utils::apply_list_args(&mut releases, &single_page(*page), None)?;
                write!(stdout, "{}", printing::artist_details(&artist, &releases)?)?;
                Ok(())
            }
            Self::Create { fields } => {
                let draft = fields.draft();
                draft.validate().map_err(ApiError::Invalid)?;
                if ctx.client.check_artist_name(&draft.name).await?.exists {
                    let mut errors = FieldErrors::new();
                    errors.insert("name", "An artist with this name already exists");
                    return Err(ApiError::Invalid(errors).into());
                }
                let artist = ctx.client.create_artist(&draft).await?;
                writeln!(
                    stdout,
                    "Created artist \"{}\" (id: {})",
                    artist.name, artist.id
                )?;
                Ok(())
            }
            Self::Update { id, fields } => {
                let changes = fields.change_set();
                if changes.is_empty() {
                    bail!("Nothing to update, pass at least one field to change.");
                }
                let user = ctx.client.current_user().await?;
                let current = ctx.client.artist(&Id::from(id.as_str())).await?;
                if !current.is_owned_by(&user.id) {
                    return Err(Owned::Artist.refusal("update"));
                }
                let updated =
                    Owned::Artist.check("update", ctx.client.update_artist(current, &changes).await)?;
                writeln!(
                    stdout,
                    "Updated artist \"{}\" (id: {})",
                    updated.name, updated.id
                )?;
                Ok(())
            }
            Self::Delete { id } => {
                let user = ctx.client.current_user().await?;
                let artist = ctx.client.artist(&Id::from(id.as_str())).await?;
                if !artist.is_owned_by(&user.id) {
                    return Err(Owned::Artist.refusal("delete"));
                }
                Owned::Artist.check("delete", ctx.client.delete_artist(&artist.id).await)?;
                writeln!(
                    stdout,
                    "Deleted artist \"{}\" (id: {})",
                    artist.name, artist.id
                )?;
                Ok(())
            }
            Self::CheckName { name } => {
                let name = name.trim();
                if ctx.client.check_artist_name(name).await?.exists {
                    writeln!(stdout, "An artist named \"{name}\" is already in the catalog.")?;
                } else {
                    writeln!(stdout, "No artist named \"{name}\" in the catalog yet.")?;
                }
                Ok(())
            }
        }
    }
}

impl ReleaseFields {
    fn artist_choice(&self) -> Option<ArtistChoice> {
        match (&self.artist, &self.new_artist) {
            (Some(id), _) => Some(ArtistChoice::Existing(Id::from(id.trim()))),
            (None, Some(name)) => Some(ArtistChoice::New(name.trim().to_string())),
            (None, None) => None,
        }
    }

    fn draft(&self) -> ReleaseDraft {
        let mut draft = ReleaseDraft {
            title: self.title.clone().unwrap_or_default(),
            image: self.image.clone(),
            artist: self.artist_choice(),
            year: self.year,
            genre: self.genre.clone().unwrap_or_default(),
            release_type: self.release_type.unwrap_or_default(),
            ..ReleaseDraft::default()
        };
        draft.set_track_list(&self.tracks.join("\n"));
        draft
    }

    fn change_set(&self) -> anyhow::Result<ReleaseChangeSet> {
        if self.new_artist.is_some() {
            bail!("A new artist can only be named when creating a release.");
        }
        Ok(ReleaseChangeSet {
            title: self.title.as_deref().map(Arc::from),
            image: self.image.clone(),
            artist: self.artist.as_deref().map(|id| Id::from(id.trim())),
            year: self.year,
            genre: self.genre.as_deref().map(Arc::from),
            track_list: (!self.tracks.is_empty()).then(|| parse_track_list(&self.tracks.join("\n"))),
            release_type: self.release_type,
        })
    }
}

/// Whether the logged in user has favourited `release`.
async fn favourite_state(ctx: &Context, release: &Id) -> anyhow::Result<FavouriteState> {
    let user = ctx.client.current_user().await?;
    let toggle = ctx.client.favourite_toggle(&user.id, release).await?;
    Ok(toggle.state())
}

impl CommandHandler for ReleaseCommand {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
        _stdin: &I,
    ) -> Self::Output {
        match self {
            Self::List { list, sort } => {
                let releases = ctx.client.releases_with_artists().await?;
                let mut view = ListView::new(releases, ctx.pagination.releases);
                utils::apply_list_args(&mut view, list, *sort)?;
                write!(stdout, "{}", printing::release_page(&view)?)?;
                Ok(())
            }
            Self::Show { id, page } => {
                let release = ctx.client.release(&Id::from(id.as_str())).await?;
                let mut reviews: ListView<Review, Unsorted> =
                    ListView::new(release.reviews.clone().into_vec(), ctx.pagination.reviews);
                utils::apply_list_args(&mut reviews, &single_page(*page), None)?;

                let favourite = if ctx.client.session().is_logged_in().await {
                    match favourite_state(ctx, &release.id).await {
                        Ok(state) => state,
                        Err(e) => {
                            log::warn!("Failed to look up the favourite status of {id}: {e}");
                            writeln!(stderr, "Could not check your favourites: {e}")?;
                            FavouriteState::Unknown
                        }
                    }
                } else {
                    FavouriteState::Unknown
                };

                write!(
                    stdout,
                    "{}",
                    printing::release_details(&release, &reviews, favourite)?
                )?;
                Ok(())
            }
            Self::Create { fields } => {
                let release = ctx.client.create_release(&fields.draft()).await?;
                writeln!(
                    stdout,
                    "Created release \"{}\" (id: {})",
                    release.title, release.id
                )?;
                Ok(())
            }
            Self::Update { id, fields } => {
                let changes = fields.change_set()?;
                if changes.is_empty() {
                    bail!("Nothing to update, pass at least one field to change.");
                }
                let user = ctx.client.current_user().await?;
                let current = ctx.client.release(&Id::from(id.as_str())).await?;
                if !current.is_owned_by(&user.id) {
                    return Err(Owned::Release.refusal("update"));
                }
                let updated = Owned::Release
                    .check("update", ctx.client.update_release(current, &changes).await)?;
                writeln!(
                    stdout,
                    "Updated release \"{}\" (id: {})",
                    updated.title, updated.id
                )?;
                Ok(())
            }
            Self::Delete { id } => {
                let user = ctx.client.current_user().await?;
                let release = ctx.client.release(&Id::from(id.as_str())).await?;
                if !release.is_owned_by(&user.id) {
                    return Err(Owned::Release.refusal("delete"));
                }
                Owned::Release.check("delete", ctx.client.delete_release(&release.id).await)?;
                writeln!(
                    stdout,
                    "Deleted release \"{}\" (id: {})",
                    release.title, release.id
                )?;
                Ok(())
            }
        }
    }
}

impl CommandHandler for ReviewCommand {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        _stderr: &mut W2,
        _stdin: &I,
    ) -> Self::Output {
        let mut editor = ReviewEditor::new();
        match self {
            Self::Add {
                release,
                stars,
                text,
                favourite_track,
            } => {
                let form = editor.new_review_mut();
                form.click_star(*stars);
                form.text.clone_from(text);
                form.favourite_track = favourite_track.clone().unwrap_or_default();

                let review = ctx
                    .client
                    .create_review(&Id::from(release.as_str()), editor.new_review())
                    .await?;
                write!(stdout, "Added review:\n{}", printing::review(&review)?)?;
                Ok(())
            }
            Self::Edit {
                release,
                review,
                stars,
                text,
                favourite_track,
            } => {
                let user = ctx.client.current_user().await?;
                let mut release = ctx.client.release(&Id::from(release.as_str())).await?;
                let review_id = Id::from(review.as_str());
                let Some(current) = release.find_review(&review_id) else {
                    bail!("Review not found");
                };
                if !current.is_authored_by(&user.id) {
                    return Err(Owned::Review.refusal("update"));
                }

                editor.begin_edit(current);
                if let Some(form) = editor.edit_draft_mut() {
                    if let Some(stars) = stars {
                        form.click_star(*stars);
                    }
                    if let Some(text) = text {
                        form.text.clone_from(text);
                    }
                    if let Some(track) = favourite_track {
                        form.favourite_track.clone_from(track);
                    }
                }
                let Some((review_id, draft)) = editor.finish_edit() else {
                    bail!("Review not found");
                };

                let updated = Owned::Review.check(
                    "update",
                    ctx.client
                        .update_review(&release.id, &review_id, &draft)
                        .await,
                )?;
                editor.updated(&mut release, updated.clone());
                write!(stdout, "Updated review:\n{}", printing::review(&updated)?)?;
                Ok(())
            }
            Self::Delete { release, review } => {
                let user = ctx.client.current_user().await?;
                let mut release = ctx.client.release(&Id::from(release.as_str())).await?;
                let review_id = Id::from(review.as_str());
                match release.find_review(&review_id) {
                    None => bail!("Review not found"),
                    Some(current) if !current.is_authored_by(&user.id) => {
                        return Err(Owned::Review.refusal("delete"));
                    }
                    Some(_) => {}
                }

                Owned::Review.check(
                    "delete",
                    ctx.client.delete_review(&release.id, &review_id).await,
                )?;
                editor.deleted(&mut release, &review_id);
                writeln!(
                    stdout,
                    "Deleted review {review_id}, \"{}\" has {} reviews left.",
                    release.title,
                    release.reviews.len()
                )?;
                Ok(())
            }
        }
    }
}

impl CommandHandler for FavouriteCommand {
    type Output = anyhow::Result<()>;

    async fn handle<W1: std::fmt::Write + Send, W2: std::fmt::Write + Send, I: StdIn>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        _stderr: &mut W2,
        _stdin: &I,
    ) -> Self::Output {
        match self {
            Self::Status { release } => {
                let release = Id::from(release.as_str());
                match favourite_state(ctx, &release).await? {
                    FavouriteState::Favourited => {
                        writeln!(stdout, "Release {release} is in your favourites.")?;
                    }
                    FavouriteState::NotFavourited | FavouriteState::Unknown => {
                        writeln!(stdout, "Release {release} is not in your favourites.")?;
                    }
                }
                Ok(())
            }
            Self::Toggle { release } => {
                let release = Id::from(release.as_str());
                let user = ctx.client.current_user().await?;
                let mut toggle = ctx.client.favourite_toggle(&user.id, &release).await?;
                let action = ctx
                    .client
                    .toggle_favourite(&mut toggle, &user.id, &release)
                    .await?;
                if let Some(error) = toggle.error() {
                    bail!("{error}");
                }
                match action {
                    FavouriteAction::Add => {
                        writeln!(stdout, "Added release {release} to your favourites.")?;
                    }
                    FavouriteAction::Remove => {
                        writeln!(stdout, "Removed release {release} from your favourites.")?;
                    }
                }
                Ok(())
            }
        }
    }
}
