//! Handles displaying the output of the commands in a human readable format.

use std::fmt::Write;

use waxlog_client::ApiError;
use waxlog_core::{
    projection::{ArtistSort, ListView, ReleaseSort, Searchable, SortMode, Unsorted},
    state::{FavouriteState, ProfileView},
};
use waxlog_types::{
    Artist, FieldErrors, Release, Review, User, UserRef, release::format_track_list,
};

/// `page 2 of 5, 42 matches for "burial"`
fn page_summary<T: Searchable, S: SortMode<T>>(view: &ListView<T, S>) -> String {
    let mut summary = format!(
        "page {} of {}, {} {}",
        view.page(),
        view.total_pages().max(1),
        view.total_matches(),
        if view.total_matches() == 1 {
            "match"
        } else {
            "matches"
        }
    );
    if !view.search().is_empty() {
        summary.push_str(&format!(" for \"{}\"", view.search()));
    }
    summary
}

fn release_line(release: &Release) -> String {
    format!(
        "\"{}\" by {} ({}, {}) (id: {})",
        release.title,
        release.artist_name(),
        release.year,
        release.genre,
        release.id
    )
}

fn author(user: Option<&UserRef>) -> String {
    match user {
        Some(user) => user
            .resolved()
            .map_or_else(|| user.id().to_string(), |u| u.username.to_string()),
        None => "anonymous".to_string(),
    }
}

pub fn release_page(view: &ListView<Release, ReleaseSort>) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "Releases (sorted by {}, {}):",
        view.sort(),
        page_summary(view)
    )?;
    if view.total_matches() == 0 {
        writeln!(output, "\tNo releases found.")?;
    }
    for release in view.page_items() {
        writeln!(output, "\t{}", release_line(release))?;
    }

    Ok(output)
}

pub fn artist_page(view: &ListView<Artist, ArtistSort>) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "Artists (sorted by {}, {}):",
        view.sort(),
        page_summary(view)
    )?;
    if view.total_matches() == 0 {
        writeln!(output, "\tNo artists found.")?;
    }
    for artist in view.page_items() {
        writeln!(
            output,
            "\t\"{}\" ({}) (id: {})",
            artist.name, artist.genre, artist.id
        )?;
    }

    Ok(output)
}

pub fn review(review: &Review) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "{} by {} (id: {})",
        review.stars,
        author(review.user.as_ref()),
        review.id
    )?;
    writeln!(output, "\t{}", review.text)?;
    if let Some(track) = review.favourite_track.as_deref().filter(|t| !t.is_empty()) {
        writeln!(output, "\tFavourite track: {track}")?;
    }

    Ok(output)
}

pub fn release_details(
    release: &Release,
    reviews: &ListView<Review, Unsorted>,
    favourite: FavouriteState,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "\"{}\" by {}", release.title, release.artist_name())?;
    writeln!(output, "\tId: {}", release.id)?;
    writeln!(output, "\tType: {}", release.release_type)?;
    writeln!(output, "\tYear: {}", release.year)?;
    writeln!(output, "\tGenre: {}", release.genre)?;
    if let Some(image) = &release.image {
        writeln!(output, "\tCover: {image}")?;
    }
    writeln!(output, "\tUploaded by: {}", author(release.user.as_ref()))?;
    match favourite {
        FavouriteState::Favourited => writeln!(output, "\tIn your favourites")?,
        FavouriteState::NotFavourited => writeln!(output, "\tNot in your favourites")?,
        FavouriteState::Unknown => {}
    }

    writeln!(output, "Tracks:")?;
    if release.track_list.is_empty() {
        writeln!(output, "\tNo tracks listed.")?;
    }
    for line in format_track_list(&release.track_list).lines() {
        writeln!(output, "\t{line}")?;
    }

    match release.average_stars() {
        Some(average) => writeln!(
            output,
            "Reviews (average {average:.1} stars, {}):",
            page_summary(reviews)
        )?,
        None => writeln!(output, "Reviews:\n\tNo reviews yet.")?,
    }
    for item in reviews.page_items() {
        for line in review(item)?.lines() {
            writeln!(output, "\t{line}")?;
        }
    }

    Ok(output)
}

pub fn artist_details(
    artist: &Artist,
    releases: &ListView<Release, ReleaseSort>,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "\"{}\"", artist.name)?;
    writeln!(output, "\tId: {}", artist.id)?;
    writeln!(output, "\tGenre: {}", artist.genre)?;
    if !artist.country.is_empty() {
        writeln!(output, "\tCountry: {}", artist.country)?;
    }
    if let Some(year) = artist.formed_year {
        writeln!(output, "\tFormed: {year}")?;
    }
    if let Some(image) = &artist.image {
        writeln!(output, "\tImage: {image}")?;
    }
    if !artist.biography.is_empty() {
        writeln!(output, "\t{}", artist.biography)?;
    }
    write!(output, "{}", release_page(releases)?)?;

    Ok(output)
}

pub fn profile(view: &ProfileView) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{} (id: {})", view.user.username, view.user.id)?;
    if let Some(joined) = &view.user.created_at {
        writeln!(output, "\tMember since: {joined}")?;
    }
    writeln!(
        output,
        "\tUploads: {}, Favourites: {}",
        view.uploads().items().len(),
        view.favourites().items().len()
    )?;
    writeln!(output, "Showing {}:", view.tab())?;
    write!(output, "{}", release_page(view.active())?)?;

    Ok(output)
}

pub fn user(user: &User) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Logged in as {} (id: {})", user.username, user.id)?;
    if !user.email.is_empty() {
        writeln!(output, "\tEmail: {}", user.email)?;
    }

    Ok(output)
}

pub fn field_errors(errors: &FieldErrors) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    for (field, message) in errors.iter() {
        writeln!(output, "\t{field}: {message}")?;
    }

    Ok(output)
}

/// What to tell the user when a command fails.
///
/// Field errors go one per line under a summary.
pub fn error(error: &anyhow::Error) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    match error.downcast_ref::<ApiError>() {
        Some(api) if api.field_errors().is_some() => {
            writeln!(output, "Please fix the following:")?;
            if let Some(errors) = api.field_errors() {
                write!(output, "{}", field_errors(errors)?)?;
            }
        }
        _ => writeln!(output, "Error: {error:#}")?,
    }

    Ok(output)
}
