use std::{cmp::Ordering, fmt::Display};

use strum::{EnumIter, EnumString, VariantNames};
use waxlog_types::{Artist, Release, Review};

/// One way of ordering the records of a list view.
///
/// Sort modes cycle like the options of a select box, see [`SortMode::next`] and
/// [`SortMode::prev`].
pub trait SortMode<T>: Copy + Default + Display {
    #[must_use]
    fn next(&self) -> Self;
    #[must_use]
    fn prev(&self) -> Self;

    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Stable sort, records that compare equal keep their relative order.
    #[inline]
    fn sort_items(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

/// Collation key for string fields: case is ignored.
fn key(input: &str) -> String {
    input.to_lowercase()
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    key(a).cmp(&key(b))
}

#[derive(
    Default, Clone, Copy, PartialEq, Eq, Debug, EnumString, EnumIter, VariantNames, strum::Display,
)]
pub enum ReleaseSort {
    #[default]
    #[strum(to_string = "Title (A-Z)", serialize = "title-az", serialize = "title")]
    TitleAz,
    #[strum(to_string = "Artist (A-Z)", serialize = "artist-az", serialize = "artist")]
    ArtistAz,
    #[strum(to_string = "Year (newest first)", serialize = "year-desc", serialize = "year")]
    YearDesc,
    #[strum(to_string = "Genre (A-Z)", serialize = "genre-az", serialize = "genre")]
    GenreAz,
}

impl SortMode<Release> for ReleaseSort {
    fn next(&self) -> Self {
        match self {
            Self::TitleAz => Self::ArtistAz,
            Self::ArtistAz => Self::YearDesc,
            Self::YearDesc => Self::GenreAz,
            Self::GenreAz => Self::TitleAz,
        }
    }

    fn prev(&self) -> Self {
        match self {
            Self::TitleAz => Self::GenreAz,
            Self::ArtistAz => Self::TitleAz,
            Self::YearDesc => Self::ArtistAz,
            Self::GenreAz => Self::YearDesc,
        }
    }

    fn compare(&self, a: &Release, b: &Release) -> Ordering {
        match self {
            Self::TitleAz => cmp_text(&a.title, &b.title),
            // unresolved artists sort as "Unknown Artist"
            Self::ArtistAz => cmp_text(a.artist_name(), b.artist_name()),
            Self::YearDesc => b.year.cmp(&a.year),
            Self::GenreAz => cmp_text(&a.genre, &b.genre),
        }
    }
}

#[derive(
    Default, Clone, Copy, PartialEq, Eq, Debug, EnumString, EnumIter, VariantNames, strum::Display,
)]
pub enum ArtistSort {
    #[default]
    #[strum(to_string = "Name (A-Z)", serialize = "name-az", serialize = "name")]
    NameAz,
    #[strum(to_string = "Genre (A-Z)", serialize = "genre-az", serialize = "genre")]
    GenreAz,
}

impl SortMode<Artist> for ArtistSort {
    fn next(&self) -> Self {
        match self {
            Self::NameAz => Self::GenreAz,
            Self::GenreAz => Self::NameAz,
        }
    }

    fn prev(&self) -> Self {
        self.next()
    }

    fn compare(&self, a: &Artist, b: &Artist) -> Ordering {
        match self {
            Self::NameAz => cmp_text(&a.name, &b.name),
            Self::GenreAz => cmp_text(&a.genre, &b.genre),
        }
    }
}

/// Keeps records in the order they arrived in, used for the reviews of a release.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Unsorted;

impl Display for Unsorted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oldest first")
    }
}

impl SortMode<Review> for Unsorted {
    fn next(&self) -> Self {
        Self
    }

    fn prev(&self) -> Self {
        Self
    }

    fn compare(&self, _: &Review, _: &Review) -> Ordering {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{artist, release, resolved_release};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn titles(releases: &[Release]) -> Vec<&str> {
        releases.iter().map(|r| r.title.as_ref()).collect()
    }

    #[rstest]
    #[case::title(ReleaseSort::TitleAz, vec!["alpha", "Beta", "gamma"])]
    #[case::year(ReleaseSort::YearDesc, vec!["gamma", "Beta", "alpha"])]
    #[case::genre(ReleaseSort::GenreAz, vec!["Beta", "gamma", "alpha"])]
    fn test_release_sort(#[case] mode: ReleaseSort, #[case] expected: Vec<&str>) {
        let mut releases = vec![
            release("1", "gamma", 2020, "Dub"),
            release("2", "alpha", 1999, "techno"),
            release("3", "Beta", 2005, "ambient"),
        ];
        mode.sort_items(&mut releases);
        assert_eq!(titles(&releases), expected);
    }

    #[test]
    fn test_artist_sort_puts_unknown_artists_by_placeholder_name() {
        let mut releases = vec![
            resolved_release("1", "One", artist("a1", "Vex'd", "Dubstep")),
            release("2", "Two", 2000, "Dub"),
            resolved_release("3", "Three", artist("a3", "actress", "Techno")),
        ];
        ReleaseSort::ArtistAz.sort_items(&mut releases);
        // "actress" < "Unknown Artist" < "Vex'd"
        assert_eq!(titles(&releases), vec!["Three", "Two", "One"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut releases = vec![
            release("1", "First", 2001, "Dub"),
            release("2", "Second", 2001, "Dub"),
            release("3", "Third", 2001, "Dub"),
        ];
        ReleaseSort::YearDesc.sort_items(&mut releases);
        assert_eq!(titles(&releases), vec!["First", "Second", "Third"]);
        ReleaseSort::GenreAz.sort_items(&mut releases);
        assert_eq!(titles(&releases), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_artist_sort_modes() {
        let mut artists = vec![
            artist("1", "burial", "Garage"),
            artist("2", "Actress", "techno"),
            artist("3", "Loefah", "dubstep"),
        ];
        ArtistSort::NameAz.sort_items(&mut artists);
        assert_eq!(
            artists.iter().map(|a| a.name.as_ref()).collect::<Vec<_>>(),
            vec!["Actress", "burial", "Loefah"]
        );
        ArtistSort::GenreAz.sort_items(&mut artists);
        assert_eq!(
            artists.iter().map(|a| a.genre.as_ref()).collect::<Vec<_>>(),
            vec!["dubstep", "Garage", "techno"]
        );
    }

    #[test]
    fn test_release_sort_cycles() {
        for mode in ReleaseSort::iter() {
            assert_eq!(mode.next().prev(), mode);
            assert_eq!(mode.next().next().next().next(), mode);
        }
        assert_eq!(ArtistSort::NameAz.next(), ArtistSort::GenreAz);
        assert_eq!(ArtistSort::GenreAz.prev(), ArtistSort::NameAz);
    }

    #[rstest]
    #[case("title-az", ReleaseSort::TitleAz)]
    #[case("artist", ReleaseSort::ArtistAz)]
    #[case("year-desc", ReleaseSort::YearDesc)]
    #[case("genre", ReleaseSort::GenreAz)]
    fn test_release_sort_parses_cli_names(#[case] input: &str, #[case] expected: ReleaseSort) {
        assert_eq!(input.parse::<ReleaseSort>().unwrap(), expected);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ReleaseSort::YearDesc.to_string(), "Year (newest first)");
        assert_eq!(ArtistSort::default().to_string(), "Name (A-Z)");
        assert_eq!(Unsorted.to_string(), "Oldest first");
    }
}
