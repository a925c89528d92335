//! List view projection: search, sort and paginate records that are already in memory.
//!
//! Every list in the catalog (releases, artists, an artist's releases, a profile's uploads and
//! favourites, a release's reviews) is fetched in full and then narrowed down client side.
//! [`project`] is the pure form of that pipeline, [`ListView`] the stateful one that views hold on
//! to between user actions.

mod sort;
mod view;

use std::{num::NonZeroUsize, ops::Range};

use waxlog_types::{Artist, Release, Review};

pub use sort::{ArtistSort, ReleaseSort, SortMode, Unsorted};
pub use view::ListView;

/// Records that can be found with the search box of a list view.
pub trait Searchable {
    /// The fields a search term is matched against.
    fn search_fields(&self) -> impl Iterator<Item = &str>;

    /// Whether any search field contains `term`, ignoring case.
    ///
    /// An empty term matches everything.
    #[inline]
    fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.search_fields()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Searchable for Release {
    /// Title, artist name and genre. An artist that hasn't been resolved has no name to match.
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.title.as_ref()),
            self.artist.resolved().map(|artist| artist.name.as_ref()),
            Some(self.genre.as_ref()),
        ]
        .into_iter()
        .flatten()
    }
}

impl Searchable for Artist {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.name.as_ref(), self.genre.as_ref()].into_iter()
    }
}

/// Reviews have no search box; only the empty term matches them.
impl Searchable for Review {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::empty()
    }
}

/// The user's controls over a list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls<S> {
    pub search: String,
    pub sort: S,
    /// 1-based.
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl<S: Default> Controls<S> {
    #[must_use]
    #[inline]
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search: String::new(),
            sort: S::default(),
            page: 1,
            page_size,
        }
    }
}

/// One page of a list view, plus what's needed to render the pager.
#[derive(Debug, PartialEq, Eq)]
pub struct Projection<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub total_pages: usize,
    /// How many records matched the search, across all pages.
    pub total_matches: usize,
}

impl<T> Projection<'_, T> {
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    #[inline]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    #[inline]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Filter, then sort, then paginate `items`.
///
/// A page outside `1..=total_pages` yields no items.
#[must_use]
#[inline]
pub fn project<'a, T, S>(items: &'a [T], controls: &Controls<S>) -> Projection<'a, T>
where
    T: Searchable,
    S: SortMode<T>,
{
    let visible = filter_and_sort(items, &controls.search, controls.sort);
    let total_matches = visible.len();
    let page_items = page_range(total_matches, controls.page, controls.page_size)
        .map(|range| visible[range].iter().map(|&i| &items[i]).collect())
        .unwrap_or_default();

    Projection {
        items: page_items,
        page: controls.page,
        total_pages: total_pages(total_matches, controls.page_size),
        total_matches,
    }
}

/// Indices of the records matching `search`, in `sort` order.
pub(crate) fn filter_and_sort<T, S>(items: &[T], search: &str, sort: S) -> Vec<usize>
where
    T: Searchable,
    S: SortMode<T>,
{
    let mut visible: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches(search))
        .map(|(i, _)| i)
        .collect();
    // stable, so ties keep their source order
    visible.sort_by(|&a, &b| sort.compare(&items[a], &items[b]));
    visible
}

/// `ceil(len / page_size)`, which is 0 for an empty list.
#[must_use]
#[inline]
pub const fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// The slice of a `len` long list that makes up `page`, if that page exists.
#[must_use]
#[inline]
pub fn page_range(len: usize, page: usize, page_size: NonZeroUsize) -> Option<Range<usize>> {
    if page == 0 || page > total_pages(len, page_size) {
        return None;
    }
    let start = (page - 1) * page_size.get();
    let end = (start + page_size.get()).min(len);
    Some(start..end)
}
