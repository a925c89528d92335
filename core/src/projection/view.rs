use std::num::NonZeroUsize;

use crate::errors::PageOutOfRange;

use super::{Controls, Projection, Searchable, SortMode, filter_and_sort, page_range, total_pages};

/// A list view: the records it was loaded with, the user's controls, and the order they imply.
///
/// The filtered and sorted order is recomputed whenever the records, the search term or the sort
/// mode change, and reused for every page in between. Changing the search term or the sort mode
/// goes back to the first page.
#[derive(Clone, Debug)]
pub struct ListView<T, S> {
    items: Vec<T>,
    search: String,
    sort: S,
    page: usize,
    page_size: NonZeroUsize,
    /// indices into `items`, filtered and sorted
    visible: Vec<usize>,
}

impl<T, S> ListView<T, S>
where
    T: Searchable,
    S: SortMode<T>,
{
    #[must_use]
    #[inline]
    pub fn new(items: Vec<T>, page_size: NonZeroUsize) -> Self {
        Self::with_controls(items, Controls::new(page_size))
    }

    #[must_use]
    #[inline]
    pub fn with_controls(items: Vec<T>, controls: Controls<S>) -> Self {
        let mut view = Self {
            items,
            search: controls.search,
            sort: controls.sort,
            page: controls.page,
            page_size: controls.page_size,
            visible: Vec::new(),
        };
        view.recompute();
        view.clamp_page();
        view
    }

    fn recompute(&mut self) {
        self.visible = filter_and_sort(&self.items, &self.search, self.sort);
    }

    /// Keep the current page if it still exists, otherwise fall back to the last one.
    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }

    #[must_use]
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the records, e.g. after a refetch.
    #[inline]
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.recompute();
        self.clamp_page();
    }

    /// Change the records in place; the order is recomputed afterwards.
    #[inline]
    pub fn update_items<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        f(&mut self.items);
        self.recompute();
        self.clamp_page();
    }

    #[must_use]
    #[inline]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[inline]
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search {
            return;
        }
        self.search = term;
        self.recompute();
        self.page = 1;
    }

    #[must_use]
    #[inline]
    pub const fn sort(&self) -> S {
        self.sort
    }

    #[inline]
    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
        self.recompute();
        self.page = 1;
    }

    #[inline]
    pub fn next_sort(&mut self) {
        self.set_sort(self.sort.next());
    }

    #[inline]
    pub fn prev_sort(&mut self) {
        self.set_sort(self.sort.prev());
    }

    #[must_use]
    #[inline]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    #[inline]
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    #[must_use]
    #[inline]
    pub fn total_pages(&self) -> usize {
        total_pages(self.visible.len(), self.page_size)
    }

    #[must_use]
    #[inline]
    pub fn total_matches(&self) -> usize {
        self.visible.len()
    }

    /// Go to `page`.
    ///
    /// # Errors
    ///
    /// Pages outside `1..=total_pages` are refused, and the current page is kept.
    #[inline]
    pub fn go_to_page(&mut self, page: usize) -> Result<(), PageOutOfRange> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            log::debug!("refusing to go to page {page} of {total_pages}");
            return Err(PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        self.page = page;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Self::go_to_page`].
    #[inline]
    pub fn next_page(&mut self) -> Result<(), PageOutOfRange> {
        self.go_to_page(self.page + 1)
    }

    /// # Errors
    ///
    /// See [`Self::go_to_page`].
    #[inline]
    pub fn prev_page(&mut self) -> Result<(), PageOutOfRange> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// The records on the current page, in order.
    #[inline]
    pub fn page_items(&self) -> impl Iterator<Item = &T> {
        page_range(self.visible.len(), self.page, self.page_size)
            .map(|range| &self.visible[range])
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.items[i])
    }

    #[must_use]
    #[inline]
    pub fn projection(&self) -> Projection<'_, T> {
        Projection {
            items: self.page_items().collect(),
            page: self.page,
            total_pages: self.total_pages(),
            total_matches: self.total_matches(),
        }
    }

    #[must_use]
    #[inline]
    pub fn controls(&self) -> Controls<S> {
        Controls {
            search: self.search.clone(),
            sort: self.sort,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        projection::{ArtistSort, ReleaseSort, project},
        test_utils::{artist, numbered_releases, release},
    };
    use pretty_assertions::assert_eq;

    const TWELVE: NonZeroUsize = NonZeroUsize::new(12).unwrap();

    fn page_titles<S: SortMode<waxlog_types::Release>>(
        view: &ListView<waxlog_types::Release, S>,
    ) -> Vec<String> {
        view.page_items().map(|r| r.title.to_string()).collect()
    }

    #[test]
    fn test_paging_through_fourteen_releases() {
        let mut view: ListView<_, ReleaseSort> = ListView::new(numbered_releases(14), TWELVE);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.page_items().count(), 12);

        view.next_page().unwrap();
        assert_eq!(page_titles(&view), vec!["Release 13", "Release 14"]);

        assert_eq!(
            view.next_page(),
            Err(PageOutOfRange {
                requested: 3,
                total_pages: 2
            })
        );
        assert_eq!(view.page(), 2);

        view.prev_page().unwrap();
        assert_eq!(view.page(), 1);
        assert!(view.prev_page().is_err());
        assert!(view.go_to_page(0).is_err());
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_search_and_sort_go_back_to_first_page() {
        let mut view: ListView<_, ReleaseSort> = ListView::new(numbered_releases(30), TWELVE);
        view.go_to_page(3).unwrap();

        view.set_search("release 2");
        assert_eq!(view.page(), 1);
        // "Release 20" ..= "Release 29"
        assert_eq!(view.total_matches(), 10);

        view.go_to_page(1).unwrap();
        view.set_search("");
        view.go_to_page(2).unwrap();
        view.next_sort();
        assert_eq!(view.sort(), ReleaseSort::ArtistAz);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_setting_the_same_search_keeps_the_page() {
        let mut view: ListView<_, ReleaseSort> = ListView::new(numbered_releases(30), TWELVE);
        view.go_to_page(2).unwrap();
        view.set_search("");
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_matches_pure_projection() {
        let releases = vec![
            release("1", "c", 2001, "Dub"),
            release("2", "a", 2003, "Dub"),
            release("3", "b", 2002, "Techno"),
        ];
        let mut view: ListView<_, ReleaseSort> =
            ListView::new(releases.clone(), NonZeroUsize::new(2).unwrap());
        view.set_sort(ReleaseSort::YearDesc);
        view.go_to_page(2).unwrap();

        assert_eq!(view.projection(), project(&releases, &view.controls()));
        assert_eq!(page_titles(&view), vec!["c"]);
    }

    #[test]
    fn test_shrinking_items_clamps_page() {
        let mut view: ListView<_, ReleaseSort> = ListView::new(numbered_releases(14), TWELVE);
        view.go_to_page(2).unwrap();

        view.update_items(|items| items.truncate(5));
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_items().count(), 5);

        view.set_items(Vec::new());
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 0);
        assert_eq!(view.page_items().count(), 0);
    }

    #[test]
    fn test_artist_view_empty_search() {
        let mut view: ListView<_, ArtistSort> = ListView::new(
            vec![artist("1", "Burial", "Garage"), artist("2", "Actress", "Techno")],
            TWELVE,
        );
        view.set_search("zzz");
        assert_eq!(view.page_items().count(), 0);
        assert_eq!(view.total_pages(), 0);
        assert!(view.next_page().is_err());
    }
}
