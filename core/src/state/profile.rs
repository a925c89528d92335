use std::num::NonZeroUsize;

use strum::{Display, EnumIter, EnumString};
use waxlog_types::{Artist, Id, ProfileUser, Release, reference::index_by_id};

use crate::projection::{ListView, ReleaseSort};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProfileTab {
    #[default]
    Uploads,
    Favourites,
}

/// A user's profile: who they are, what they uploaded, and what they favourited.
#[derive(Clone, Debug)]
pub struct ProfileView {
    pub user: ProfileUser,
    tab: ProfileTab,
    uploads: ListView<Release, ReleaseSort>,
    favourites: ListView<Release, ReleaseSort>,
}

impl ProfileView {
    #[must_use]
    #[inline]
    pub fn new(
        user: ProfileUser,
        uploads: Vec<Release>,
        favourites: Vec<Release>,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            user,
            tab: ProfileTab::default(),
            uploads: ListView::new(uploads, page_size),
            favourites: ListView::new(favourites, page_size),
        }
    }

    #[must_use]
    #[inline]
    pub const fn tab(&self) -> ProfileTab {
        self.tab
    }

    /// Switch tabs. The search term and sort mode carry over, the page starts from 1.
    #[inline]
    pub fn set_tab(&mut self, tab: ProfileTab) {
        if tab == self.tab {
            return;
        }
        let search = self.active().search().to_owned();
        let sort = self.active().sort();
        self.tab = tab;
        let active = self.active_mut();
        active.set_search(search);
        active.set_sort(sort);
    }

    #[must_use]
    #[inline]
    pub const fn active(&self) -> &ListView<Release, ReleaseSort> {
        match self.tab {
            ProfileTab::Uploads => &self.uploads,
            ProfileTab::Favourites => &self.favourites,
        }
    }

    #[inline]
    pub fn active_mut(&mut self) -> &mut ListView<Release, ReleaseSort> {
        match self.tab {
            ProfileTab::Uploads => &mut self.uploads,
            ProfileTab::Favourites => &mut self.favourites,
        }
    }

    #[must_use]
    #[inline]
    pub const fn uploads(&self) -> &ListView<Release, ReleaseSort> {
        &self.uploads
    }

    #[must_use]
    #[inline]
    pub const fn favourites(&self) -> &ListView<Release, ReleaseSort> {
        &self.favourites
    }
}

/// Ids of the artists that still need fetching before `releases` can be displayed,
/// each listed once, in order of first appearance.
#[must_use]
#[inline]
pub fn unresolved_artist_ids<'a, I>(releases: I) -> Vec<Id>
where
    I: IntoIterator<Item = &'a Release>,
{
    let mut ids: Vec<Id> = Vec::new();
    for release in releases {
        if release.artist.is_resolved() {
            continue;
        }
        let id = release.artist.id();
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

/// Fill in the artist of every release from `artists`.
///
/// Releases whose artist isn't among `artists` keep the bare id, and display as unknown.
#[inline]
pub fn resolve_artists<I>(releases: &mut [Release], artists: I)
where
    I: IntoIterator<Item = Artist>,
{
    let index = index_by_id(artists);
    for release in releases {
        if !release.artist.resolve(&index) {
            log::debug!(
                "artist {} of release {} could not be resolved",
                release.artist.id(),
                release.id
            );
        }
    }
}
