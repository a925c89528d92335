use waxlog_types::{Release, Review, ReviewDraft, ReviewId};

/// Whether a record's page shows the record, or a form to edit it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditState<D> {
    Viewing,
    Editing(D),
}

impl<D> Default for EditState<D> {
    #[inline]
    fn default() -> Self {
        Self::Viewing
    }
}

impl<D> EditState<D> {
    /// Open the form, pre-filled with `draft`.
    #[inline]
    pub fn begin(&mut self, draft: D) {
        *self = Self::Editing(draft);
    }

    /// Close the form, throwing away any changes.
    #[inline]
    pub fn cancel(&mut self) {
        *self = Self::Viewing;
    }

    /// Close the form, handing back what was typed into it.
    #[inline]
    pub fn finish(&mut self) -> Option<D> {
        match std::mem::replace(self, Self::Viewing) {
            Self::Editing(draft) => Some(draft),
            Self::Viewing => None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    #[must_use]
    #[inline]
    pub const fn draft(&self) -> Option<&D> {
        match self {
            Self::Editing(draft) => Some(draft),
            Self::Viewing => None,
        }
    }

    #[inline]
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            Self::Editing(draft) => Some(draft),
            Self::Viewing => None,
        }
    }
}

/// The review forms on a release's page: one for writing a new review, and at most one
/// existing review being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewEditor {
    new_review: ReviewDraft,
    editing: EditState<(ReviewId, ReviewDraft)>,
}

impl ReviewEditor {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    #[inline]
    pub const fn new_review(&self) -> &ReviewDraft {
        &self.new_review
    }

    #[inline]
    pub fn new_review_mut(&mut self) -> &mut ReviewDraft {
        &mut self.new_review
    }

    /// Open the edit form of `review`, replacing any other review being edited.
    #[inline]
    pub fn begin_edit(&mut self, review: &Review) {
        self.editing
            .begin((review.id.clone(), ReviewDraft::from(review)));
    }

    #[inline]
    pub fn cancel_edit(&mut self) {
        self.editing.cancel();
    }

    /// Which review is being edited, if any.
    #[must_use]
    #[inline]
    pub fn editing(&self) -> Option<&ReviewId> {
        self.editing.draft().map(|(id, _)| id)
    }

    #[inline]
    pub fn edit_draft_mut(&mut self) -> Option<&mut ReviewDraft> {
        self.editing.draft_mut().map(|(_, draft)| draft)
    }

    /// Close the edit form, handing back the review id and the edited draft.
    #[inline]
    pub fn finish_edit(&mut self) -> Option<(ReviewId, ReviewDraft)> {
        self.editing.finish()
    }

    /// Attach the review the backend created from the new review form, and clear the form.
    #[inline]
    pub fn created(&mut self, release: &mut Release, review: Review) {
        release.push_review(review);
        self.new_review.reset();
    }

    /// Swap in the backend's copy of an edited review.
    ///
    /// Returns `false` if the release has no review with that id.
    #[inline]
    pub fn updated(&mut self, release: &mut Release, review: Review) -> bool {
        if self.editing() == Some(&review.id) {
            self.editing.cancel();
        }
        release.replace_review(review)
    }

    /// Drop a review the backend deleted.
    #[inline]
    pub fn deleted(&mut self, release: &mut Release, id: &ReviewId) -> bool {
        if self.editing() == Some(id) {
            self.editing.cancel();
        }
        release.remove_review(id)
    }
}
