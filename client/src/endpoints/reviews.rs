use reqwest::Method;
use waxlog_types::{ReleaseId, Review, ReviewDraft, ReviewId};

use crate::{ApiError, CatalogClient};

impl CatalogClient {
    /// `POST /releases/:id/reviews`
    ///
    /// # Errors
    ///
    /// [`ApiError::Invalid`] if no rating is picked or the text is blank; nothing is sent in
    /// that case.
    #[tracing::instrument(skip(self, draft), fields(stars = draft.stars))]
    pub async fn create_review(
        &self,
        release: &ReleaseId,
        draft: &ReviewDraft,
    ) -> Result<Review, ApiError> {
        draft.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["releases", release.as_str(), "reviews"])?;
        self.send_json(self.authed(Method::POST, url).await?.json(draft))
            .await
    }

    /// `PUT /releases/:id/reviews/:reviewId`
    ///
    /// # Errors
    ///
    /// See [`Self::create_review`]. Also fails if the session didn't write the review.
    #[tracing::instrument(skip(self, draft), fields(stars = draft.stars))]
    pub async fn update_review(
        &self,
        release: &ReleaseId,
        review: &ReviewId,
        draft: &ReviewDraft,
    ) -> Result<Review, ApiError> {
        draft.validate().map_err(ApiError::Invalid)?;
        let url = self.url(["releases", release.as_str(), "reviews", review.as_str()])?;
        self.send_json(self.authed(Method::PUT, url).await?.json(draft))
            .await
    }

    /// `DELETE /releases/:id/reviews/:reviewId`
    ///
    /// # Errors
    ///
    /// Fails if the session didn't write the review, or the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_review(&self, release: &ReleaseId, review: &ReviewId) -> Result<(), ApiError> {
        let url = self.url(["releases", release.as_str(), "reviews", review.as_str()])?;
        self.send(self.authed(Method::DELETE, url).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ApiError,
        test_utils::{FakeBackend, FakeCatalog},
    };
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use waxlog_core::state::ReviewEditor;
    use waxlog_types::{Id, ReviewDraft};

    #[tokio::test]
    async fn test_first_review_of_a_release() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u2"));
        let mut release = client.release(&Id::from("r1")).await.unwrap();
        assert!(release.reviews.is_empty());

        let mut editor = ReviewEditor::new();
        let form = editor.new_review_mut();
        form.click_star(5);
        form.text = "Great".into();
        form.favourite_track = "Track 2".into();

        let review = client
            .create_review(&release.id, editor.new_review())
            .await
            .unwrap();
        editor.created(&mut release, review);

        assert_eq!(release.reviews.len(), 1);
        let review = &release.reviews[0];
        assert_eq!(review.stars.get(), 5);
        assert_eq!(review.text, "Great");
        assert_eq!(review.favourite_track.as_deref(), Some("Track 2"));
        assert!(review.is_authored_by(&Id::from("u2")));
        assert_eq!(editor.new_review(), &ReviewDraft::default());

        // and the backend agrees
        let fetched = client.release(&release.id).await.unwrap();
        assert_eq!(fetched.reviews, release.reviews);
    }

    #[tokio::test]
    async fn test_unrated_review_is_not_sent() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u2"));
        let draft = ReviewDraft {
            text: "No stars".into(),
            ..ReviewDraft::default()
        };

        let error = client
            .create_review(&Id::from("r1"), &draft)
            .await
            .unwrap_err();
        assert_eq!(
            error.field_errors().and_then(|e| e.get("stars")),
            Some("Please select a rating between 1 and 5")
        );
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_edit_and_delete_own_review() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u1"));
        let mut release = client.release(&Id::from("r3")).await.unwrap();
        let mut editor = ReviewEditor::new();

        editor.begin_edit(&release.reviews[0]);
        editor.edit_draft_mut().unwrap().click_star(2);
        let (review_id, draft) = editor.finish_edit().unwrap();

        let updated = client
            .update_review(&release.id, &review_id, &draft)
            .await
            .unwrap();
        assert!(editor.updated(&mut release, updated));
        assert_eq!(release.reviews[0].stars.get(), 2);
        assert_eq!(release.reviews[0].text, "Cold and beautiful");

        client.delete_review(&release.id, &review_id).await.unwrap();
        assert!(editor.deleted(&mut release, &review_id));
        assert!(release.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_cannot_touch_someone_elses_review() {
        let backend = FakeBackend::start(FakeCatalog::seeded()).await;
        let client = backend.client(Some("u2"));

        let error = client
            .delete_review(&Id::from("r3"), &Id::from("v1"))
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));

        let stale = backend.client_with_stale_token();
        let error = stale
            .delete_review(&Id::from("r3"), &Id::from("v1"))
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Unauthorized));
        assert!(!stale.session().is_logged_in().await);
        assert_eq!(backend.catalog().release("r3").unwrap().reviews.len(), 1);
    }
}
