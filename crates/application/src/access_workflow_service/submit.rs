use super::*;

impl AccessWorkflowService {
    /// Submits a new pending request for a (requester, book) pair.
    ///
    /// Fails with `Conflict` when the requester already has access or already
    /// has a pending request for the book.
    pub async fn submit(&self, input: SubmitAccessRequestInput) -> AppResult<AccessRequest> {
        let requester = self.resolve_user(input.requester_id, "user").await?;
        let book = self.resolve_book(input.book_id).await?;

        let mut unit = self.ledger.begin().await?;
        unit.lock_pair(requester.id(), book.id()).await?;

        if unit
            .find_active_permission(requester.id(), book.id())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already has access to book '{}'",
                requester.id(),
                book.id()
            )));
        }

        if unit
            .find_pending_request(requester.id(), book.id())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already has a pending request for book '{}'",
                requester.id(),
                book.id()
            )));
        }

        let request = AccessRequest::submit(requester.id(), book.id(), input.reason, Utc::now());
        unit.save_request(&request).await?;
        unit.commit().await?;

        Ok(request)
    }
}
