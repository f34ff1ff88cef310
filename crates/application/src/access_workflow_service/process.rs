use super::*;

impl AccessWorkflowService {
    /// Approves or rejects a pending request.
    ///
    /// The request transition, the granted permission (on approval) and the
    /// requester notification are written in that order and committed together.
    pub async fn process(&self, input: ProcessAccessRequestInput) -> AppResult<AccessRequest> {
        // Identity reads must not run while the unit holds a connection.
        let snapshot = self.get_request(input.request_id).await?;

        let processor = self.resolve_user(input.processor_id, "librarian").await?;
        if !processor.is_librarian() {
            return Err(AppError::Forbidden(format!(
                "user '{}' is not allowed to process access requests",
                processor.id()
            )));
        }
        let book = self.resolve_book(snapshot.book_id()).await?;

        let mut unit = self.ledger.begin().await?;
        let mut request = unit
            .find_request_for_update(input.request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "access request '{}' was not found",
                    input.request_id
                ))
            })?;
        if request.requester_id() != snapshot.requester_id()
            || request.book_id() != snapshot.book_id()
        {
            return Err(AppError::Internal(format!(
                "access request '{}' changed its user or book while being processed",
                request.id()
            )));
        }

        unit.lock_pair(request.requester_id(), request.book_id()).await?;

        let processed_at = Utc::now();
        let is_approval = input.decision.is_approval();
        request.decide(input.decision, processor.id(), processed_at)?;
        unit.save_request(&request).await?;

        if is_approval {
            if let Some(existing) = unit
                .find_active_permission(request.requester_id(), request.book_id())
                .await?
            {
                return Err(AppError::Internal(format!(
                    "active permission '{}' already exists for user '{}' and book '{}'",
                    existing.id(),
                    request.requester_id(),
                    request.book_id()
                )));
            }

            let permission =
                AccessPermission::grant(request.requester_id(), request.book_id(), processed_at);
            unit.save_permission(&permission).await?;
        }

        let notification =
            Notification::for_processed_request(&request, book.title(), processed_at)?;
        unit.save_notification(&notification).await?;
        unit.commit().await?;

        Ok(request)
    }
}
