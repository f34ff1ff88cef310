use super::*;

impl AccessWorkflowService {
    /// Returns one request by identifier.
    pub async fn get_request(&self, request_id: AccessRequestId) -> AppResult<AccessRequest> {
        self.ledger
            .find_request(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("access request '{request_id}' was not found"))
            })
    }

    /// Lists a user's requests, newest first.
    pub async fn list_requests_for_user(&self, user_id: UserId) -> AppResult<Vec<AccessRequest>> {
        self.resolve_user(user_id, "user").await?;

        self.ledger
            .list_requests(AccessRequestQuery {
                requester_id: Some(user_id),
                status: None,
            })
            .await
    }

    /// Lists requests in one status across all users, newest first.
    pub async fn list_requests_by_status(
        &self,
        status: AccessRequestStatus,
    ) -> AppResult<Vec<AccessRequest>> {
        self.ledger
            .list_requests(AccessRequestQuery {
                requester_id: None,
                status: Some(status),
            })
            .await
    }

    /// Returns one book by identifier.
    pub async fn get_book(&self, book_id: BookId) -> AppResult<Book> {
        self.resolve_book(book_id).await
    }
}
