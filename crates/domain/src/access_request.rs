//! Access request lifecycle.
//!
//! A request is created `Pending` and moves exactly once to `Approved` or
//! `Rejected`. Every other transition is rejected with `InvalidState`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use librarium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BookId, UserId};

/// Unique identifier for an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessRequestId(Uuid);

impl AccessRequestId {
    /// Creates a new random request identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a request identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccessRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccessRequestId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequestStatus {
    /// Waiting for a librarian decision.
    Pending,
    /// Approved; a permission was granted.
    Approved,
    /// Rejected with a stored reason.
    Rejected,
}

impl AccessRequestStatus {
    /// Returns the storage string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Resolves the status reached by applying a decision.
    pub fn transition(self, decision: &AccessDecision) -> AppResult<Self> {
        match (self, decision) {
            (Self::Pending, AccessDecision::Approve) => Ok(Self::Approved),
            (Self::Pending, AccessDecision::Reject { .. }) => Ok(Self::Rejected),
            (Self::Approved | Self::Rejected, _) => Err(AppError::InvalidState(
                "request already processed".to_owned(),
            )),
        }
    }
}

impl FromStr for AccessRequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown access request status '{value}'"
            ))),
        }
    }
}

/// Librarian decision applied to a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Grant access.
    Approve,
    /// Deny access. The reason is stored verbatim, empty included.
    Reject {
        /// Text shown to the requester.
        reason: String,
    },
}

impl AccessDecision {
    /// Builds a decision from transport-level fields.
    ///
    /// A missing rejection reason is recorded as an empty string.
    #[must_use]
    pub fn from_flag(approved: bool, rejection_reason: Option<String>) -> Self {
        if approved {
            Self::Approve
        } else {
            Self::Reject {
                reason: rejection_reason.unwrap_or_default(),
            }
        }
    }

    /// Returns whether this decision grants access.
    #[must_use]
    pub fn is_approval(&self) -> bool {
        matches!(self, Self::Approve)
    }
}

/// Stored shape of an access request, used to rehydrate from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequestParts {
    /// Request identifier.
    pub id: AccessRequestId,
    /// Requesting user.
    pub requester_id: UserId,
    /// Requested book.
    pub book_id: BookId,
    /// Current status.
    pub status: AccessRequestStatus,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
    /// Processing timestamp.
    pub processed_at: Option<DateTime<Utc>>,
    /// Processing librarian.
    pub processed_by: Option<UserId>,
    /// Requester justification.
    pub reason: String,
    /// Rejection text.
    pub rejection_reason: Option<String>,
}

/// One user's ask to access one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    id: AccessRequestId,
    requester_id: UserId,
    book_id: BookId,
    status: AccessRequestStatus,
    requested_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    processed_by: Option<UserId>,
    reason: String,
    rejection_reason: Option<String>,
}

impl AccessRequest {
    /// Creates a new pending request.
    #[must_use]
    pub fn submit(
        requester_id: UserId,
        book_id: BookId,
        reason: impl Into<String>,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccessRequestId::new(),
            requester_id,
            book_id,
            status: AccessRequestStatus::Pending,
            requested_at,
            processed_at: None,
            processed_by: None,
            reason: reason.into(),
            rejection_reason: None,
        }
    }

    /// Rehydrates a stored request, checking that its fields agree with its status.
    pub fn restore(parts: AccessRequestParts) -> AppResult<Self> {
        let processed = parts.processed_at.is_some() && parts.processed_by.is_some();
        let unprocessed = parts.processed_at.is_none() && parts.processed_by.is_none();

        let consistent = match parts.status {
            AccessRequestStatus::Pending => unprocessed && parts.rejection_reason.is_none(),
            AccessRequestStatus::Approved => processed && parts.rejection_reason.is_none(),
            AccessRequestStatus::Rejected => processed && parts.rejection_reason.is_some(),
        };

        if !consistent {
            return Err(AppError::Internal(format!(
                "stored access request '{}' is inconsistent with status '{}'",
                parts.id,
                parts.status.as_str()
            )));
        }

        Ok(Self {
            id: parts.id,
            requester_id: parts.requester_id,
            book_id: parts.book_id,
            status: parts.status,
            requested_at: parts.requested_at,
            processed_at: parts.processed_at,
            processed_by: parts.processed_by,
            reason: parts.reason,
            rejection_reason: parts.rejection_reason,
        })
    }

    /// Applies a librarian decision.
    ///
    /// Fails with `InvalidState` and leaves the request untouched when it was
    /// already processed.
    pub fn decide(
        &mut self,
        decision: AccessDecision,
        processor_id: UserId,
        processed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let next_status = self.status.transition(&decision)?;

        self.status = next_status;
        self.processed_by = Some(processor_id);
        self.processed_at = Some(processed_at);
        if let AccessDecision::Reject { reason } = decision {
            self.rejection_reason = Some(reason);
        }

        Ok(())
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> AccessRequestId {
        self.id
    }

    /// Returns the requesting user.
    #[must_use]
    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the requested book.
    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> AccessRequestStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Returns the processing timestamp, once processed.
    #[must_use]
    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Returns the processing librarian, once processed.
    #[must_use]
    pub fn processed_by(&self) -> Option<UserId> {
        self.processed_by
    }

    /// Returns the requester justification.
    #[must_use]
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Returns the rejection reason for rejected requests.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }
}
