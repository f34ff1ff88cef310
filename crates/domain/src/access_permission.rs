use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BookId, UserId};

/// Unique identifier for an access permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessPermissionId(Uuid);

impl AccessPermissionId {
    /// Creates a new random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
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

impl Default for AccessPermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccessPermissionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Standing grant of access to one book for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPermission {
    id: AccessPermissionId,
    grantee_id: UserId,
    book_id: BookId,
    granted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl AccessPermission {
    /// Creates an active, non-expiring grant.
    #[must_use]
    pub fn grant(grantee_id: UserId, book_id: BookId, granted_at: DateTime<Utc>) -> Self {
        Self {
            id: AccessPermissionId::new(),
            grantee_id,
            book_id,
            granted_at,
            expires_at: None,
            is_active: true,
        }
    }

    /// Rehydrates a stored permission.
    #[must_use]
    pub fn restore(
        id: AccessPermissionId,
        grantee_id: UserId,
        book_id: BookId,
        granted_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            grantee_id,
            book_id,
            granted_at,
            expires_at,
            is_active,
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> AccessPermissionId {
        self.id
    }

    /// Returns the user holding the grant.
    #[must_use]
    pub fn grantee_id(&self) -> UserId {
        self.grantee_id
    }

    /// Returns the granted book.
    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Returns the grant timestamp.
    #[must_use]
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }

    /// Returns the optional expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the active flag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}
