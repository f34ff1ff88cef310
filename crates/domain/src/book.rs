use librarium_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Creates a new random book identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a book identifier from an existing UUID value.
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

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Protected library resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    title: NonEmptyString,
    author: String,
    description: String,
    resource_url: Option<String>,
}

impl Book {
    /// Creates a book with a validated title.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
        resource_url: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            title: NonEmptyString::new(title)?,
            author: author.into(),
            description: description.into(),
            resource_url,
        })
    }

    /// Returns the book identifier.
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Returns the title used in outcome messages.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the author line.
    #[must_use]
    pub fn author(&self) -> &str {
        self.author.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the location of the protected content.
    #[must_use]
    pub fn resource_url(&self) -> Option<&str> {
        self.resource_url.as_deref()
    }
}
