//! Errors crossing the relationship manager boundary.
//!
//! [`DirectoryError`] is what the remote directory collaborator reports;
//! [`RelationError`] is what [`RelationshipManager`] operations return to the
//! interface layer.
//!
//! [`RelationshipManager`]: super::RelationshipManager
use thiserror::Error;

/// Failure reported by the remote directory collaborator.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory could not be reached at the transport layer.
    #[error("directory unreachable: {0}")]
    Unreachable(String),
    /// The directory answered and refused the request, optionally saying why.
    #[error("rejected by the directory{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected { detail: Option<String> },
}

impl DirectoryError {
    /// Message surfaced to the caller: the remote detail verbatim when the
    /// directory provided one, a generic description otherwise.
    pub fn into_message(self) -> String {
        match self {
            Self::Unreachable(message) => message,
            Self::Rejected {
                detail: Some(detail),
            } => detail,
            Self::Rejected { detail: None } => "rejected by the directory".to_string(),
        }
    }
}

/// Errors returned by relationship manager operations.
///
/// Rejections of business rules (duplicate link, unknown pair) are ordinary
/// values here, never panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelationError {
    /// A required identifier was missing. Detected before any directory call;
    /// corrected input is all that is needed to recover.
    #[error("company and category must both be selected")]
    InvalidRequest,
    /// A read failed. Any previously cached view is preserved.
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    /// The directory refused to create the link. Re-fetch before retrying.
    #[error("link failed: {0}")]
    LinkFailed(String),
    /// The directory refused to remove the link. Re-fetch before retrying.
    #[error("unlink failed: {0}")]
    UnlinkFailed(String),
}

impl RelationError {
    pub(crate) fn fetch(err: DirectoryError) -> Self {
        Self::FetchFailed(err.into_message())
    }

    pub(crate) fn link(err: DirectoryError) -> Self {
        Self::LinkFailed(err.into_message())
    }

    pub(crate) fn unlink(err: DirectoryError) -> Self {
        Self::UnlinkFailed(err.into_message())
    }
}

#[cfg(test)]
mod tests {
    use super::DirectoryError;

    #[test]
    fn remote_detail_is_kept_verbatim() {
        let err = DirectoryError::Rejected {
            detail: Some("already linked".to_string()),
        };
        assert_eq!(err.into_message(), "already linked");
    }

    #[test]
    fn missing_detail_falls_back_to_generic_message() {
        let err = DirectoryError::Rejected { detail: None };
        assert_eq!(err.into_message(), "rejected by the directory");
    }
}
