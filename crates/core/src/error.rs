use crate::types::DbId;

/// Failure taxonomy shared by every catalog workflow and adapter.
///
/// Validation errors are raised locally before any network call. Upload,
/// store, auth and relay errors come back from adapters and are always
/// recoverable: callers keep user input intact and offer a retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Message relay failed: {0}")]
    RelayFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure was raised locally, before any adapter call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short message suitable for an error toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{entity} no longer exists"),
            Self::Validation(msg) => msg.clone(),
            Self::UploadFailed(_) => "Image upload failed. Please try again.".to_string(),
            Self::StoreUnavailable(_) => {
                "The catalog is unavailable right now. Please try again.".to_string()
            }
            Self::AuthFailed(msg) => msg.clone(),
            Self::RelayFailed(_) => "Oops! Something went wrong. Try again later.".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Photo",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: Photo with id 7");
    }

    #[test]
    fn only_validation_is_local() {
        assert!(CoreError::Validation("caption is required".into()).is_validation());
        assert!(!CoreError::UploadFailed("timeout".into()).is_validation());
        assert!(!CoreError::StoreUnavailable("down".into()).is_validation());
    }

    #[test]
    fn user_message_hides_transport_details() {
        let err = CoreError::StoreUnavailable("connection reset by peer".into());
        assert!(!err.user_message().contains("connection reset"));
    }
}
