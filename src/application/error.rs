//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution:
//! business rule violations, storage failures and backend API failures.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)         - Business rule violations
//! ├── Repository(RepositoryError) - Storage failures
//! ├── Api(ApiError)               - Backend transport and status errors
//! ├── Validation(String)          - Input validation failures
//! ├── NotFound { .. }             - Resource not found
//! ├── Conflict(String)            - Uniqueness violations
//! ├── Unauthorized                - Authorization failures
//! ├── Configuration(String)       - Invalid settings
//! └── Internal(String)
//! ```
//!
//! [`ApplicationError::user_message`] turns any of these into the text shown
//! to an end user.
//!
//! # Examples
//!
//! ```
//! use echange_core::application::error::ApplicationError;
//! use echange_core::infrastructure::persistence::RepositoryError;
//!
//! let err = ApplicationError::not_found("Echange", "ech-123");
//! assert!(err.is_not_found());
//!
//! let err: ApplicationError = RepositoryError::duplicate("Echange", "ECH-1").into();
//! assert!(err.is_conflict());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::api::error::ApiError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Banner text used when no more specific message applies.
pub const GENERIC_USER_MESSAGE: &str = "L'opération a échoué";

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Storage error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Backend API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// The request conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication or authorization failure.
    #[error("unauthorized")]
    Unauthorized,

    /// Settings could not be loaded or are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Repository(e) => e.is_not_found(),
            Self::Api(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) | Self::Api(ApiError::Domain(e)) => e.is_validation(),
            _ => false,
        }
    }

    /// Returns true if the exchange's current status forbids the operation.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        match self {
            Self::Domain(e) | Self::Api(ApiError::Domain(e)) => e.is_state_error(),
            _ => false,
        }
    }

    /// Returns true if this is a uniqueness or concurrent-modification
    /// conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict(_) => true,
            Self::Repository(e) => e.is_duplicate() || e.is_version_conflict(),
            Self::Api(e) => e.status() == Some(409),
            _ => false,
        }
    }

    /// Returns true if this is an authorization error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Domain(DomainError::Unauthorized(_))
                | Self::Api(ApiError::Unauthorized(_))
        )
    }

    /// Human-readable text for an error banner.
    ///
    /// Validation failures list their violations and server errors show the
    /// server's message. Anything without a useful message falls back to
    /// [`GENERIC_USER_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(e) | Self::Api(ApiError::Domain(e)) => domain_message(e),
            Self::Validation(message) | Self::Conflict(message) => non_blank(message),
            Self::NotFound { .. } => "Élément introuvable".to_string(),
            Self::Unauthorized | Self::Api(ApiError::Unauthorized(_)) => {
                "Vous n'êtes pas autorisé à effectuer cette action".to_string()
            }
            Self::Repository(RepositoryError::NotFound { .. })
            | Self::Api(ApiError::NotFound(_)) => "Élément introuvable".to_string(),
            Self::Repository(RepositoryError::Duplicate { .. }) => {
                "Cet élément existe déjà".to_string()
            }
            Self::Repository(RepositoryError::VersionConflict { .. }) => {
                "Cet élément a été modifié entre-temps, veuillez recharger".to_string()
            }
            Self::Api(ApiError::Http { message, .. }) => non_blank(message),
            Self::Api(ApiError::Timeout(_)) => {
                "Le serveur ne répond pas, veuillez réessayer".to_string()
            }
            Self::Api(ApiError::Connection(_)) => "Impossible de joindre le serveur".to_string(),
            _ => GENERIC_USER_MESSAGE.to_string(),
        }
    }
}

fn non_blank(message: &str) -> String {
    if message.trim().is_empty() {
        GENERIC_USER_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

fn domain_message(error: &DomainError) -> String {
    match error {
        DomainError::Validation(violations) if !violations.is_empty() => violations.join(" ; "),
        DomainError::OutOfRange { message, .. } => non_blank(message),
        DomainError::Unauthorized(_) => {
            "Vous n'êtes pas autorisé à effectuer cette action".to_string()
        }
        e if e.is_state_error() => {
            "Cette action n'est pas possible dans l'état actuel de l'échange".to_string()
        }
        _ => GENERIC_USER_MESSAGE.to_string(),
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EchangeStatut;

    #[test]
    fn application_error_validation() {
        let err = ApplicationError::validation("titre requis");
        assert!(err.to_string().contains("titre requis"));
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn application_error_not_found() {
        let err = ApplicationError::not_found("Echange", "ech-123");
        assert!(err.to_string().contains("Echange"));
        assert!(err.to_string().contains("ech-123"));
        assert!(err.is_not_found());
    }

    #[test]
    fn application_error_from_domain_error() {
        let err: ApplicationError = DomainError::InvalidStateTransition {
            from: EchangeStatut::Brouillon,
            to: EchangeStatut::Finalise,
        }
        .into();
        assert!(err.is_state_error());
        assert!(err.to_string().contains("domain error"));
    }

    #[test]
    fn application_error_from_repository_error() {
        let err: ApplicationError = RepositoryError::not_found("Echange", "ech-123").into();
        assert!(err.is_not_found());
        let err: ApplicationError = RepositoryError::connection("refused").into();
        assert!(matches!(
            err,
            ApplicationError::Repository(RepositoryError::Connection(_))
        ));
        assert!(!err.is_not_found());
        let err: ApplicationError =
            RepositoryError::version_conflict("Echange", "ech-123", 4, 5).into();
        assert!(err.is_conflict());
        assert_eq!(
            err.user_message(),
            "Cet élément a été modifié entre-temps, veuillez recharger"
        );
    }

    #[test]
    fn application_error_from_api_error() {
        let err: ApplicationError = ApiError::http(409, "Référence déjà utilisée").into();
        assert!(err.is_conflict());
        let err: ApplicationError = ApiError::timeout("5000ms").into();
        assert!(matches!(err, ApplicationError::Api(ApiError::Timeout(_))));
        let err: ApplicationError = ApiError::unauthorized("token expiré").into();
        assert!(err.is_unauthorized());
    }

    mod user_message {
        use super::*;

        #[test]
        fn lists_violations() {
            let err: ApplicationError = DomainError::Validation(vec![
                "Le titre est requis".into(),
                "La description est requise".into(),
            ])
            .into();
            assert_eq!(
                err.user_message(),
                "Le titre est requis ; La description est requise"
            );
        }

        #[test]
        fn shows_server_message() {
            let err: ApplicationError = ApiError::http(422, "Titre trop court").into();
            assert_eq!(err.user_message(), "Titre trop court");
        }

        #[test]
        fn state_errors_are_explained() {
            let err: ApplicationError = DomainError::IncompatibleState {
                operation: "update",
                statut: EchangeStatut::Publie,
            }
            .into();
            assert!(err.user_message().contains("état actuel"));
        }

        #[test]
        fn falls_back_to_generic_text() {
            assert_eq!(
                ApplicationError::internal("boom").user_message(),
                GENERIC_USER_MESSAGE
            );
            let err: ApplicationError = ApiError::http(500, "   ").into();
            assert_eq!(err.user_message(), GENERIC_USER_MESSAGE);
            let err: ApplicationError = ApiError::decode("eof").into();
            assert_eq!(err.user_message(), GENERIC_USER_MESSAGE);
        }
    }
}
