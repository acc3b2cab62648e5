use studyquest_core::error::CoreError;
use studyquest_core::types::DbId;

/// Failure of a ledger operation. Every failure is scoped to one request.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid duration: {0} seconds (must be positive)")]
    InvalidDuration(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("User {0} not found")]
    UserNotFound(DbId),

    #[error("Quest {0} not found")]
    QuestNotFound(DbId),

    #[error("Activity {0} not found")]
    ActivityNotFound(DbId),

    #[error("Quest {0} has not been joined")]
    NotJoined(DbId),

    #[error("Quest {0} already joined")]
    AlreadyJoined(DbId),

    #[error("Reward for quest {0} already claimed")]
    AlreadyClaimed(DbId),

    #[error("Quest {quest_id} not complete: {progress_hours:.2} of {target_hours} hours")]
    QuestNotComplete {
        quest_id: DbId,
        progress_hours: f64,
        target_hours: f64,
    },

    /// The transaction could not commit. Opaque to business logic; never
    /// retried here.
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// How a caller should treat a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input. Surfaced verbatim, never retried.
    Validation,
    /// Definitive rejection of the current state.
    Conflict,
    NotFound,
    /// Generic failure; retry policy belongs to the transport layer.
    Storage,
}

impl LedgerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidDuration(_) | Self::Validation(_) => ErrorClass::Validation,
            Self::UsernameTaken(_)
            | Self::AlreadyJoined(_)
            | Self::AlreadyClaimed(_)
            | Self::QuestNotComplete { .. } => ErrorClass::Conflict,
            Self::UserNotFound(_)
            | Self::QuestNotFound(_)
            | Self::ActivityNotFound(_)
            | Self::NotJoined(_) => ErrorClass::NotFound,
            Self::Storage(_) => ErrorClass::Storage,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDuration(_) => "INVALID_DURATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::QuestNotFound(_) => "QUEST_NOT_FOUND",
            Self::ActivityNotFound(_) => "ACTIVITY_NOT_FOUND",
            Self::NotJoined(_) => "NOT_JOINED",
            Self::AlreadyJoined(_) => "ALREADY_JOINED",
            Self::AlreadyClaimed(_) => "ALREADY_CLAIMED",
            Self::QuestNotComplete { .. } => "QUEST_NOT_COMPLETE",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_taxonomy() {
        assert_eq!(LedgerError::InvalidDuration(0).class(), ErrorClass::Validation);
        assert_eq!(LedgerError::AlreadyJoined(1).class(), ErrorClass::Conflict);
        assert_eq!(LedgerError::AlreadyClaimed(1).class(), ErrorClass::Conflict);
        assert_eq!(
            LedgerError::QuestNotComplete {
                quest_id: 1,
                progress_hours: 1.0,
                target_hours: 4.0
            }
            .class(),
            ErrorClass::Conflict
        );
        assert_eq!(LedgerError::QuestNotFound(1).class(), ErrorClass::NotFound);
        assert_eq!(LedgerError::NotJoined(1).class(), ErrorClass::NotFound);
        assert_eq!(
            LedgerError::Storage(sqlx::Error::PoolTimedOut).class(),
            ErrorClass::Storage
        );
    }

    #[test]
    fn core_validation_keeps_message() {
        let err: LedgerError = CoreError::Validation("target_hours must be positive".into()).into();
        assert_eq!(err.to_string(), "Validation failed: target_hours must be positive");
    }
}
