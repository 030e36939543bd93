use sea_orm::error::{DbErr, SqlErr};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[source] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppError = ServiceError;

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::from_db(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Classifies a store error into the constraint taxonomy.
    ///
    /// Unique and foreign-key violations come from sea-orm's driver-aware
    /// [`SqlErr`]; check and not-null violations are recognised by the
    /// messages SQLite, PostgreSQL and MySQL emit for them.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::ForeignKeyViolation(msg)
            }
            _ => {
                let msg = err.to_string();
                if is_constraint_message(&msg) {
                    warn!(error = %msg, "store rejected write");
                    ServiceError::ConstraintViolation(msg)
                } else {
                    ServiceError::DatabaseError(err)
                }
            }
        }
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }

    /// True for any error raised by a store-side integrity rule.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            ServiceError::Conflict(_)
                | ServiceError::ForeignKeyViolation(_)
                | ServiceError::ConstraintViolation(_)
        )
    }
}

fn is_constraint_message(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    lower.contains("check constraint")
        || lower.contains("not null constraint")
        || lower.contains("not-null constraint")
        || lower.contains("cannot be null")
}
