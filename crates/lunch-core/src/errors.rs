use thiserror::Error;

/// Result type alias using LunchError
pub type Result<T> = std::result::Result<T, LunchError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error that crosses a crate boundary is classified by one of these
/// kinds. Each kind maps to a stable code usable by callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidRating,
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidRating => "ERR_INVALID_RATING",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional operation and entity context.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for lunch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LunchError {
    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: i64 },

    #[error("Meal not found: {meal_id}")]
    MealNotFound { meal_id: i64 },

    #[error("Record not found: {record_id}")]
    RecordNotFound { record_id: i64 },

    #[error("Transaction not found: {transaction_id}")]
    TransactionNotFound { transaction_id: i64 },

    /// Score outside 1..=5 or not a finite number
    #[error("Rating must be between 1 and 5, got {score}")]
    InvalidRating { score: f64 },

    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    #[error("Invalid price: {price}")]
    InvalidPrice { price: f64 },

    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Invalid order status: {value}")]
    InvalidStatus { value: String },

    /// Patch referenced a column the table does not have
    #[error("Unknown column '{column}' for table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid value for {column}: {reason}")]
    InvalidField { column: String, reason: String },

    #[error("No meals selected")]
    EmptyOrder,

    #[error("Menu contains no meals")]
    EmptyMenu,

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<LunchError> for ExError {
    fn from(err: LunchError) -> Self {
        let message = err.to_string();
        match err {
            LunchError::StudentNotFound { student_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(student_id.to_string())
                .with_message(message),
            LunchError::MealNotFound { meal_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(meal_id.to_string())
                .with_message(message),
            LunchError::RecordNotFound { record_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(record_id.to_string())
                .with_message(message),
            LunchError::TransactionNotFound { transaction_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(transaction_id.to_string())
                    .with_message(message)
            }
            LunchError::InvalidRating { .. } => {
                ExError::new(ExErrorKind::InvalidRating).with_message(message)
            }
            LunchError::InvalidName { .. }
            | LunchError::InvalidPrice { .. }
            | LunchError::InvalidQuantity { .. }
            | LunchError::InvalidDate { .. }
            | LunchError::InvalidStatus { .. }
            | LunchError::UnknownColumn { .. }
            | LunchError::InvalidField { .. }
            | LunchError::EmptyOrder
            | LunchError::EmptyMenu => ExError::new(ExErrorKind::InvalidInput).with_message(message),
            LunchError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            LunchError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

impl From<serde_json::Error> for LunchError {
    fn from(err: serde_json::Error) -> Self {
        LunchError::Serialization {
            message: err.to_string(),
        }
    }
}
