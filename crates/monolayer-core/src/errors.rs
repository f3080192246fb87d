use monolayer_core_types::RunId;
use thiserror::Error;

/// Result type alias using PlanError
pub type Result<T> = std::result::Result<T, PlanError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfig,
    IdentifierCollision,
    DuplicateObject,
    InvalidDeclaration,
    InvalidTypeParameter,
    UnknownReference,
    InvalidDefault,

    // Consistency
    StaleRenameHint,
    ConflictingRenameHint,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::IdentifierCollision => "ERR_IDENTIFIER_COLLISION",
            ExErrorKind::DuplicateObject => "ERR_DUPLICATE_OBJECT",
            ExErrorKind::InvalidDeclaration => "ERR_INVALID_DECLARATION",
            ExErrorKind::InvalidTypeParameter => "ERR_INVALID_TYPE_PARAMETER",
            ExErrorKind::UnknownReference => "ERR_UNKNOWN_REFERENCE",
            ExErrorKind::InvalidDefault => "ERR_INVALID_DEFAULT",
            ExErrorKind::StaleRenameHint => "ERR_STALE_RENAME_HINT",
            ExErrorKind::ConflictingRenameHint => "ERR_CONFLICTING_RENAME_HINT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the failure comes from stale external rename hints rather
    /// than from the declaration itself
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            ExErrorKind::StaleRenameHint | ExErrorKind::ConflictingRenameHint
        )
    }
}

/// Canonical structured error type
///
/// Classification plus the table/column context needed to fix a declaration.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    column: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            column: None,
            run_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add planning-run correlation
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add the conflicting names (identifier collisions, duplicate hints)
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the run id, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the conflicting names, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
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
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Fatal planning errors
///
/// A planning run that hits any of these yields no changeset at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    // ===== Configuration Errors =====
    /// Two declared identifiers translate to the same physical name
    #[error("Identifiers '{first}' and '{second}' both translate to '{physical}'{}", in_table(.table))]
    IdentifierCollision {
        /// `None` for table names, the owning table for column names
        table: Option<String>,
        first: String,
        second: String,
        physical: String,
    },

    #[error("Table '{table}' is declared more than once in schema '{schema}'")]
    DuplicateTable { schema: String, table: String },

    #[error("Column '{column}' is declared more than once in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Column '{table}.{column}' is missing type parameter '{parameter}'")]
    MissingTypeParameter {
        table: String,
        column: String,
        parameter: String,
    },

    #[error("Column '{table}.{column}' has an invalid type parameter: {reason}")]
    InvalidTypeParameter {
        table: String,
        column: String,
        reason: String,
    },

    #[error("Column '{table}.{column}' of type {data_type} cannot be an identity column")]
    IdentityNotAllowed {
        table: String,
        column: String,
        data_type: String,
    },

    /// Default or not-null set on a column whose type fixes them
    #[error("Column '{table}.{column}' of type {data_type} cannot set {attribute}")]
    FixedByType {
        table: String,
        column: String,
        data_type: String,
        attribute: String,
    },

    #[error("Identity column '{table}.{column}' cannot carry a default")]
    IdentityWithDefault { table: String, column: String },

    /// A constraint or index references a column absent from its table
    #[error("{object} on table '{table}' references unknown column '{column}'")]
    UnknownColumn {
        table: String,
        column: String,
        object: String,
    },

    #[error("Foreign key on table '{table}' references unknown table '{target_table}'")]
    UnknownForeignKeyTarget { table: String, target_table: String },

    #[error("Foreign key on table '{table}' maps {columns} column(s) onto {target_columns}")]
    ForeignKeyArity {
        table: String,
        columns: usize,
        target_columns: usize,
    },

    #[error("{object} on table '{table}' has no columns")]
    EmptyColumnList { table: String, object: String },

    #[error("Default of column '{table}.{column}' ({value_kind}) cannot be formatted as {data_type}")]
    InvalidDefault {
        table: String,
        column: String,
        data_type: String,
        value_kind: String,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Consistency Errors =====
    /// A rename hint names an object absent from the snapshot or declaration
    #[error("Stale {scope} rename hint '{from}' -> '{to}': {reason}")]
    StaleRenameHint {
        scope: String,
        from: String,
        to: String,
        reason: String,
    },

    /// An object is the source or target of more than one rename hint
    #[error("Conflicting {scope} rename hints for '{name}'")]
    ConflictingRenameHint { scope: String, name: String },
}

fn in_table(table: &Option<String>) -> String {
    match table {
        Some(t) => format!(" in table '{}'", t),
        None => String::new(),
    }
}

impl From<PlanError> for ExError {
    fn from(err: PlanError) -> Self {
        let message = err.to_string();
        match err {
            PlanError::IdentifierCollision {
                table,
                first,
                second,
                physical,
            } => {
                let ex = ExError::new(ExErrorKind::IdentifierCollision)
                    .with_candidates(vec![first, second])
                    .with_message(message);
                match table {
                    Some(t) => ex.with_table(t).with_column(physical),
                    None => ex.with_table(physical),
                }
            }

            PlanError::DuplicateTable { table, .. } => ExError::new(ExErrorKind::DuplicateObject)
                .with_table(table)
                .with_message(message),

            PlanError::DuplicateColumn { table, column } => {
                ExError::new(ExErrorKind::DuplicateObject)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            PlanError::MissingTypeParameter { table, column, .. }
            | PlanError::InvalidTypeParameter { table, column, .. } => {
                ExError::new(ExErrorKind::InvalidTypeParameter)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            PlanError::IdentityNotAllowed { table, column, .. }
            | PlanError::FixedByType { table, column, .. }
            | PlanError::IdentityWithDefault { table, column } => {
                ExError::new(ExErrorKind::InvalidDeclaration)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            PlanError::UnknownColumn { table, column, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            PlanError::UnknownForeignKeyTarget { table, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_table(table)
                    .with_message(message)
            }

            PlanError::ForeignKeyArity { table, .. } | PlanError::EmptyColumnList { table, .. } => {
                ExError::new(ExErrorKind::InvalidDeclaration)
                    .with_table(table)
                    .with_message(message)
            }

            PlanError::InvalidDefault { table, column, .. } => {
                ExError::new(ExErrorKind::InvalidDefault)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            PlanError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            PlanError::StaleRenameHint { from, to, .. } => {
                ExError::new(ExErrorKind::StaleRenameHint)
                    .with_candidates(vec![from, to])
                    .with_message(message)
            }

            PlanError::ConflictingRenameHint { name, .. } => {
                ExError::new(ExErrorKind::ConflictingRenameHint)
                    .with_candidates(vec![name])
                    .with_message(message)
            }
        }
    }
}

impl From<toml::de::Error> for PlanError {
    fn from(err: toml::de::Error) -> Self {
        PlanError::InvalidConfig {
            reason: err.message().to_string(),
        }
    }
}

/// Per-field validation failure from a compiled column validator
///
/// Never fatal to planning; returned to whoever is checking the value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("{field}: value is required")]
    Required { field: String },

    #[error("{field}: expected a non-null value")]
    NotNullable { field: String },

    /// Identity-always columns reject user values
    #[error("{field}: value is generated by the database and cannot be supplied")]
    NotAllowed { field: String, received: &'static str },

    #[error("{field}: expected {expected}, received {received}")]
    InvalidType {
        field: String,
        expected: String,
        received: &'static str,
    },

    #[error("{field}: expected {expected}, could not parse {received} input '{input}'")]
    Unparseable {
        field: String,
        expected: String,
        received: &'static str,
        input: String,
    },

    #[error("{field}: expected a value between {min} and {max}, received {received} {value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        received: &'static str,
        value: String,
    },

    #[error("{field}: expected at most {max_integer_digits} integer digit(s), received {received} {value}")]
    PrecisionExceeded {
        field: String,
        max_integer_digits: u32,
        received: &'static str,
        value: String,
    },

    #[error("{field}: expected at most {max_scale} fractional digit(s), received {received} {value}")]
    ScaleExceeded {
        field: String,
        max_scale: u32,
        received: &'static str,
        value: String,
    },

    #[error("{field}: expected at most {max_length} character(s), received {length}")]
    TooLong {
        field: String,
        max_length: u32,
        length: usize,
    },

    #[error("{field}: expected one of [{}], received '{value}'", .members.join(", "))]
    NotAMember {
        field: String,
        members: Vec<String>,
        value: String,
    },
}

impl ValueError {
    /// Name of the field the error is about
    pub fn field(&self) -> &str {
        match self {
            ValueError::Required { field }
            | ValueError::NotNullable { field }
            | ValueError::NotAllowed { field, .. }
            | ValueError::InvalidType { field, .. }
            | ValueError::Unparseable { field, .. }
            | ValueError::OutOfRange { field, .. }
            | ValueError::PrecisionExceeded { field, .. }
            | ValueError::ScaleExceeded { field, .. }
            | ValueError::TooLong { field, .. }
            | ValueError::NotAMember { field, .. } => field,
        }
    }
}
