//! Schema difference types.
//!
//! A [`Difference`] is one structural fact about how the declared schema
//! departs from the current one. Differences carry no priority or action
//! text; the planner decides both.
//!
//! Table-scoped differences name the table by its declared (post-rename)
//! physical name. Object names are the physical names derived by
//! [`crate::fingerprint`].

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnType;
use crate::model::{Check, Column, ForeignKey, Identity, Index, PrimaryKey, Table, Unique};

/// One structural delta between current and declared schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    /// Declared table with no current counterpart; its constraints and
    /// indexes follow as separate `*Added` differences
    TableCreated { table: Table },
    /// Current table with no declared counterpart
    TableDropped { table: Table },
    TableRenamed { from: String, to: String },

    ColumnAdded { table: String, column: Column },
    ColumnDropped { table: String, column: Column },
    ColumnRenamed {
        table: String,
        from: String,
        to: String,
    },
    ColumnRetyped {
        table: String,
        column: String,
        from: ColumnType,
        to: ColumnType,
    },
    ColumnNullabilityChanged {
        table: String,
        column: String,
        /// Effective not-null of the declared column
        not_null: bool,
        /// Relaxation caused only by leaving the primary key
        implied_by_primary_key: bool,
    },
    ColumnDefaultChanged {
        table: String,
        column: String,
        /// Formatted default text
        from: Option<String>,
        to: Option<String>,
    },
    ColumnIdentityChanged {
        table: String,
        column: String,
        from: Option<Identity>,
        to: Option<Identity>,
        /// The column gains identity while nullable; not-null is set as part
        /// of this change instead of a separate nullability difference
        #[serde(default)]
        sets_not_null: bool,
    },

    PrimaryKeyAdded {
        table: String,
        primary_key: PrimaryKey,
        existing_table: bool,
    },
    PrimaryKeyDropped {
        table: String,
        primary_key: PrimaryKey,
    },
    PrimaryKeyRenamed {
        table: String,
        from_name: String,
        to_name: String,
    },

    UniqueAdded {
        table: String,
        unique: Unique,
        existing_table: bool,
    },
    UniqueDropped {
        table: String,
        unique: Unique,
        name: String,
    },
    UniqueRenamed {
        table: String,
        from_name: String,
        to_name: String,
    },

    CheckAdded {
        table: String,
        check: Check,
        existing_table: bool,
    },
    CheckDropped {
        table: String,
        check: Check,
        name: String,
    },
    CheckRenamed {
        table: String,
        from_name: String,
        to_name: String,
    },

    ForeignKeyAdded {
        table: String,
        foreign_key: ForeignKey,
        existing_table: bool,
    },
    ForeignKeyDropped {
        table: String,
        foreign_key: ForeignKey,
        name: String,
    },
    ForeignKeyRenamed {
        table: String,
        from_name: String,
        to_name: String,
    },

    IndexAdded {
        table: String,
        index: Index,
        existing_table: bool,
    },
    IndexDropped {
        table: String,
        index: Index,
        name: String,
    },
    IndexRenamed {
        table: String,
        from_name: String,
        to_name: String,
    },
}

impl Difference {
    /// Declared name of the table the difference belongs to; for dropped
    /// tables the current name
    pub fn table(&self) -> &str {
        match self {
            Difference::TableCreated { table } | Difference::TableDropped { table } => &table.name,
            Difference::TableRenamed { to, .. } => to,
            Difference::ColumnAdded { table, .. }
            | Difference::ColumnDropped { table, .. }
            | Difference::ColumnRenamed { table, .. }
            | Difference::ColumnRetyped { table, .. }
            | Difference::ColumnNullabilityChanged { table, .. }
            | Difference::ColumnDefaultChanged { table, .. }
            | Difference::ColumnIdentityChanged { table, .. }
            | Difference::PrimaryKeyAdded { table, .. }
            | Difference::PrimaryKeyDropped { table, .. }
            | Difference::PrimaryKeyRenamed { table, .. }
            | Difference::UniqueAdded { table, .. }
            | Difference::UniqueDropped { table, .. }
            | Difference::UniqueRenamed { table, .. }
            | Difference::CheckAdded { table, .. }
            | Difference::CheckDropped { table, .. }
            | Difference::CheckRenamed { table, .. }
            | Difference::ForeignKeyAdded { table, .. }
            | Difference::ForeignKeyDropped { table, .. }
            | Difference::ForeignKeyRenamed { table, .. }
            | Difference::IndexAdded { table, .. }
            | Difference::IndexDropped { table, .. }
            | Difference::IndexRenamed { table, .. } => table,
        }
    }

    /// Stable snake_case label, as serialized in the `kind` tag
    pub fn label(&self) -> &'static str {
        match self {
            Difference::TableCreated { .. } => "table_created",
            Difference::TableDropped { .. } => "table_dropped",
            Difference::TableRenamed { .. } => "table_renamed",
            Difference::ColumnAdded { .. } => "column_added",
            Difference::ColumnDropped { .. } => "column_dropped",
            Difference::ColumnRenamed { .. } => "column_renamed",
            Difference::ColumnRetyped { .. } => "column_retyped",
            Difference::ColumnNullabilityChanged { .. } => "column_nullability_changed",
            Difference::ColumnDefaultChanged { .. } => "column_default_changed",
            Difference::ColumnIdentityChanged { .. } => "column_identity_changed",
            Difference::PrimaryKeyAdded { .. } => "primary_key_added",
            Difference::PrimaryKeyDropped { .. } => "primary_key_dropped",
            Difference::PrimaryKeyRenamed { .. } => "primary_key_renamed",
            Difference::UniqueAdded { .. } => "unique_added",
            Difference::UniqueDropped { .. } => "unique_dropped",
            Difference::UniqueRenamed { .. } => "unique_renamed",
            Difference::CheckAdded { .. } => "check_added",
            Difference::CheckDropped { .. } => "check_dropped",
            Difference::CheckRenamed { .. } => "check_renamed",
            Difference::ForeignKeyAdded { .. } => "foreign_key_added",
            Difference::ForeignKeyDropped { .. } => "foreign_key_dropped",
            Difference::ForeignKeyRenamed { .. } => "foreign_key_renamed",
            Difference::IndexAdded { .. } => "index_added",
            Difference::IndexDropped { .. } => "index_dropped",
            Difference::IndexRenamed { .. } => "index_renamed",
        }
    }
}

/// All differences of one comparison, in deterministic order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDiff {
    pub differences: Vec<Difference>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    /// Table renames as `(previous, declared)` pairs
    pub fn table_renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.differences.iter().filter_map(|d| match d {
            Difference::TableRenamed { from, to } => Some((from.as_str(), to.as_str())),
            _ => None,
        })
    }
}
