use serde::{Deserialize, Serialize};
use std::fmt;

/// Migration operation kinds
///
/// Each kind owns a fixed priority band; ascending priority is execution
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    DropIndex,
    DropForeignKey,
    DropUnique,
    DropCheck,
    RenameTable,
    RenameColumn,
    DropTable,
    DropPrimaryKey,
    DropColumn,
    CreateTable,
    AddColumn,
    ChangeColumnType,
    ChangeColumnDefault,
    ChangeColumnIdentity,
    ChangeColumnNullability,
    CreatePrimaryKey,
    CreateIndex,
    CreateUnique,
    CreateCheck,
    CreateForeignKey,
    RenamePrimaryKey,
    RenameIndex,
    RenameForeignKey,
    RenameUnique,
    RenameCheck,
}

/// Priority at which a table rename runs; operations below it address the
/// previous table name
pub const RENAME_TABLE_PRIORITY: u32 = 900;

impl OpKind {
    pub const ALL: [OpKind; 25] = [
        OpKind::DropIndex,
        OpKind::DropForeignKey,
        OpKind::DropUnique,
        OpKind::DropCheck,
        OpKind::RenameTable,
        OpKind::RenameColumn,
        OpKind::DropTable,
        OpKind::DropPrimaryKey,
        OpKind::DropColumn,
        OpKind::CreateTable,
        OpKind::AddColumn,
        OpKind::ChangeColumnType,
        OpKind::ChangeColumnDefault,
        OpKind::ChangeColumnIdentity,
        OpKind::ChangeColumnNullability,
        OpKind::CreatePrimaryKey,
        OpKind::CreateIndex,
        OpKind::CreateUnique,
        OpKind::CreateCheck,
        OpKind::CreateForeignKey,
        OpKind::RenamePrimaryKey,
        OpKind::RenameIndex,
        OpKind::RenameForeignKey,
        OpKind::RenameUnique,
        OpKind::RenameCheck,
    ];

    pub const fn priority(&self) -> u32 {
        match self {
            OpKind::DropIndex => 800,
            OpKind::DropForeignKey => 810,
            OpKind::DropUnique => 811,
            OpKind::DropCheck => 812,
            OpKind::RenameTable => RENAME_TABLE_PRIORITY,
            OpKind::RenameColumn => 1000,
            OpKind::DropTable => 1002,
            OpKind::DropPrimaryKey => 1004,
            OpKind::DropColumn => 1005,
            OpKind::CreateTable => 2001,
            OpKind::AddColumn => 2003,
            OpKind::ChangeColumnType => 3001,
            OpKind::ChangeColumnDefault => 3005,
            OpKind::ChangeColumnIdentity => 3006,
            OpKind::ChangeColumnNullability => 3008,
            OpKind::CreatePrimaryKey => 4001,
            OpKind::CreateIndex => 4003,
            OpKind::CreateUnique => 4010,
            OpKind::CreateCheck => 4012,
            OpKind::CreateForeignKey => 4013,
            OpKind::RenamePrimaryKey => 5000,
            OpKind::RenameIndex => 5001,
            OpKind::RenameForeignKey => 5002,
            OpKind::RenameUnique => 5003,
            OpKind::RenameCheck => 5004,
        }
    }

    /// Whether the operation runs before the table rename
    pub const fn addresses_previous_table(&self) -> bool {
        self.priority() < RENAME_TABLE_PRIORITY
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpKind::DropIndex => "drop index",
            OpKind::DropForeignKey => "drop foreign key",
            OpKind::DropUnique => "drop unique constraint",
            OpKind::DropCheck => "drop check constraint",
            OpKind::RenameTable => "rename table",
            OpKind::RenameColumn => "rename column",
            OpKind::DropTable => "drop table",
            OpKind::DropPrimaryKey => "drop primary key",
            OpKind::DropColumn => "drop column",
            OpKind::CreateTable => "create table",
            OpKind::AddColumn => "add column",
            OpKind::ChangeColumnType => "change column type",
            OpKind::ChangeColumnDefault => "change column default",
            OpKind::ChangeColumnIdentity => "change column identity",
            OpKind::ChangeColumnNullability => "change column nullability",
            OpKind::CreatePrimaryKey => "create primary key",
            OpKind::CreateIndex => "create index",
            OpKind::CreateUnique => "create unique constraint",
            OpKind::CreateCheck => "create check constraint",
            OpKind::CreateForeignKey => "create foreign key",
            OpKind::RenamePrimaryKey => "rename primary key",
            OpKind::RenameIndex => "rename index",
            OpKind::RenameForeignKey => "rename foreign key",
            OpKind::RenameUnique => "rename unique constraint",
            OpKind::RenameCheck => "rename check constraint",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
