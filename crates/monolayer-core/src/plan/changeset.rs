use serde::{Deserialize, Serialize};

use super::action::Action;
use super::op_kind::OpKind;
use super::warning::Warning;

/// One ordered unit of a changeset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOp {
    pub kind: OpKind,
    pub priority: u32,
    /// Table name the operation addresses when it runs
    pub table_name: String,
    /// Post-migration table name
    pub current_table_name: String,
    pub up: Vec<Action>,
    /// Empty when undoing `up` needs no step of its own
    pub down: Vec<Action>,
    pub warnings: Vec<Warning>,
}

/// Ordered, immutable result of one planning run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Changeset {
    pub schema: String,
    pub operations: Vec<MigrationOp>,
}

impl Changeset {
    /// Build a changeset, ordering operations by priority.
    ///
    /// The sort is stable: operations of equal priority keep their input
    /// order.
    pub fn new(schema: impl Into<String>, mut operations: Vec<MigrationOp>) -> Self {
        operations.sort_by_key(|op| op.priority);
        Self {
            schema: schema.into(),
            operations,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn kinds(&self) -> Vec<OpKind> {
        self.operations.iter().map(|op| op.kind).collect()
    }

    /// All warnings in operation order
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.operations.iter().flat_map(|op| op.warnings.iter())
    }

    /// Forward steps in execution order
    pub fn up_actions(&self) -> impl Iterator<Item = &Action> {
        self.operations.iter().flat_map(|op| op.up.iter())
    }

    /// Rollback steps: operations in reverse, each with its own down list
    pub fn down_actions(&self) -> impl Iterator<Item = &Action> {
        self.operations.iter().rev().flat_map(|op| op.down.iter())
    }

    /// Markdown review summary
    pub fn render_summary(&self) -> String {
        super::summary::render_summary(self)
    }
}
