//! Difference → migration operation conversion.
//!
//! Each [`Difference`] becomes exactly one [`MigrationOp`]. Table naming
//! follows the band table: operations that run before the table rename
//! address the previous table name, the rest address the declared name.

use std::collections::BTreeMap;

use super::action::{invert, Action, ColumnDefinition};
use super::changeset::{Changeset, MigrationOp};
use super::op_kind::OpKind;
use super::warning::Warning;
use crate::diff::{Difference, SchemaDiff};
use crate::errors::Result;
use crate::fingerprint::{constraint_name, index_name, primary_key_name};
use crate::model::{Column, Constraint, PrimaryKey, Table};

/// Convert a schema diff into an ordered changeset.
///
/// `schema` is the database schema name carried in warning payloads.
///
/// # Errors
///
/// `InvalidDefault` when a column default cannot be formatted for its type.
pub fn plan(diff: &SchemaDiff, schema: &str) -> Result<Changeset> {
    let mut planner = Planner::new(diff, schema);
    for difference in &diff.differences {
        planner.plan_difference(difference)?;
    }
    Ok(Changeset::new(schema, planner.ops))
}

struct Planner<'a> {
    schema: &'a str,
    /// declared table -> previous table
    previous_tables: BTreeMap<&'a str, &'a str>,
    /// declared table -> (previous column -> declared column)
    column_renames: BTreeMap<&'a str, BTreeMap<&'a str, &'a str>>,
    ops: Vec<MigrationOp>,
}

impl<'a> Planner<'a> {
    fn new(diff: &'a SchemaDiff, schema: &'a str) -> Self {
        let previous_tables = diff.table_renames().map(|(from, to)| (to, from)).collect();
        let mut column_renames: BTreeMap<&str, BTreeMap<&str, &str>> = BTreeMap::new();
        for difference in &diff.differences {
            if let Difference::ColumnRenamed { table, from, to } = difference {
                column_renames
                    .entry(table.as_str())
                    .or_default()
                    .insert(from.as_str(), to.as_str());
            }
        }
        Self {
            schema,
            previous_tables,
            column_renames,
            ops: Vec::new(),
        }
    }

    fn previous_table(&self, declared: &'a str) -> &'a str {
        self.previous_tables.get(declared).copied().unwrap_or(declared)
    }

    /// Table name an operation of `kind` addresses
    fn address(&self, kind: OpKind, declared: &'a str) -> String {
        if kind == OpKind::RenameTable || kind.addresses_previous_table() {
            self.previous_table(declared).to_string()
        } else {
            declared.to_string()
        }
    }

    /// Column names as they stand after column renames
    fn renamed_columns(&self, declared_table: &str, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|c| {
                self.column_renames
                    .get(declared_table)
                    .and_then(|renames| renames.get(c.as_str()))
                    .map_or_else(|| c.clone(), |to| to.to_string())
            })
            .collect()
    }

    fn push(&mut self, kind: OpKind, table: &'a str, up: Vec<Action>, warnings: Vec<Warning>) {
        let down = invert(&up);
        self.push_with_down(kind, table, up, down, warnings);
    }

    fn push_with_down(
        &mut self,
        kind: OpKind,
        table: &'a str,
        up: Vec<Action>,
        down: Vec<Action>,
        warnings: Vec<Warning>,
    ) {
        self.ops.push(MigrationOp {
            kind,
            priority: kind.priority(),
            table_name: self.address(kind, table),
            current_table_name: table.to_string(),
            up,
            down,
            warnings,
        });
    }

    fn plan_difference(&mut self, difference: &'a Difference) -> Result<()> {
        let schema = self.schema.to_string();
        match difference {
            Difference::TableCreated { table } => {
                let columns = table
                    .columns
                    .iter()
                    .map(|c| ColumnDefinition::from_column(&table.name, c, table.in_primary_key(&c.name)))
                    .collect::<Result<Vec<_>>>()?;
                let up = vec![Action::CreateTable {
                    table: table.name.clone(),
                    columns,
                }];
                self.push(OpKind::CreateTable, &table.name, up, Vec::new());
            }
            Difference::TableDropped { table } => {
                // Outgoing foreign keys go first so that dropped tables
                // referencing each other can be dropped in any order
                for fk in &table.foreign_keys {
                    let constraint = Constraint::ForeignKey(fk.clone());
                    let name = constraint_name(&table.name, &constraint);
                    self.drop_constraint(OpKind::DropForeignKey, &table.name, &name, constraint);
                }
                let up = drop_table_actions(table)?;
                let warnings = vec![Warning::TableDrop {
                    schema,
                    table: table.name.clone(),
                }];
                self.push(OpKind::DropTable, &table.name, up, warnings);
            }
            Difference::TableRenamed { from, to } => {
                let up = vec![Action::RenameTable {
                    from: from.clone(),
                    to: to.clone(),
                }];
                let warnings = vec![Warning::TableRename {
                    schema,
                    from: from.clone(),
                    to: to.clone(),
                }];
                self.push(OpKind::RenameTable, to, up, warnings);
            }

            Difference::ColumnAdded { table, column } => {
                let definition = ColumnDefinition::from_column(table, column, false)?;
                let mut warnings = Vec::new();
                if definition.not_null && !column.has_implicit_value() {
                    warnings.push(Warning::AddNonNullableColumn {
                        schema,
                        table: table.clone(),
                        column: column.name.clone(),
                    });
                }
                let up = vec![Action::AddColumn {
                    table: table.clone(),
                    column: definition,
                }];
                self.push(OpKind::AddColumn, table, up, warnings);
            }
            Difference::ColumnDropped { table, column } => {
                let up = vec![Action::DropColumn {
                    table: self.address(OpKind::DropColumn, table),
                    column: dropped_column(table, column)?,
                }];
                let warnings = vec![Warning::ColumnDrop {
                    schema,
                    table: table.clone(),
                    column: column.name.clone(),
                }];
                self.push(OpKind::DropColumn, table, up, warnings);
            }
            Difference::ColumnRenamed { table, from, to } => {
                let up = vec![Action::RenameColumn {
                    table: table.clone(),
                    from: from.clone(),
                    to: to.clone(),
                }];
                let warnings = vec![Warning::ColumnRename {
                    schema,
                    table: table.clone(),
                    from: from.clone(),
                    to: to.clone(),
                }];
                self.push(OpKind::RenameColumn, table, up, warnings);
            }
            Difference::ColumnRetyped {
                table,
                column,
                from,
                to,
            } => {
                let (from, to) = (from.type_name(), to.type_name());
                let warnings = vec![Warning::ChangeColumnType {
                    schema,
                    table: table.clone(),
                    column: column.clone(),
                    from: from.clone(),
                    to: to.clone(),
                }];
                let up = vec![Action::AlterColumnType {
                    table: table.clone(),
                    column: column.clone(),
                    from,
                    to,
                }];
                self.push(OpKind::ChangeColumnType, table, up, warnings);
            }
            Difference::ColumnDefaultChanged {
                table,
                column,
                from,
                to,
            } => {
                let up = vec![Action::ChangeDefault {
                    table: table.clone(),
                    column: column.clone(),
                    from: from.clone(),
                    to: to.clone(),
                }];
                self.push(OpKind::ChangeColumnDefault, table, up, Vec::new());
            }
            Difference::ColumnIdentityChanged {
                table,
                column,
                from,
                to,
                sets_not_null,
            } => {
                let mut up = Vec::new();
                let mut warnings = Vec::new();
                if *sets_not_null {
                    up.push(Action::SetNotNull {
                        table: table.clone(),
                        column: column.clone(),
                    });
                    warnings.push(Warning::ChangeColumnToNonNullable {
                        schema,
                        table: table.clone(),
                        column: column.clone(),
                    });
                }
                up.push(Action::ChangeIdentity {
                    table: table.clone(),
                    column: column.clone(),
                    from: *from,
                    to: *to,
                });
                self.push(OpKind::ChangeColumnIdentity, table, up, warnings);
            }
            Difference::ColumnNullabilityChanged {
                table,
                column,
                not_null,
                implied_by_primary_key,
            } => {
                let kind = OpKind::ChangeColumnNullability;
                if *not_null {
                    let up = vec![Action::SetNotNull {
                        table: table.clone(),
                        column: column.clone(),
                    }];
                    let warnings = vec![Warning::ChangeColumnToNonNullable {
                        schema,
                        table: table.clone(),
                        column: column.clone(),
                    }];
                    self.push(kind, table, up, warnings);
                } else {
                    let up = vec![Action::DropNotNull {
                        table: table.clone(),
                        column: column.clone(),
                    }];
                    // Recreating the primary key restores not-null on rollback
                    let down = if *implied_by_primary_key {
                        Vec::new()
                    } else {
                        invert(&up)
                    };
                    self.push_with_down(kind, table, up, down, Vec::new());
                }
            }

            Difference::PrimaryKeyAdded {
                table,
                primary_key,
                existing_table,
            } => {
                let up = vec![Action::AddConstraint {
                    table: table.clone(),
                    name: primary_key_name(table),
                    constraint: Constraint::PrimaryKey(primary_key.clone()),
                }];
                let warnings = existing_table
                    .then(|| Warning::AddPrimaryKeyToExistingTable {
                        schema,
                        table: table.clone(),
                    })
                    .into_iter()
                    .collect();
                self.push(OpKind::CreatePrimaryKey, table, up, warnings);
            }
            Difference::PrimaryKeyDropped { table, primary_key } => {
                // Runs after the table and column renames; the name keeps the
                // previous table prefix
                let primary_key = PrimaryKey {
                    columns: self.renamed_columns(table, &primary_key.columns),
                };
                let up = vec![Action::DropConstraint {
                    table: table.clone(),
                    name: primary_key_name(self.previous_table(table)),
                    constraint: Constraint::PrimaryKey(primary_key),
                }];
                self.push(OpKind::DropPrimaryKey, table, up, Vec::new());
            }
            Difference::PrimaryKeyRenamed {
                table,
                from_name,
                to_name,
            } => {
                let up = vec![Action::RenameConstraint {
                    table: table.clone(),
                    from: from_name.clone(),
                    to: to_name.clone(),
                }];
                self.push(OpKind::RenamePrimaryKey, table, up, Vec::new());
            }

            Difference::UniqueAdded {
                table,
                unique,
                existing_table,
            } => {
                let warnings = existing_table
                    .then(|| Warning::AddUniqueToExistingTable {
                        schema,
                        table: table.clone(),
                    })
                    .into_iter()
                    .collect();
                self.add_constraint(
                    OpKind::CreateUnique,
                    table,
                    Constraint::Unique(unique.clone()),
                    warnings,
                );
            }
            Difference::UniqueDropped {
                table,
                unique,
                name,
            } => self.drop_constraint(
                OpKind::DropUnique,
                table,
                name,
                Constraint::Unique(unique.clone()),
            ),
            Difference::UniqueRenamed {
                table,
                from_name,
                to_name,
            } => self.rename_constraint(OpKind::RenameUnique, table, from_name, to_name),

            Difference::CheckAdded { table, check, .. } => self.add_constraint(
                OpKind::CreateCheck,
                table,
                Constraint::Check(check.clone()),
                Vec::new(),
            ),
            Difference::CheckDropped { table, check, name } => self.drop_constraint(
                OpKind::DropCheck,
                table,
                name,
                Constraint::Check(check.clone()),
            ),
            Difference::CheckRenamed {
                table,
                from_name,
                to_name,
            } => self.rename_constraint(OpKind::RenameCheck, table, from_name, to_name),

            Difference::ForeignKeyAdded {
                table,
                foreign_key,
                existing_table,
            } => {
                let warnings = existing_table
                    .then(|| Warning::AddForeignKeyToExistingTable {
                        schema,
                        table: table.clone(),
                    })
                    .into_iter()
                    .collect();
                self.add_constraint(
                    OpKind::CreateForeignKey,
                    table,
                    Constraint::ForeignKey(foreign_key.clone()),
                    warnings,
                );
            }
            Difference::ForeignKeyDropped {
                table,
                foreign_key,
                name,
            } => self.drop_constraint(
                OpKind::DropForeignKey,
                table,
                name,
                Constraint::ForeignKey(foreign_key.clone()),
            ),
            Difference::ForeignKeyRenamed {
                table,
                from_name,
                to_name,
            } => self.rename_constraint(OpKind::RenameForeignKey, table, from_name, to_name),

            Difference::IndexAdded { table, index, .. } => {
                let up = vec![Action::CreateIndex {
                    table: table.clone(),
                    name: index_name(table, index),
                    index: index.clone(),
                }];
                self.push(OpKind::CreateIndex, table, up, Vec::new());
            }
            Difference::IndexDropped { table, index, name } => {
                let up = vec![Action::DropIndex {
                    table: self.address(OpKind::DropIndex, table),
                    name: name.clone(),
                    index: index.clone(),
                }];
                self.push(OpKind::DropIndex, table, up, Vec::new());
            }
            Difference::IndexRenamed {
                table,
                from_name,
                to_name,
            } => {
                let up = vec![Action::RenameIndex {
                    table: table.clone(),
                    from: from_name.clone(),
                    to: to_name.clone(),
                }];
                self.push(OpKind::RenameIndex, table, up, Vec::new());
            }
        }
        Ok(())
    }

    fn add_constraint(
        &mut self,
        kind: OpKind,
        table: &'a str,
        constraint: Constraint,
        warnings: Vec<Warning>,
    ) {
        let up = vec![Action::AddConstraint {
            table: table.to_string(),
            name: constraint_name(table, &constraint),
            constraint,
        }];
        self.push(kind, table, up, warnings);
    }

    fn drop_constraint(&mut self, kind: OpKind, table: &'a str, name: &str, constraint: Constraint) {
        let up = vec![Action::DropConstraint {
            table: self.address(kind, table),
            name: name.to_string(),
            constraint,
        }];
        self.push(kind, table, up, Vec::new());
    }

    fn rename_constraint(&mut self, kind: OpKind, table: &'a str, from: &str, to: &str) {
        let up = vec![Action::RenameConstraint {
            table: table.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }];
        self.push(kind, table, up, Vec::new());
    }
}

fn dropped_column(table: &str, column: &Column) -> Result<ColumnDefinition> {
    // The primary key, if any, is dropped first
    ColumnDefinition::from_column(table, column, false)
}

/// Dependents first, then the table itself. Foreign keys are planned as
/// their own operations.
fn drop_table_actions(table: &Table) -> Result<Vec<Action>> {
    let name = &table.name;
    let mut up = Vec::new();
    for index in &table.indexes {
        up.push(Action::DropIndex {
            table: name.clone(),
            name: index_name(name, index),
            index: index.clone(),
        });
    }
    let constraints = table
        .checks
        .iter()
        .cloned()
        .map(Constraint::Check)
        .chain(table.uniques.iter().cloned().map(Constraint::Unique))
        .chain(table.primary_key.iter().cloned().map(Constraint::PrimaryKey));
    for constraint in constraints {
        up.push(Action::DropConstraint {
            table: name.clone(),
            name: constraint_name(name, &constraint),
            constraint,
        });
    }
    let columns = table
        .columns
        .iter()
        .map(|c| dropped_column(name, c))
        .collect::<Result<Vec<_>>>()?;
    up.push(Action::DropTable {
        table: name.clone(),
        columns,
    });
    Ok(up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnType;
    use crate::diff::compute_diff;
    use crate::model::{Index, RenameHints, Schema};

    fn books(name: &str) -> Table {
        Table::new(name)
            .column(Column::new("id", ColumnType::Integer))
            .column(Column::new("title", ColumnType::Text))
    }

    fn plan_for(declared: &Schema, current: &Schema, hints: &RenameHints) -> Changeset {
        let diff = compute_diff(declared, current, hints).unwrap();
        plan(&diff, "public").unwrap()
    }

    #[test]
    fn test_dropped_index_addresses_previous_table() {
        let current = Schema::new("public").table(books("books").index(Index::new(["title"])));
        let declared = Schema::new("public").table(books("publications"));
        let hints = RenameHints::new().rename_table("books", "publications");
        let cs = plan_for(&declared, &current, &hints);
        assert_eq!(cs.kinds(), vec![OpKind::DropIndex, OpKind::RenameTable]);
        let drop = &cs.operations[0];
        assert_eq!(drop.table_name, "books");
        assert_eq!(drop.current_table_name, "publications");
        assert_eq!(drop.up[0].table(), "books");
        let rename = &cs.operations[1];
        assert_eq!(rename.table_name, "books");
        assert_eq!(rename.current_table_name, "publications");
    }

    #[test]
    fn test_implied_relaxation_has_empty_down() {
        let current = Schema::new("public").table(books("books").primary_key(["id"]));
        let declared = Schema::new("public").table(books("books"));
        let cs = plan_for(&declared, &current, &RenameHints::new());
        assert_eq!(
            cs.kinds(),
            vec![OpKind::DropPrimaryKey, OpKind::ChangeColumnNullability]
        );
        let relax = &cs.operations[1];
        assert_eq!(relax.up.len(), 1);
        assert!(relax.down.is_empty());
    }

    #[test]
    fn test_dropped_table_drops_dependents_first() {
        let current = Schema::new("public").table(
            books("books")
                .primary_key(["id"])
                .check("\"id\" > 5")
                .index(Index::new(["title"])),
        );
        let declared = Schema::new("public");
        let cs = plan_for(&declared, &current, &RenameHints::new());
        assert_eq!(cs.kinds(), vec![OpKind::DropTable]);
        let op = &cs.operations[0];
        assert_eq!(op.up.len(), 4);
        assert!(matches!(op.up[0], Action::DropIndex { .. }));
        assert!(matches!(op.up[3], Action::DropTable { .. }));
        assert!(matches!(op.down[0], Action::CreateTable { .. }));
        assert!(matches!(
            op.warnings[0],
            Warning::TableDrop { ref table, .. } if table == "books"
        ));
    }

    #[test]
    fn test_identity_on_nullable_column_sets_not_null_first() {
        let current = Schema::new("public").table(books("books"));
        let declared = Schema::new("public").table(
            Table::new("books")
                .column(Column::new("id", ColumnType::Integer).generated_always_as_identity())
                .column(Column::new("title", ColumnType::Text)),
        );
        let cs = plan_for(&declared, &current, &RenameHints::new());
        assert_eq!(cs.kinds(), vec![OpKind::ChangeColumnIdentity]);
        let op = &cs.operations[0];
        assert!(matches!(op.up[0], Action::SetNotNull { .. }));
        assert!(matches!(op.up[1], Action::ChangeIdentity { to: Some(_), .. }));
        assert!(matches!(op.down[0], Action::ChangeIdentity { to: None, .. }));
        assert!(matches!(op.down[1], Action::DropNotNull { .. }));
        assert_eq!(
            op.warnings.iter().map(Warning::code).collect::<Vec<_>>(),
            vec!["change_column_to_non_nullable"]
        );
    }

    #[test]
    fn test_identity_on_not_null_column_is_a_single_step() {
        let current = Schema::new("public").table(
            Table::new("books").column(Column::new("id", ColumnType::Integer).not_null()),
        );
        let declared = Schema::new("public").table(Table::new("books").column(
            Column::new("id", ColumnType::Integer)
                .not_null()
                .generated_by_default_as_identity(),
        ));
        let cs = plan_for(&declared, &current, &RenameHints::new());
        assert_eq!(cs.kinds(), vec![OpKind::ChangeColumnIdentity]);
        assert_eq!(cs.operations[0].up.len(), 1);
        assert!(cs.operations[0].warnings.is_empty());
    }

    #[test]
    fn test_added_not_null_column_without_default_warns() {
        let current = Schema::new("public").table(books("books"));
        let declared = Schema::new("public").table(
            books("books")
                .column(Column::new("isbn", ColumnType::Text).not_null())
                .column(Column::new("pages", ColumnType::Integer).not_null().with_default(0)),
        );
        let cs = plan_for(&declared, &current, &RenameHints::new());
        let codes: Vec<&str> = cs.warnings().map(Warning::code).collect();
        assert_eq!(codes, vec!["add_non_nullable_column"]);
    }

    #[test]
    fn test_dropped_primary_key_uses_renamed_columns() {
        let current = Schema::new("public").table(books("books").primary_key(["id"]));
        let declared = Schema::new("public").table(
            Table::new("books")
                .column(Column::new("book_id", ColumnType::Integer).renamed_from("id"))
                .column(Column::new("title", ColumnType::Text)),
        );
        let cs = plan_for(&declared, &current, &RenameHints::new());
        let drop = cs
            .operations
            .iter()
            .find(|op| op.kind == OpKind::DropPrimaryKey)
            .unwrap();
        match &drop.up[0] {
            Action::DropConstraint {
                name, constraint, ..
            } => {
                assert_eq!(name, "books_monolayer_pk");
                assert_eq!(constraint.columns(), ["book_id".to_string()]);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
