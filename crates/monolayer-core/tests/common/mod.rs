use monolayer_core::catalog::ColumnType;
use monolayer_core::model::{Column, RenameHints, Schema, Table};
use monolayer_core::{plan_changeset, Changeset, OpKind, PlanConfig};

/// `books(id integer, title text)`
#[allow(dead_code)]
pub fn books(name: &str) -> Table {
    Table::new(name)
        .column(Column::new("id", ColumnType::Integer))
        .column(Column::new("title", ColumnType::Text))
}

/// `authors(id integer primary key, name text)`
#[allow(dead_code)]
pub fn authors(name: &str) -> Table {
    Table::new(name)
        .column(Column::new("id", ColumnType::Integer))
        .column(Column::new("name", ColumnType::Text))
        .primary_key(["id"])
}

#[allow(dead_code)]
pub fn schema(tables: Vec<Table>) -> Schema {
    tables
        .into_iter()
        .fold(Schema::new("public"), |schema, table| schema.table(table))
}

/// Plan with the default configuration, panicking on error
#[allow(dead_code)]
pub fn plan(declared: &Schema, current: &Schema, hints: &RenameHints) -> Changeset {
    plan_changeset(&PlanConfig::default(), declared, current, hints).unwrap()
}

#[allow(dead_code)]
pub fn kinds_and_priorities(changeset: &Changeset) -> Vec<(OpKind, u32)> {
    changeset
        .operations
        .iter()
        .map(|op| (op.kind, op.priority))
        .collect()
}

/// Independent changes applied to a `books` table
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Toggles {
    pub rename_table: bool,
    pub add_column: bool,
    pub drop_column: bool,
    pub retype_column: bool,
    pub add_check: bool,
    pub drop_check: bool,
    pub add_index: bool,
    pub drop_index: bool,
    pub add_primary_key: bool,
    pub drop_primary_key: bool,
}

impl Toggles {
    #[allow(dead_code)]
    pub fn from_bits(bits: [bool; 10]) -> Self {
        Self {
            rename_table: bits[0],
            add_column: bits[1],
            drop_column: bits[2],
            retype_column: bits[3],
            add_check: bits[4],
            drop_check: bits[5],
            add_index: bits[6],
            drop_index: bits[7],
            add_primary_key: bits[8],
            drop_primary_key: bits[9],
        }
    }

    /// `(declared, current, hints)` exercising the enabled changes
    #[allow(dead_code)]
    pub fn schemas(&self) -> (Schema, Schema, RenameHints) {
        use monolayer_core::model::Index;

        let mut current = books("books");
        if self.drop_column {
            current = current.column(Column::new("pages", ColumnType::Integer));
        }
        if self.drop_check {
            current = current.check("\"id\" > 5");
        }
        if self.drop_index {
            current = current.index(Index::new(["title"]));
        }
        if self.drop_primary_key {
            current = current.primary_key(["id"]);
        }

        let name = if self.rename_table { "publications" } else { "books" };
        let title = if self.retype_column {
            ColumnType::varchar(200)
        } else {
            ColumnType::Text
        };
        let mut declared = Table::new(name)
            .column(Column::new("id", ColumnType::Integer))
            .column(Column::new("title", title));
        if self.add_column {
            declared = declared.column(Column::new("isbn", ColumnType::Text).not_null());
        }
        if self.add_check {
            declared = declared.check("\"id\" < 100");
        }
        if self.add_index {
            declared = declared.index(Index::new(["id"]));
        }
        if self.add_primary_key {
            declared = declared.primary_key(["id"]);
        }

        let hints = if self.rename_table {
            RenameHints::new().rename_table("books", "publications")
        } else {
            RenameHints::new()
        };
        (schema(vec![declared]), schema(vec![current]), hints)
    }
}
