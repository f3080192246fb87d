//! Human-readable summary renderer for changesets.

use std::collections::BTreeMap;

use super::changeset::Changeset;
use super::warning::{Warning, WarningKind};

/// Render a Markdown summary of a [`Changeset`].
///
/// The summary is intended for operator review before execution. It is
/// informational only and does not affect the structured changeset.
pub fn render_summary(changeset: &Changeset) -> String {
    let mut out = String::new();

    out.push_str("## Changeset\n\n");
    out.push_str(&format!(
        "**Schema**: {}  \n**Operations**: {}\n\n",
        changeset.schema,
        changeset.len()
    ));

    if changeset.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("### Operations\n\n");
    out.push_str("| # | Priority | Operation | Table | Up | Down |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for (i, op) in changeset.operations.iter().enumerate() {
        let table = if op.table_name == op.current_table_name {
            format!("`{}`", op.table_name)
        } else {
            format!("`{}` → `{}`", op.table_name, op.current_table_name)
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            i + 1,
            op.priority,
            op.kind,
            table,
            op.up.len(),
            op.down.len()
        ));
    }
    out.push('\n');

    let mut grouped: BTreeMap<WarningKind, Vec<&Warning>> = BTreeMap::new();
    for warning in changeset.warnings() {
        grouped.entry(warning.kind()).or_default().push(warning);
    }
    if !grouped.is_empty() {
        out.push_str("### Warnings\n\n");
        for (kind, warnings) in &grouped {
            out.push_str(&format!("- **{}** ({})\n", kind, warnings.len()));
            for warning in warnings {
                out.push_str(&format!("  - `{}`: {}\n", warning.code(), warning));
            }
        }
        out.push('\n');
    }

    out
}
