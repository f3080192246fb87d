#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{plan, Toggles};
use monolayer_core::plan::RENAME_TABLE_PRIORITY;
use monolayer_core::OpKind;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_operations_are_ordered_by_band(bits in any::<[bool; 10]>()) {
        let (declared, current, hints) = Toggles::from_bits(bits).schemas();
        let cs = plan(&declared, &current, &hints);

        for op in &cs.operations {
            prop_assert_eq!(op.priority, op.kind.priority());
        }
        for pair in cs.operations.windows(2) {
            prop_assert!(pair[0].priority <= pair[1].priority);
        }
    }

    #[test]
    fn prop_table_addressing_follows_rename_band(bits in any::<[bool; 10]>()) {
        let toggles = Toggles::from_bits(bits);
        let (declared, current, hints) = toggles.schemas();
        let cs = plan(&declared, &current, &hints);

        let declared_name = if toggles.rename_table { "publications" } else { "books" };
        for op in &cs.operations {
            prop_assert_eq!(op.current_table_name.as_str(), declared_name);
            let expected = if op.priority <= RENAME_TABLE_PRIORITY { "books" } else { declared_name };
            prop_assert_eq!(op.table_name.as_str(), expected);
        }
    }

    #[test]
    fn prop_planning_is_deterministic(bits in any::<[bool; 10]>()) {
        let (declared, current, hints) = Toggles::from_bits(bits).schemas();
        prop_assert_eq!(
            plan(&declared, &current, &hints),
            plan(&declared, &current, &hints)
        );
    }
}

#[test]
fn test_every_change_at_once() {
    let (declared, current, hints) = Toggles::from_bits([true; 10]).schemas();
    let cs = plan(&declared, &current, &hints);

    assert_eq!(
        cs.kinds(),
        vec![
            OpKind::DropIndex,
            OpKind::DropCheck,
            OpKind::RenameTable,
            OpKind::DropColumn,
            OpKind::AddColumn,
            OpKind::ChangeColumnType,
            OpKind::CreateIndex,
            OpKind::CreateCheck,
            OpKind::RenamePrimaryKey,
        ]
    );
}

#[test]
fn test_rename_band_splits_drops_from_creates() {
    let toggles = Toggles {
        rename_table: true,
        drop_check: true,
        add_check: true,
        ..Toggles::default()
    };
    let (declared, current, hints) = toggles.schemas();
    let cs = plan(&declared, &current, &hints);

    assert_eq!(
        cs.kinds(),
        vec![OpKind::DropCheck, OpKind::RenameTable, OpKind::CreateCheck]
    );
}
