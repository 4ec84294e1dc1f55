//! Property-based tests for the browsing core.
//!
//! Checks label lookup, the filter predicate, wraparound navigation and the
//! sort comparator against random inputs.

use defects_browser::browser::{
    next_index, previous_index, resolve_index, FilterSet, MatchMode, SortSpec,
};
use defects_browser::model::{BugRecord, Label, Taxonomy};
use proptest::prelude::*;
use std::collections::HashMap;

const KEYS: [&str; 6] = [
    "wrapsIf",
    "wrapsElse",
    "condBranIfAdd",
    "assignAdd",
    "constChange",
    "Nopol",
];

fn key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(KEYS.to_vec())
}

/// A record with a random subset of `KEYS` set, each to `true` or `false`.
fn record() -> impl Strategy<Value = BugRecord> {
    (
        "[A-Z][a-z]{0,6}",
        1u32..500,
        prop::collection::vec(prop::option::of(any::<bool>()), KEYS.len()),
    )
        .prop_map(|(project, id, flags)| {
            KEYS.iter()
                .zip(flags)
                .fold(BugRecord::new(project, id.to_string()), |bug, (key, flag)| {
                    match flag {
                        Some(value) => bug.with_field(*key, value),
                        None => bug,
                    }
                })
        })
}

fn taxonomy(entries: &HashMap<String, (String, String)>) -> Taxonomy {
    let mut taxonomy = Taxonomy::new();
    for (key, (category, name)) in entries {
        taxonomy.insert(category.clone(), "Group", key.clone(), Label::new(name.clone()));
    }
    taxonomy
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn label_lookup_finds_every_key(
        entries in prop::collection::hash_map(
            "[a-z]{1,8}",
            ("(Repair Actions|Repair Patterns)", "[A-Za-z ]{1,20}"),
            1..20,
        ),
        unknown in "[A-Z]{9,12}",
    ) {
        let taxonomy = taxonomy(&entries);
        for (key, (_, name)) in &entries {
            prop_assert_eq!(taxonomy.label(key), name.as_str());
        }
        // upper-case keys never collide with the lower-case ones above
        prop_assert_eq!(taxonomy.label(&unknown), unknown.as_str());
    }

    #[test]
    fn inactive_filters_accept_everything(
        bug in record(),
        inactive in prop::collection::vec(key(), 0..6),
        any_mode in any::<bool>(),
    ) {
        let mut filters = FilterSet::new();
        for key in inactive {
            filters.set(key, false);
        }
        let mode = if any_mode { MatchMode::Any } else { MatchMode::All };
        prop_assert!(filters.is_pass_through());
        prop_assert!(filters.accepts(&bug, mode));
    }

    #[test]
    fn all_mode_requires_every_active_key(
        bug in record(),
        active in prop::collection::hash_set(key(), 1..4),
    ) {
        let filters = FilterSet::with_active(active.iter().copied());
        let expected = active.iter().all(|key| bug.flag(key));
        prop_assert_eq!(filters.accepts(&bug, MatchMode::All), expected);
    }

    #[test]
    fn any_mode_requires_one_active_key(
        bug in record(),
        active in prop::collection::hash_set(key(), 1..4),
    ) {
        let filters = FilterSet::with_active(active.iter().copied());
        let expected = active.iter().any(|key| bug.flag(key));
        prop_assert_eq!(filters.accepts(&bug, MatchMode::Any), expected);
    }

    #[test]
    fn next_undoes_previous(len in 1usize..200, index in 0usize..200) {
        let index = index % len;
        let previous = previous_index(index, len).expect("non-empty");
        prop_assert!(previous < len);
        prop_assert_eq!(next_index(previous, len), Some(index));
        let next = next_index(index, len).expect("non-empty");
        prop_assert_eq!(previous_index(next, len), Some(index));
    }

    #[test]
    fn sort_orders_by_primary_field(
        mut bugs in prop::collection::vec(record(), 0..30),
        reverse in any::<bool>(),
    ) {
        let spec = SortSpec::new(["project"]).reversed(reverse);
        spec.sort(&mut bugs, |b| b);
        for pair in bugs.windows(2) {
            if reverse {
                prop_assert!(pair[0].project >= pair[1].project);
            } else {
                prop_assert!(pair[0].project <= pair[1].project);
            }
        }
    }

    #[test]
    fn resolve_index_finds_first_match(
        bugs in prop::collection::vec(record(), 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = &bugs[pick.index(bugs.len())];
        let found = resolve_index(&bugs, &target.project, &target.commit).expect("present");
        prop_assert!(bugs[found].is(&target.project, &target.commit));
        prop_assert!(bugs[..found].iter().all(|b| !b.is(&target.project, &target.commit)));
    }
}

#[test]
fn navigation_on_empty_list_is_none() {
    assert_eq!(next_index(0, 0), None);
    assert_eq!(previous_index(0, 0), None);
}
