//! Property-Based Tests for aptbundle
//!
//! Uses proptest for testing resolver and parser invariants:
//! - Resolved sets contain each package once
//! - `linux_headers` never survives resolution
//! - Unknown subcategories never change the result
//! - Version parsing never panics

use aptbundle::manifest::Category;
use aptbundle::selection::{LINUX_HEADERS_TOKEN, linux_headers_package, resolve};
use aptbundle::status::parse_version;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Strategy for package names, with the headers token mixed in
fn package_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z][a-z0-9+.-]{0,12}",
        1 => Just(LINUX_HEADERS_TOKEN.to_string()),
    ]
}

/// Strategy for a category with up to four subcategories
fn category_strategy() -> impl Strategy<Value = Category> {
    (
        prop::collection::btree_map(
            "sub[0-9]",
            prop::collection::vec(package_strategy(), 0..8),
            0..4,
        ),
        prop::collection::vec(package_strategy(), 0..4),
    )
        .prop_map(|(subcategories, other_packages)| Category {
            subcategories,
            other_packages,
        })
}

fn release_strategy() -> impl Strategy<Value = String> {
    "[0-9]\\.[0-9]{1,2}\\.[0-9]-[0-9]{1,2}-amd64"
}

proptest! {
    /// Every selected package ends up in the set, and nothing else does
    #[test]
    fn resolve_is_union_of_selection(
        category in category_strategy(),
        release in release_strategy(),
    ) {
        let selected: Vec<String> = category.subcategories.keys().cloned().collect();
        let resolved = resolve(&category, &selected, &release);

        let expected: BTreeSet<String> = category
            .subcategories
            .values()
            .flatten()
            .chain(category.other_packages.iter())
            .map(|p| if p == LINUX_HEADERS_TOKEN { linux_headers_package(&release) } else { p.clone() })
            .collect();
        prop_assert_eq!(resolved, expected);
    }

    /// The headers token is always rewritten, to a single entry
    #[test]
    fn linux_headers_never_survives(
        category in category_strategy(),
        release in release_strategy(),
    ) {
        let selected: Vec<String> = category.subcategories.keys().cloned().collect();
        let resolved = resolve(&category, &selected, &release);

        prop_assert!(!resolved.contains(LINUX_HEADERS_TOKEN));
        let headers = resolved.iter().filter(|p| p.starts_with("linux-headers-")).count();
        prop_assert!(headers <= 1);
    }

    /// Selecting a subcategory twice, or one that does not exist, changes nothing
    #[test]
    fn unknown_and_repeated_subcategories_are_ignored(
        category in category_strategy(),
        release in release_strategy(),
    ) {
        let selected: Vec<String> = category.subcategories.keys().cloned().collect();
        let baseline = resolve(&category, &selected, &release);

        let mut noisy = selected.clone();
        noisy.extend(selected.iter().cloned());
        noisy.push("not-a-subcategory".to_string());
        prop_assert_eq!(resolve(&category, &noisy, &release), baseline);
    }

    /// Parsing arbitrary dpkg output never panics, and finds what was written
    #[test]
    fn parse_version_finds_version_line(
        prefix in "[A-Za-z-]{1,10}: [a-z0-9 ]{0,20}",
        version in "[0-9][0-9a-z.:+~-]{0,15}",
    ) {
        let record = format!("{}\nVersion: {}\nDescription: x\n", prefix, version);
        let parsed = parse_version(&record);
        if prefix.starts_with("Version:") {
            prop_assert!(parsed.is_some());
        } else {
            prop_assert_eq!(parsed, Some(version));
        }
    }
}

#[test]
fn empty_category_resolves_to_empty_set() {
    let category = Category {
        subcategories: BTreeMap::new(),
        other_packages: Vec::new(),
    };
    assert!(resolve(&category, &["anything".to_string()], "6.1.0").is_empty());
}
