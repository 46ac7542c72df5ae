//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{canonical, common_dir, dir_key, merged_file_name, relative_path};
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn component() -> impl Strategy<Value = String> {
        prop_oneof![
            8 => "[a-z][a-z0-9_]{0,6}",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
        ]
    }

    fn absolute_path() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec(component(), 0..6)
            .prop_map(|parts| PathBuf::from(format!("/{}", parts.join("/"))))
    }

    fn normal_parts() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z][a-z0-9]{0,4}", 0..5)
    }

    // ============================================================================
    // canonical property tests
    // ============================================================================

    proptest! {
        /// Property: canonical is idempotent
        #[test]
        fn canonical_is_idempotent(path in absolute_path()) {
            let once = canonical(&path);
            prop_assert_eq!(canonical(&once), once);
        }

        /// Property: canonical output never contains `.` or `..` components
        #[test]
        fn canonical_has_no_dot_components(path in absolute_path()) {
            let result = canonical(&path);
            for part in result.components() {
                prop_assert!(
                    !matches!(
                        part,
                        std::path::Component::CurDir | std::path::Component::ParentDir
                    ),
                    "canonical({:?}) = {:?}",
                    path,
                    result
                );
            }
        }

        /// Property: a directory key only prefixes keys of paths below it
        #[test]
        fn dir_key_prefix_matches_descendants(
            base in normal_parts(),
            extra in normal_parts(),
            suffix in "[a-z]{1,3}",
        ) {
            let dir = PathBuf::from(format!("/{}", base.join("/")));
            let below = dir.join(extra.join("/"));
            prop_assert!(dir_key(&below).starts_with(&dir_key(&dir)));

            // A sibling sharing a name prefix is not below `dir`.
            if let Some(last) = base.last() {
                let sibling = dir.with_file_name(format!("{}{}", last, suffix));
                prop_assert!(!dir_key(&sibling).starts_with(&dir_key(&dir)));
            }
        }
    }

    // ============================================================================
    // relative_path property tests
    // ============================================================================

    proptest! {
        /// Property: joining the relative path onto the base leads back to the target
        #[test]
        fn relative_path_resolves_back(target in absolute_path(), base in absolute_path()) {
            let relative = relative_path(&target, &base);
            prop_assert_eq!(canonical(canonical(&base).join(&relative)), canonical(&target));
        }

        /// Property: a path relative to itself is `.`
        #[test]
        fn relative_path_to_self_is_dot(path in absolute_path()) {
            prop_assert_eq!(relative_path(&path, &path), ".");
        }

        /// Property: relative paths use forward slashes only
        #[test]
        fn relative_path_uses_forward_slashes(target in absolute_path(), base in absolute_path()) {
            prop_assert!(!relative_path(&target, &base).contains('\\'));
        }
    }

    // ============================================================================
    // common_dir and merged_file_name property tests
    // ============================================================================

    proptest! {
        /// Property: every file lies below the common directory
        #[test]
        fn common_dir_contains_all_files(
            files in prop::collection::vec(
                (normal_parts(), "[a-z]{1,5}").prop_map(|(dirs, name)| {
                    PathBuf::from(format!("/{}", dirs.join("/"))).join(format!("{}.json", name))
                }),
                1..5,
            )
        ) {
            let common = common_dir(&files);
            prop_assert!(common.is_some());
            let common = common.unwrap();
            for file in &files {
                prop_assert!(file.starts_with(&common), "{:?} not below {:?}", file, common);
                prop_assert_ne!(file.as_path(), common.as_path());
            }
        }

        /// Property: merged_file_name keeps the stem and swaps the suffix
        #[test]
        fn merged_file_name_keeps_stem(stem in "[a-zA-Z0-9_.]{1,12}") {
            let name = format!("{}.mergelist.json", stem);
            let merged = merged_file_name(&name).unwrap();
            prop_assert_eq!(merged, format!("{}.merged.json", stem));
        }
    }
}
