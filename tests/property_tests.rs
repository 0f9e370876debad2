//! Property-based tests for core domain types and option handling.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::path::{Component, Path, PathBuf};

use proptest::prelude::*;
use toml::Value;

use vcs_client::core::config::{ClientOptions, ConfigError};
use vcs_client::core::paths::absolutize;
use vcs_client::core::types::{BranchName, Oid, RefName};

/// Strategy for generating valid branch name characters.
fn branch_name_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
        Just('/'),
    ]
}

/// Strategy for generating valid branch names.
fn valid_branch_name() -> impl Strategy<Value = String> {
    prop::collection::vec(branch_name_char(), 1..50).prop_filter_map(
        "must be valid branch name",
        |chars| {
            let name: String = chars.into_iter().collect();
            let bad = name.starts_with('-')
                || name.starts_with('/')
                || name.ends_with('/')
                || name.ends_with(".lock")
                || name.contains("..")
                || name.contains("//")
                || name
                    .split('/')
                    .any(|c| c.starts_with('.') || c.ends_with(".lock"));
            (!bad).then_some(name)
        },
    )
}

/// Strategy for generating valid hex OIDs.
fn valid_oid_string() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
        ]),
        40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for relative or absolute paths mixing `.` and `..`.
fn messy_path() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        Just(".".to_string()),
        Just("..".to_string()),
        "[a-z]{1,8}",
    ];
    (any::<bool>(), prop::collection::vec(segment, 0..8)).prop_map(|(absolute, segments)| {
        let joined = segments.join("/");
        if absolute {
            format!("/{joined}")
        } else {
            joined
        }
    })
}

/// Options that take exactly one string argument.
fn single_arg_option() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "path",
        "remote_url",
        "auth_type",
        "username",
        "password",
        "private_key",
        "private_key_path",
        "reset_mode",
        "remote_name",
        "author_name",
        "author_email",
    ])
}

proptest! {
    /// Valid branch names map to refs/heads/<name> and back.
    #[test]
    fn branch_ref_roundtrip(name in valid_branch_name()) {
        let branch = BranchName::new(&name).unwrap();
        let refname = RefName::for_branch(&branch);
        prop_assert_eq!(refname.as_str(), format!("refs/heads/{name}"));
        prop_assert_eq!(refname.branch_name(), Some(branch));
    }

    /// OIDs are normalized to lowercase.
    #[test]
    fn oid_normalized_to_lowercase(oid_str in valid_oid_string()) {
        let oid = Oid::new(oid_str.to_uppercase()).unwrap();
        prop_assert_eq!(oid.as_str(), oid_str.as_str());
    }

    /// Normalized paths are absolute and free of `.` and `..`.
    #[test]
    fn absolutize_is_clean(raw in messy_path()) {
        let out = absolutize(Path::new(&raw), Path::new("/base/dir"));
        prop_assert!(out.is_absolute());
        prop_assert!(out
            .components()
            .all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
    }

    /// Normalizing twice changes nothing.
    #[test]
    fn absolutize_is_idempotent(raw in messy_path()) {
        let base = PathBuf::from("/base/dir");
        let once = absolutize(Path::new(&raw), &base);
        let twice = absolutize(&once, &base);
        prop_assert_eq!(once, twice);
    }

    /// Single-argument options reject every other argument count.
    #[test]
    fn single_arg_options_check_length(
        name in single_arg_option(),
        count in (0usize..5).prop_filter("not one", |n| *n != 1),
    ) {
        let args = vec![Value::from("x"); count];
        let mut options = ClientOptions::new();
        let err = options.set(name, &args).unwrap_err();
        let is_length_error = matches!(err, ConfigError::InvalidArgsLength { actual, .. } if actual == count);
        prop_assert!(is_length_error);
    }

    /// Single-argument options reject non-string values.
    #[test]
    fn single_arg_options_check_type(name in single_arg_option(), n in any::<i64>()) {
        let mut options = ClientOptions::new();
        let err = options.set(name, &[Value::from(n)]).unwrap_err();
        let is_type_error = matches!(err, ConfigError::UnsupportedType { found: "integer", .. });
        prop_assert!(is_type_error);
    }
}
