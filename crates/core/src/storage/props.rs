//! Property-based tests for storage keys and URLs.
//!
//! - Key shape: `<env>/<category>/[<subpath>/]<stem>-<8 hex><ext>`
//! - Filename recovery inverts key construction
//! - Public URLs decode back to the key they were built from
//! - `.` and `..` never reach a key

use std::sync::Arc;

use proptest::prelude::*;

use super::environment::Environment;
use super::error::StorageError;
use super::key::{KeyBuilder, key_filename, recover_filename, split_filename};
use super::location::{parse_object_url, public_url};

fn environment() -> impl Strategy<Value = Environment> {
    prop::sample::select(Environment::ALL.to_vec())
}

/// Any non-empty filename without `/`, including odd dots and unicode.
fn filename() -> impl Strategy<Value = String> {
    "[^/]{1,40}"
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Path segment that may contain dots but is never `.` or `..`.
fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_.-]{1,8}".prop_filter("dot segment", |s| !is_dot_segment(s))
}

/// Category with optional surrounding slashes.
fn category() -> impl Strategy<Value = (String, String)> {
    (segment(), "/?", "/?").prop_map(|(name, pre, post)| {
        (format!("{pre}{name}{post}"), name)
    })
}

/// Subpath of 0-3 segments with optional surrounding slashes.
fn subpath() -> impl Strategy<Value = (String, String)> {
    (
        prop::collection::vec(segment(), 0..3),
        "/?",
        "/?",
    )
        .prop_map(|(segments, pre, post)| {
            let joined = segments.join("/");
            if joined.is_empty() {
                (pre, joined)
            } else {
                (format!("{pre}{joined}{post}"), joined)
            }
        })
}

proptest! {
    /// Key segments follow env, category, subpath, disambiguated name.
    #[test]
    fn prop_key_structure(
        env in environment(),
        name in "[a-zA-Z0-9_ -]{1,20}",
        ext in "[a-z]{1,4}",
        (raw_category, category) in category(),
        (raw_subpath, subpath) in subpath(),
    ) {
        let filename = format!("{name}.{ext}");
        let key = KeyBuilder::new(env)
            .build(&filename, &raw_category, &raw_subpath)
            .expect("valid key");

        let mut expected_prefix = format!("{env}/{category}/");
        if !subpath.is_empty() {
            expected_prefix.push_str(&subpath);
            expected_prefix.push('/');
        }
        prop_assert!(key.starts_with(&expected_prefix), "{} !~ {}", key, expected_prefix);

        let last = &key[expected_prefix.len()..];
        prop_assert!(!last.contains('/'));
        let suffix = format!(".{ext}");
        prop_assert!(last.ends_with(&suffix));

        let without_ext = &last[..last.len() - suffix.len()];
        let (stem, token) = without_ext.rsplit_once('-').expect("disambiguator separator");
        prop_assert_eq!(stem, name.as_str());
        prop_assert_eq!(token.len(), 8);
        prop_assert!(token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    /// No key ever contains an empty segment.
    #[test]
    fn prop_key_has_no_empty_segments(
        env in environment(),
        filename in filename(),
        (raw_category, _) in category(),
        (raw_subpath, _) in subpath(),
    ) {
        let key = KeyBuilder::new(env)
            .build(&filename, &raw_category, &raw_subpath)
            .expect("valid key");
        prop_assert!(key.split('/').all(|segment| !segment.is_empty()), "{}", key);
    }

    /// recover(last segment of build(name)) == name.
    #[test]
    fn prop_filename_round_trip(env in environment(), filename in filename()) {
        let key = KeyBuilder::new(env)
            .build(&filename, "ingested", "")
            .expect("valid key");
        prop_assert_eq!(recover_filename(key_filename(&key)), filename);
    }

    /// The extension survives key construction untouched.
    #[test]
    fn prop_extension_preserved(filename in filename()) {
        let key = KeyBuilder::new(Environment::Dev)
            .build(&filename, "c", "")
            .expect("valid key");
        let (_, ext) = split_filename(&filename);
        let (_, key_ext) = split_filename(key_filename(&key));
        prop_assert_eq!(ext, key_ext);
    }

    /// Segments without a disambiguator come back unchanged.
    #[test]
    fn prop_foreign_segment_unchanged(name in "[a-zA-Z_ ]{1,20}(\\.[a-z]{1,4})?") {
        prop_assert_eq!(recover_filename(&name), name);
    }

    /// parse(public_url(key)) == key, for any key the builder produces.
    #[test]
    fn prop_url_round_trip(
        env in prop::sample::select(vec![Environment::Dev, Environment::Stage, Environment::Prod]),
        filename in filename(),
        (raw_category, _) in category(),
        (raw_subpath, _) in subpath(),
    ) {
        let key = KeyBuilder::new(env)
            .build(&filename, &raw_category, &raw_subpath)
            .expect("valid key");
        let bucket = env.bucket().expect("remote environment");
        let url = public_url(bucket, "us-east-1", &key);

        let prefix = format!("https://{bucket}.s3.us-east-1.amazonaws.com/");
        prop_assert!(url.starts_with(&prefix));

        let location = parse_object_url(&url).expect("valid url");
        prop_assert_eq!(location.bucket, bucket);
        prop_assert_eq!(location.key, key);
    }

    /// A `.` or `..` segment anywhere in category or subpath is rejected.
    #[test]
    fn prop_dot_segments_rejected(
        env in environment(),
        before in prop::collection::vec(segment(), 0..3),
        after in prop::collection::vec(segment(), 0..3),
        dots in prop::sample::select(vec![".", ".."]),
        in_category in any::<bool>(),
    ) {
        let mut segments = before;
        segments.push(dots.to_string());
        segments.extend(after);
        let path = segments.join("/");
        let (category, subpath) = if in_category {
            (path.as_str(), "")
        } else {
            ("ingested", path.as_str())
        };

        let err = KeyBuilder::new(env)
            .build("invoice.pdf", category, subpath)
            .unwrap_err();
        prop_assert!(matches!(err, StorageError::InvalidKey(_)), "{:?}", err);
    }

    /// Every key built concurrently from one builder has its own token.
    #[test]
    fn prop_shared_builder_is_usable_across_threads(filename in "[a-z]{1,8}\\.txt") {
        let builder = Arc::new(KeyBuilder::new(Environment::Prod));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let builder = Arc::clone(&builder);
                let filename = filename.clone();
                std::thread::spawn(move || builder.build(&filename, "c", "").expect("valid key"))
            })
            .collect();
        for handle in handles {
            let key = handle.join().expect("thread should not panic");
            prop_assert_eq!(recover_filename(key_filename(&key)), filename.clone());
        }
    }
}
