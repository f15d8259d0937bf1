use approvex_store::naming::{hash_name, locate, FileNameOverrides, TestContext, NUM_OF_HASH_CHARS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn locate_is_deterministic(class in "\\PC{0,40}", method in "\\PC{0,40}") {
        let context = TestContext::new(class, method, "/base");
        let overrides = FileNameOverrides::default();

        let first = locate(&context, &overrides, "json");
        let second = locate(&context, &overrides, "json");

        prop_assert_eq!(first, second);
    }

    #[test]
    fn hashed_names_are_short_lowercase_hex(name in "\\PC{0,80}") {
        let hashed = hash_name(&name);
        prop_assert_eq!(hashed.len(), NUM_OF_HASH_CHARS);
        prop_assert!(hashed.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn overrides_bypass_hashing(file in "[a-zA-Z0-9_]{1,20}", id in "[a-z0-9]{1,8}") {
        let context = TestContext::new("Foo", "bar", "/base");
        let overrides = FileNameOverrides {
            file_name: Some(file.clone()),
            unique_id: Some(id.clone()),
            ..Default::default()
        };
        let reference = locate(&context, &overrides, "json");
        prop_assert_eq!(reference.file_name(), format!("{}-{}", file, id));
    }
}

#[test]
fn test_known_hashes() {
    assert_eq!(hash_name("tests::approval"), "2cc53d");
    assert_eq!(hash_name("my_crate::tests"), "f99a9e");
    assert_eq!(hash_name("first_run_creates_not_approved_file"), "1550d1");
}
