//! Discovering the calling test's identity.
//!
//! The class name is the module path of the test and the method name is
//! the test function's name. Both are read from `std::any::type_name` of a
//! function item declared at the call site.

use std::path::Path;

use approvex_store::naming::TestContext;
use approvex_store::settings::StoreSettings;

/// Marker item name used by [`test_context!`](crate::test_context).
#[doc(hidden)]
pub const HERE_MARKER: &str = "__approvex_here";

/// [`TestContext`] for the enclosing test function.
///
/// Approval files go under `APPROVEX_DIR` when set, otherwise under
/// `approvals/` in the calling crate's manifest directory.
///
/// ```no_run
/// use approvex_engine::test_context;
///
/// fn shows_an_order() {
///     let context = test_context!();
///     assert_eq!(context.method_name, "shows_an_order");
/// }
/// ```
#[macro_export]
macro_rules! test_context {
    () => {{
        fn __approvex_here() {}
        $crate::context::context_from_type_name(
            ::std::any::type_name_of_val(&__approvex_here),
            env!("CARGO_MANIFEST_DIR"),
        )
    }};
}

/// Build a [`TestContext`] from the type name of a marker function.
///
/// `crate::orders::tests::shows_an_order::__approvex_here` yields class
/// `crate::orders::tests` and method `shows_an_order`. Closure frames are
/// dropped so a call inside a closure still names the test.
pub fn context_from_type_name(type_name: &str, manifest_dir: impl AsRef<Path>) -> TestContext {
    let (class_name, method_name) = split_type_name(type_name);
    let settings = StoreSettings::from_env(manifest_dir);
    TestContext::new(class_name, method_name, settings.base_dir)
}

fn split_type_name(type_name: &str) -> (String, String) {
    let segments: Vec<&str> = type_name
        .split("::")
        .filter(|s| *s != HERE_MARKER && *s != "{{closure}}")
        .collect();

    match segments.split_last() {
        Some((method, class)) if !class.is_empty() => (class.join("::"), (*method).to_string()),
        Some((method, _)) => (String::new(), (*method).to_string()),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_type_name_module_and_function() {
        assert_eq!(
            split_type_name("my_crate::orders::tests::shows_an_order::__approvex_here"),
            (
                "my_crate::orders::tests".to_string(),
                "shows_an_order".to_string()
            )
        );
    }

    #[test]
    fn test_split_type_name_drops_closures() {
        assert_eq!(
            split_type_name("my_crate::tests::nested::{{closure}}::{{closure}}::__approvex_here"),
            ("my_crate::tests".to_string(), "nested".to_string())
        );
    }

    #[test]
    fn test_macro_names_this_function() {
        let context = crate::test_context!();
        assert_eq!(context.class_name, "approvex_engine::context::tests");
        assert_eq!(context.method_name, "test_macro_names_this_function");
    }
}
