//! Package loading configuration.
//!
//! ```
//! use typegen::Config;
//!
//! fn generated_only(path: &std::path::Path) -> bool {
//!     path.extension().is_some_and(|ext| ext == "go")
//! }
//!
//! let config = Config::new()
//!     .with_filter(generated_only)
//!     .with_ignore_evaluation_errors(true);
//! assert_eq!(config.test_suffix, "_test");
//! ```

use std::path::Path;

/// Controls which files [`Package::load`](crate::Package::load) reads and
/// how it reacts to types it cannot evaluate.
///
/// | Setting | Default |
/// |---------|---------|
/// | `filter` | none (every file) |
/// | `test_suffix` | `"_test"` |
/// | `ignore_evaluation_errors` | `false` |
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Files for which this returns `false` are skipped.
    pub filter: Option<fn(&Path) -> bool>,

    /// Types declared in a file whose stem ends with this are test types.
    pub test_suffix: &'static str,

    /// Skip declarations whose type fails to evaluate instead of aborting.
    ///
    /// Types that do not exist yet, because they are produced by the
    /// generator itself, are the usual reason to set this.
    pub ignore_evaluation_errors: bool,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Config {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        filter: None,
        test_suffix: "_test",
        ignore_evaluation_errors: false,
    };

    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    #[inline]
    pub const fn with_filter(mut self, filter: fn(&Path) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    #[inline]
    pub const fn with_test_suffix(mut self, suffix: &'static str) -> Self {
        self.test_suffix = suffix;
        self
    }

    #[inline]
    pub const fn with_ignore_evaluation_errors(mut self, ignore: bool) -> Self {
        self.ignore_evaluation_errors = ignore;
        self
    }

    /// Whether `path` passes the configured filter and is not a hidden
    /// (`.`) or ignored (`_`) file.
    pub fn accepts(&self, path: &Path) -> bool {
        let ignored = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('_') || name.starts_with('.'));
        !ignored && self.filter.is_none_or(|filter| filter(path))
    }

    /// Whether declarations in `path` are test types.
    pub fn is_test_file(&self, path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with(self.test_suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn no_vendor(path: &Path) -> bool {
        !path.starts_with("vendor")
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert!(config.filter.is_none());
        assert_eq!(config.test_suffix, "_test");
        assert!(!config.ignore_evaluation_errors);
    }

    #[test]
    fn test_const_default() {
        const CONFIG: Config = Config::new().with_ignore_evaluation_errors(true);
        assert!(CONFIG.ignore_evaluation_errors);
    }

    #[test_case("thing.go", true; "plain")]
    #[test_case("_thing.go", false; "underscore")]
    #[test_case(".thing.go", false; "hidden")]
    #[test_case("dir/_thing.go", false; "underscore in dir")]
    #[test_case("_dir/thing.go", true; "only the file name counts")]
    #[test_case("vendor/thing.go", false; "rejected by filter")]
    fn test_accepts(path: &str, expected: bool) {
        let config = Config::new().with_filter(no_vendor);
        assert_eq!(config.accepts(Path::new(path)), expected);
    }

    #[test_case("thing_test.go", "_test", true; "default suffix")]
    #[test_case("thing.go", "_test", false; "not a test")]
    #[test_case("thing_spec.go", "_spec", true; "custom suffix")]
    #[test_case("test/thing.go", "_test", false; "directory does not count")]
    fn test_is_test_file(path: &str, suffix: &'static str, expected: bool) {
        let config = Config::new().with_test_suffix(suffix);
        assert_eq!(config.is_test_file(Path::new(path)), expected);
    }
}
