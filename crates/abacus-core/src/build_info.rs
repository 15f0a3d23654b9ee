//! Build-time metadata embedded by the build script.

/// The git commit hash at build time (short form).
pub const GIT_HASH: &str = env!("ABACUS_GIT_HASH");

/// The build timestamp as a Unix epoch string.
pub const BUILD_TIMESTAMP: &str = env!("ABACUS_BUILD_TIMESTAMP");

/// The build profile (`debug` or `release`).
pub const BUILD_PROFILE: &str = env!("ABACUS_BUILD_PROFILE");

/// The target triple the binary was compiled for.
pub const BUILD_TARGET: &str = env!("ABACUS_BUILD_TARGET");

/// The crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Return a formatted version string including git hash and profile.
///
/// Example: `"0.1.0 (abc1234, debug)"`
pub fn version_string() -> String {
    format!("{VERSION} ({GIT_HASH}, {BUILD_PROFILE})")
}

/// Multi-line build report for `abacus version`.
pub fn build_report() -> String {
    format!(
        "abacus {}\ncommit:    {GIT_HASH}\nprofile:   {BUILD_PROFILE}\ntarget:    {BUILD_TARGET}\nbuilt at:  {BUILD_TIMESTAMP}",
        VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_contains_version() {
        let v = version_string();
        assert!(v.starts_with(VERSION));
        assert!(v.contains(GIT_HASH));
    }

    #[test]
    fn test_build_report_lists_every_field() {
        let report = build_report();
        assert!(report.contains(VERSION));
        assert!(report.contains(BUILD_PROFILE));
        assert!(report.contains(BUILD_TARGET));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn test_build_profile() {
        // In test mode, profile is "debug"
        assert_eq!(BUILD_PROFILE, "debug");
    }
}
