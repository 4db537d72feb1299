/// Build-time git commit SHA stamped by build.rs when available.
pub fn git_sha() -> Option<&'static str> {
    option_env!("USERS_MIGRATE_BUILD_GIT_SHA")
}

/// Version string for the start-of-run log line.
pub fn describe() -> String {
    match git_sha() {
        Some(sha) => format!("{} ({sha})", env!("CARGO_PKG_VERSION")),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}
