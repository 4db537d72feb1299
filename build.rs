use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    if let Ok(output) = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output()
        && output.status.success()
    {
        let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !sha.is_empty() {
            println!("cargo:rustc-env=USERS_MIGRATE_BUILD_GIT_SHA={sha}");
        }
    }
}
