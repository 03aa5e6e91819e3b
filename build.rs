//! Embeds the version string shown by `argo --version`.
//!
//! Release builds from a tagged commit report the crate version; anything
//! else reports `<version>-dev+<short hash>`.

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    let version = match git(&["rev-parse", "--short", "HEAD"]) {
        _ if on_tag => pkg,
        Some(hash) if !hash.is_empty() => format!("{pkg}-dev+{hash}"),
        _ => format!("{pkg}-dev"),
    };
    println!("cargo:rustc-env=ARGO_VERSION={version}");
}
