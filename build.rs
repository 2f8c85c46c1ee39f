use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = git(&["rev-parse", "--short", "HEAD"]).filter(|hash| !hash.is_empty());
    emit("MONEYFLOW_BUILD_HASH", hash);
    let dirty = git(&["status", "--porcelain"]).map(|out| {
        if out.is_empty() {
            "clean".to_string()
        } else {
            "dirty".to_string()
        }
    });
    emit("MONEYFLOW_BUILD_STATUS", dirty);

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    emit("MONEYFLOW_BUILD_TIMESTAMP", Some(timestamp));
    emit("MONEYFLOW_BUILD_TARGET", env::var("TARGET").ok());
    emit("MONEYFLOW_BUILD_PROFILE", env::var("PROFILE").ok());
    emit("MONEYFLOW_BUILD_RUSTC", capture("rustc", &["--version"]));
}

fn emit(key: &str, value: Option<String>) {
    let value = value.unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={key}={value}");
}

fn git(args: &[&str]) -> Option<String> {
    capture("git", args)
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}
