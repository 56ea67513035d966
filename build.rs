use std::env;
use std::process::Command;

const PREFIX: &str = "COMPASS_BUILD";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".into());
    emit("HASH", &hash);
    emit("TIMESTAMP", &build_timestamp());
    emit("TARGET", &cargo_env("TARGET"));
    emit("PROFILE", &cargo_env("PROFILE"));
}

fn emit(name: &str, value: &str) {
    println!("cargo:rustc-env={PREFIX}_{name}={value}");
}

fn cargo_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| format!("unknown-{}", name.to_lowercase()))
}

/// Honors `SOURCE_DATE_EPOCH` so reproducible builds embed a fixed time.
fn build_timestamp() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
    pinned
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
