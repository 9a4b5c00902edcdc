//! Build script for FoodSaver
//!
//! Embeds a build number and timestamp. The number is bumped on every
//! recompilation unless `FOODSAVER_BUILD_NUMBER` pins it (release builds).

use std::env;
use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn next_build_number() -> u64 {
    let path = Path::new(BUILD_NUMBER_FILE);
    let current: u64 = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);

    let next = current + 1;
    fs::write(path, next.to_string()).expect("Failed to write build number file");
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=FOODSAVER_BUILD_NUMBER");

    let build_number = match env::var("FOODSAVER_BUILD_NUMBER") {
        Ok(pinned) if pinned.trim().parse::<u64>().is_ok() => pinned.trim().to_string(),
        _ => next_build_number().to_string(),
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=FOODSAVER_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=FOODSAVER_BUILD_TIMESTAMP={}", timestamp);
}
