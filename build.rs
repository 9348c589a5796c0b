// build.rs
use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=PUFFERFISH2_LIB_DIR");

    // Only the native primitive needs a link search path
    if env::var_os("CARGO_FEATURE_PUFFERFISH2").is_none() {
        return;
    }

    if let Ok(dir) = env::var("PUFFERFISH2_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }
}
