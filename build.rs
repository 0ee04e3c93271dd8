//! Build script - passes the esp-hal linker script to the firmware link.
//!
//! Host builds (library + tests) need no linker arguments.

use std::env;

fn main() {
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    if arch == "xtensa" {
        println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
