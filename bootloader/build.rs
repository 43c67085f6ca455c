//! TB Bootloader Build Script
//!
//! Generates the boot layout constants from the environment and, when
//! building the stage binaries for the bare-metal target, selects their
//! linker scripts and flat-binary output.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// (environment variable, generated constant, type, default, min, max)
const LAYOUT_KNOBS: &[(&str, &str, &str, u64, u64, u64)] = &[
    ("TBBOOT_STAGE2_SECTORS", "STAGE2_SECTORS", "u16", 32, 1, 64),
    ("TBBOOT_PAYLOAD_SECTORS", "PAYLOAD_SECTORS", "u32", 128, 1, 896),
    ("TBBOOT_MAX_TRANSFER", "MAX_SECTORS_PER_TRANSFER", "u16", 64, 1, 64),
];

const SECTORS_PER_64K: u64 = 0x1_0000 / 512;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=linker/");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    create_layout_file(&out_dir);

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if target_os == "none" && target_arch == "x86" {
        configure_stage_binaries();
    }
}

fn create_layout_file(out_dir: &Path) {
    let mut layout = String::from("// Generated by build.rs, do not edit.\n");

    for (var, name, ty, default, min, max) in LAYOUT_KNOBS {
        println!("cargo:rerun-if-env-changed={}", var);
        let value = match env::var(var) {
            Ok(raw) => parse_knob(var, &raw, *min, *max),
            Err(_) => *default,
        };
        // a transfer must never straddle a 64 KiB line
        if *name == "MAX_SECTORS_PER_TRANSFER" && SECTORS_PER_64K % value != 0 {
            panic!("{}={} does not divide {} sectors (64 KiB)", var, value, SECTORS_PER_64K);
        }
        layout.push_str(&format!("pub const {}: {} = {};\n", name, ty, value));
    }

    layout.push_str(&format!(
        "pub const BUILD_VERSION: &str = \"{}\";\n",
        env::var("CARGO_PKG_VERSION").unwrap_or_default()
    ));

    fs::write(out_dir.join("boot_layout.rs"), layout).expect("Failed to write boot layout");
}

fn parse_knob(var: &str, raw: &str, min: u64, max: u64) -> u64 {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse::<u64>(),
    };

    match parsed {
        Ok(value) if (min..=max).contains(&value) => value,
        Ok(value) => panic!("{}={} is outside {}..={}", var, value, min, max),
        Err(e) => panic!("{}={:?} is not a number: {}", var, raw, e),
    }
}

fn configure_stage_binaries() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    for stage in ["stage0", "stage2"] {
        let script = manifest_dir.join("linker").join(format!("{}.ld", stage));
        if !script.exists() {
            panic!("Linker script not found: {}", script.display());
        }
        println!("cargo:rustc-link-arg-bin={}=-T{}", stage, script.display());
        println!("cargo:rustc-link-arg-bin={}=--oformat=binary", stage);
        println!("cargo:rustc-link-arg-bin={}=--gc-sections", stage);
    }
}
