use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

mod image;

use image::ImageLayout;

const TARGET_JSON: &str = "targets/i386-code16-boot.json";
const TARGET_NAME: &str = "i386-code16-boot";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let task = args.next().unwrap_or_else(|| "help".to_string());
    let args: Vec<String> = args.collect();

    match task.as_str() {
        "build" => build_stages(&args),
        "image" => build_image(&args),
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn is_release(args: &[String]) -> bool {
    !args.iter().any(|a| a == "--debug")
}

fn build_stages(args: &[String]) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("+nightly")
        .arg("build")
        .arg("-p").arg("tb-bootloader")
        .arg("--bins")
        .arg("--target").arg(TARGET_JSON)
        .arg("-Z").arg("build-std=core")
        .arg("-Z").arg("build-std-features=compiler-builtins-mem")
        .arg("--features").arg(feature_list(args));
    if is_release(args) {
        cmd.arg("--release");
    }
    run(&mut cmd, "stage build")
}

fn feature_list(args: &[String]) -> String {
    if args.iter().any(|a| a == "--verbose-log") {
        "bios_real_mode,verbose_logging".to_string()
    } else {
        "bios_real_mode".to_string()
    }
}

fn build_image(args: &[String]) -> Result<()> {
    let payload = option(args, "--payload").context("missing --payload <file>")?;
    let out = option(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/tbboot.img"));

    build_stages(args)?;

    let profile = if is_release(args) { "release" } else { "debug" };
    let bin_dir = Path::new("target").join(TARGET_NAME).join(profile);
    let stage0 = read(&bin_dir.join("stage0"))?;
    let stage2 = read(&bin_dir.join("stage2"))?;
    let payload = read(Path::new(payload))?;

    let layout = ImageLayout::from_build();
    let disk = image::assemble(&stage0, &stage2, &payload, &layout)?;

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out, &disk).with_context(|| format!("writing {}", out.display()))?;

    println!(
        "[xtask] image: {} ({} sectors; Stage-0 {} B, Stage-2 {} B, payload {} B)",
        out.display(),
        layout.total_sectors(),
        stage0.len(),
        stage2.len(),
        payload.len()
    );
    Ok(())
}

fn option<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn run(cmd: &mut Command, name: &str) -> Result<()> {
    println!("[xtask] {}: {:?}", name, cmd);
    let status = cmd.status().with_context(|| format!("failed to run {}", name))?;
    if !status.success() {
        bail!("{} failed with status {:?}", name, status);
    }
    Ok(())
}

fn print_help() {
    println!(
        "xtask usage:\n  cargo run -p xtask -- build [--debug] [--verbose-log]\n  cargo run -p xtask -- image --payload <file> [--out <file>] [--debug] [--verbose-log]"
    );
}
