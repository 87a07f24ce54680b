//! Development tasks for voxinput
//!
//! Usage:
//!   cargo xtask install     Install release binary and man pages (requires sudo)
//!   cargo xtask uninstall   Remove binary and man pages (requires sudo)
//!   cargo xtask dist        Build release binary and man pages for packaging

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

const BIN_DIR: &str = "/usr/local/bin";
const MAN_DIR: &str = "/usr/local/share/man/man1";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_help();
        return ExitCode::SUCCESS;
    };

    let result = match command.as_str() {
        "install" => install(),
        "uninstall" => uninstall(),
        "dist" => dist().map(|_| ()),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_help();
            Err(anyhow::anyhow!("Unknown command"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    eprintln!(
        r#"
voxinput development tasks

Usage: cargo xtask <COMMAND>

Commands:
  install    Build release binary, install it and its man pages (requires sudo)
  uninstall  Remove voxinput and its man pages (requires sudo)
  dist       Build release binary and man pages for packaging
"#
    );
}

/// Get the project root directory
fn project_root() -> PathBuf {
    let dir = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // xtask is in a subdirectory, go up one level
    dir.parent().unwrap_or(&dir).to_path_buf()
}

/// Build artifacts produced by `dist`
struct Artifacts {
    binary: PathBuf,
    man_pages: Vec<PathBuf>,
}

/// Build the release binary with man page generation enabled
fn dist() -> anyhow::Result<Artifacts> {
    let root = project_root();

    println!("==> Building release binary...");

    let status = Command::new("cargo")
        .args(["build", "--release"])
        .env("VOXINPUT_GEN_MANPAGES", "1")
        .current_dir(&root)
        .status()?;

    if !status.success() {
        anyhow::bail!("Build failed");
    }

    let binary = root.join("target/release/voxinput");
    if !binary.exists() {
        anyhow::bail!("Binary not found at {:?}", binary);
    }

    let man_pages = find_man_pages(&root.join("target/release/build"))?;

    println!("==> Built: {:?}", binary);
    for page in &man_pages {
        println!("    man: {:?}", page);
    }

    Ok(Artifacts { binary, man_pages })
}

/// Locate the man pages written by build.rs under target/release/build/voxinput-*/out/man
fn find_man_pages(build_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut pages = Vec::new();

    for entry in std::fs::read_dir(build_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with("voxinput-") {
            continue;
        }

        let man_dir = entry.path().join("out/man");
        if !man_dir.is_dir() {
            continue;
        }

        for page in std::fs::read_dir(&man_dir)? {
            let page = page?.path();
            if page.extension().is_some_and(|ext| ext == "1") {
                pages.push(page);
            }
        }
    }

    pages.sort();
    pages.dedup_by(|a, b| a.file_name() == b.file_name());
    Ok(pages)
}

/// Build and install binary and man pages
fn install() -> anyhow::Result<()> {
    let artifacts = dist()?;

    let target = format!("{}/voxinput", BIN_DIR);
    println!("==> Installing to {}...", target);
    sudo_install(&artifacts.binary, &target, "755")?;

    for page in &artifacts.man_pages {
        let Some(name) = page.file_name() else {
            continue;
        };
        let target = format!("{}/{}", MAN_DIR, name.to_string_lossy());
        sudo_install(page, &target, "644")?;
    }

    println!("==> Installed successfully!");

    let _ = Command::new(&target).arg("--version").status();

    Ok(())
}

fn sudo_install(source: &Path, target: &str, mode: &str) -> anyhow::Result<()> {
    let status = Command::new("sudo")
        .arg("install")
        .arg(format!("-Dm{}", mode))
        .arg(source)
        .arg(target)
        .status()?;

    if !status.success() {
        anyhow::bail!("Install of {} failed (sudo required)", target);
    }
    Ok(())
}

/// Remove voxinput and its man pages
fn uninstall() -> anyhow::Result<()> {
    println!("==> Removing {}/voxinput and man pages...", BIN_DIR);

    let status = Command::new("sh")
        .arg("-c")
        .arg(format!(
            "sudo rm -f {}/voxinput {}/voxinput.1 {}/voxinput-*.1",
            BIN_DIR, MAN_DIR, MAN_DIR
        ))
        .status()?;

    if !status.success() {
        anyhow::bail!("Uninstall failed (sudo required)");
    }

    println!("==> Uninstalled successfully!");
    Ok(())
}
