//! Renders voxinput man pages from the clap definitions in src/cli.rs.
//!
//! Pages are written to $OUT_DIR/man on release builds, or on any build
//! with VOXINPUT_GEN_MANPAGES set. `cargo xtask install` picks them up there.

use clap::CommandFactory;
use clap_mangen::Man;
use std::env;
use std::fs::{self, File};
use std::io::Error;
use std::path::{Path, PathBuf};

include!("src/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=VOXINPUT_GEN_MANPAGES");

    let release = env::var("PROFILE").is_ok_and(|profile| profile == "release");
    if !release && env::var_os("VOXINPUT_GEN_MANPAGES").is_none() {
        return Ok(());
    }

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target"));
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let cmd = Cli::command();
    render(&cmd, &man_dir.join("voxinput.1"))?;

    // voxinput-run.1, voxinput-config.1
    for sub in cmd.get_subcommands().filter(|sub| sub.get_name() != "help") {
        render(sub, &man_dir.join(format!("voxinput-{}.1", sub.get_name())))?;
    }

    Ok(())
}

fn render(cmd: &clap::Command, path: &Path) -> Result<(), Error> {
    let mut file = File::create(path)?;
    Man::new(cmd.clone()).render(&mut file)
}
