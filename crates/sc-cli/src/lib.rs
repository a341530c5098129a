//! `compaction` command-line tool.
//!
//! Commands:
//! - `compaction setup` writes example input files into the working directory
//! - `compaction generate <FILE>` prints one example input file
//! - `compaction run` compacts `porosity.csv` into `porosity-out.csv`
//!
//! Every command takes the working directory explicitly, so `--cd` never
//! changes the process directory.

pub mod commands;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Compact layers of sediment.
#[derive(Debug, Parser)]
#[command(name = "compaction")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory that relative paths are resolved against.
    #[arg(long, default_value = ".")]
    pub cd: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The `--cd` directory, which must exist.
    pub fn workdir(&self) -> Result<&Path> {
        if !self.cd.is_dir() {
            bail!("{}: not a directory", self.cd.display());
        }
        Ok(&self.cd)
    }

    pub fn verbose(&self) -> bool {
        matches!(&self.command, Commands::Run(args) if args.verbose)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a simulation.
    Run(commands::run::RunArgs),
    /// Show an example input file.
    Generate(commands::generate::GenerateArgs),
    /// Set up a folder of input files for a simulation.
    Setup,
}

/// Standard streams of a command, replaceable in tests.
pub struct Console<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// `path` relative to `workdir` unless it is absolute.
pub fn resolve(workdir: &Path, path: &Path) -> PathBuf {
    workdir.join(path)
}

/// Whether `path` names a standard stream.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
