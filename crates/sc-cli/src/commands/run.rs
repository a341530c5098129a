use crate::{is_stdio, resolve, Console};
use anyhow::{Context, Result};
use clap::Args;
use sc_compactor::compact_profile;
use sc_core::{load_config, CompactionParams, Constants, Profile};
use sc_io::{format_for_path, CsvTable, ProfileFormat, SampleFile};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration file. Defaults to compaction.toml when it exists.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not actually run the model.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit status messages and the parameters to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Initial layers, top first ("-" for stdin).
    #[arg(default_value = "porosity.csv")]
    pub input: PathBuf,

    /// Compacted layers ("-" for stdout).
    #[arg(default_value = "porosity-out.csv")]
    pub output: PathBuf,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            dry_run: false,
            verbose: false,
            input: PathBuf::from(SampleFile::Porosity.name()),
            output: PathBuf::from("porosity-out.csv"),
        }
    }
}

/// Explicit `--config`, else `compaction.toml` in `workdir` if present.
fn config_path(args: &RunArgs, workdir: &Path) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(resolve(workdir, path)),
        None => {
            let default = workdir.join(SampleFile::Config.name());
            if default.is_file() {
                Some(default)
            } else {
                info!("no {} found, using default constants", SampleFile::Config.name());
                None
            }
        }
    }
}

fn read_input(path: &Path, workdir: &Path, console: &mut Console<'_>) -> Result<Profile> {
    if is_stdio(path) {
        return CsvTable::new().read(console.stdin).context("reading layers from stdin");
    }
    let path = resolve(workdir, path);
    format_for_path(&path)
        .read_file(&path)
        .with_context(|| format!("reading {}", path.display()))
}

fn write_output(
    profile: &Profile,
    path: &Path,
    workdir: &Path,
    console: &mut Console<'_>,
) -> Result<()> {
    if is_stdio(path) {
        CsvTable::new().write(profile, console.stdout)?;
        console.stdout.flush()?;
        return Ok(());
    }
    let path = resolve(workdir, path);
    format_for_path(&path)
        .write_file(profile, &path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Compact the input profile and write the result.
///
/// Returns the constants the run used.
pub fn execute(args: &RunArgs, workdir: &Path, console: &mut Console<'_>) -> Result<Constants> {
    let config = config_path(args, workdir);
    let constants = load_config(config.as_deref()).with_context(|| match &config {
        Some(path) => format!("loading {}", path.display()),
        None => "loading default constants".to_string(),
    })?;

    if args.verbose {
        write!(console.stderr, "{}", constants.to_toml()?)?;
    }

    if args.dry_run {
        writeln!(console.stderr, "Nothing to do.")?;
        return Ok(constants);
    }

    let initial = read_input(&args.input, workdir, console)?;
    debug!(layers = initial.len(), "compacting profile");
    let compacted = compact_profile(&initial, &CompactionParams::from(&constants))?;
    write_output(&compacted, &args.output, workdir, console)?;

    writeln!(console.stderr, "Finished! Output written to {}", args.output.display())?;
    Ok(constants)
}
