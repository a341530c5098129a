use crate::Console;
use anyhow::Result;
use clap::Args;
use sc_io::SampleFile;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Example file to show (compaction.toml or porosity.csv).
    #[arg(value_parser = parse_sample)]
    pub file: SampleFile,
}

fn parse_sample(name: &str) -> std::result::Result<SampleFile, String> {
    SampleFile::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = SampleFile::ALL.iter().map(|f| f.name()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

pub fn execute(args: &GenerateArgs, console: &mut Console<'_>) -> Result<()> {
    write!(console.stdout, "{}", args.file.contents()?)?;
    console.stdout.flush()?;
    Ok(())
}
