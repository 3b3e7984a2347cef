use clap::Parser;
use marginalia_core::accessor::lopdf::LopdfSource;
use marginalia_core::error::MarginaliaError;
use marginalia_core::report;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const REPORT_EXT: &str = "txt";

#[derive(Parser)]
#[command(
    name = "marginalia",
    version,
    about = "Extract severity-graded review comments from PDF annotations"
)]
struct Cli {
    /// Input PDF file
    #[arg(value_parser = existing_file)]
    infile: PathBuf,

    /// Output file (default: infile base name with extension changed to 'txt')
    outfile: Option<PathBuf>,
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("'{value}' is not a file"))
    }
}

/// Input base name with the extension swapped for the report's,
/// resolved against the working directory rather than the input's own.
fn default_outfile(infile: &Path) -> PathBuf {
    let stem = infile.file_stem().unwrap_or_default();
    PathBuf::from(stem).with_extension(REPORT_EXT)
}

fn run(infile: &Path, outfile: &Path) -> Result<(), MarginaliaError> {
    let pdf_bytes = std::fs::read(infile)?;
    let extraction = marginalia_core::load_comments(&pdf_bytes, &LopdfSource::new())?;

    // Created only after extraction succeeded, so parse and encryption
    // failures leave no output file behind
    {
        let file = File::create(outfile)?;
        let mut writer = BufWriter::new(file);
        report::write_report(&extraction.groups, &mut writer)?;
        writer.flush()?;
    }

    let undecodable = extraction.undecodable_count();
    if undecodable > 0 {
        eprintln!("  {undecodable} annotation(s) skipped: contents could not be decoded");
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let outfile = cli
        .outfile
        .clone()
        .unwrap_or_else(|| default_outfile(&cli.infile));

    if let Err(e) = run(&cli.infile, &outfile) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
