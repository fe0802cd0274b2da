//! binspill Inspect Tool
//!
//! Lists or dumps leftover page files in a scratch directory. Useful for
//! post-mortem inspection of a run that was aborted mid-iteration.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use binspill::codec::read_groups;

/// binspill scratch directory inspector
#[derive(Parser, Debug)]
#[command(name = "binspill-inspect")]
#[command(about = "Inspect leftover binspill page files")]
#[command(version)]
struct Args {
    /// Scratch directory to inspect
    scratch_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List page files with sizes
    List,

    /// Dump the key groups of one page file
    Dump {
        /// Page file name (as printed by `list`)
        file: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,binspill=debug"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::List => list_pages(&args.scratch_dir),
        Commands::Dump { file } => dump_page(&args.scratch_dir.join(file)),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Print every page file in the directory with its size
fn list_pages(dir: &Path) -> binspill::Result<()> {
    let mut names: Vec<(String, u64)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            names.push((name, entry.metadata()?.len()));
        }
    }

    // Zero-padded names: lexical sort equals page id order
    names.sort();

    if names.is_empty() {
        println!("no page files in {}", dir.display());
        return Ok(());
    }

    for (name, size) in names {
        println!("{:>12}  {}", size, name);
    }
    Ok(())
}

/// Decode one page file and print its key groups
fn dump_page(path: &Path) -> binspill::Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut groups = BTreeMap::new();
    read_groups(&mut reader, &mut groups)?;

    println!("{}: {} key groups", path.display(), groups.len());
    for (key, records) in &groups {
        println!("  key {:>12}  {} record(s)", key, records.len());
        for record in records {
            println!(
                "    num_obs={} features={:?}",
                record.num_obs, record.features
            );
        }
    }
    Ok(())
}
