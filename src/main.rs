use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use mytar::{Archive, ArchiveEnd, MemberFilter, Mode, ScanError};

const USAGE: &str = "Usage: mytar [-f ARCHIVE] [-f ARCHIVE -t] [-t -v -f ARCHIVE]\n\
                     \t[-x -f ARCHIVE] [-v -x -f ARCHIVE] [--help] [--usage]...";

const FAILURE_STATUS: &str = "Exiting with failure status due to previous errors";
const NOT_RECOVERABLE: &str = "Error is not recoverable: exiting now";

/// 'mytar' lists and extracts the regular files stored in a tar archive.
///
/// Examples:
///   mytar -f archive.tar -t       # List all files in archive.tar.
///   mytar -x -f archive.tar       # Extract all files from archive.tar.
///   mytar -v -x -f archive.tar    # Extract all files from archive.tar verbosely.
#[derive(Parser, Debug)]
#[command(name = "mytar", version, verbatim_doc_comment)]
struct Args {
    /// Use archive file ARCHIVE
    #[arg(short = 'f', value_name = "ARCHIVE", required_unless_present = "usage")]
    file: Option<PathBuf>,

    /// List the contents of an archive
    #[arg(short = 't')]
    list: bool,

    /// Extract files from an archive
    #[arg(short = 'x')]
    extract: bool,

    /// Verbosely list files processed
    #[arg(short = 'v')]
    verbose: bool,

    /// Give a short usage message
    #[arg(long)]
    usage: bool,

    /// Only list or extract these members
    #[arg(value_name = "FILE")]
    members: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    if args.usage {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }
    ExitCode::from(run(&args))
}

fn run(args: &Args) -> u8 {
    let Some(path) = args.file.as_deref() else {
        eprintln!("{}", USAGE);
        return 2;
    };

    let file = match open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("mytar: {:#}", e);
            eprintln!("mytar: {}", NOT_RECOVERABLE);
            return 2;
        }
    };

    if args.extract && args.list {
        eprintln!("mytar: You must choose one of the '-x', '-t' options");
        return 2;
    }
    if args.verbose && !args.extract && !args.list {
        eprintln!("mytar: You must choose '-v' option with one of the '-x', '-t' options");
        return 2;
    }

    // Listing always prints names, extraction only when asked to.
    let mode = Mode {
        extract: args.extract,
        verbose: args.verbose || args.list,
    };
    let mut filter = MemberFilter::new(args.members.iter().map(String::as_str));
    let result = Archive::open(file)
        .and_then(|mut ar| ar.scan(mode, &mut filter, &mut io::stdout().lock()));

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            // A payload cut short reads the same whether it was being
            // skipped or extracted.
            if e.is_unexpected_eof() {
                eprintln!("mytar: {}", ScanError::UnexpectedEof);
                eprintln!("mytar: {}", NOT_RECOVERABLE);
            } else {
                eprintln!("mytar: {}", e);
                eprintln!("mytar: {}", FAILURE_STATUS);
            }
            return e.exit_code();
        }
    };

    if let ArchiveEnd::LoneZeroBlock(blocks) = report.end {
        eprintln!("mytar: A lone zero block at {}", blocks);
    }

    let mut missing = false;
    for name in filter.missing() {
        eprintln!("mytar: {}: Not found in archive", String::from_utf8_lossy(name));
        missing = true;
    }
    if missing {
        eprintln!("mytar: {}", FAILURE_STATUS);
        return 2;
    }
    0
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("{}: Cannot open", path.display()))
}
