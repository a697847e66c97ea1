//! silt CLI — the human interface to silt.
//!
//! A thin dispatcher: argument parsing and rendering live here, all
//! repository semantics live in silt-core. Benign outcomes (repository
//! already initialized, nothing to commit) exit 0; everything else that
//! fails exits 1 with an `error:` line on stderr.

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use silt_core::diff::DiffKind;
use silt_core::repo::{CommitView, FileChange};
use silt_core::{Repository, SiltError};

#[derive(Parser)]
#[command(name = "silt", about = "silt — minimal content-addressable version control", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new silt repository.
    Init,

    /// Stage a file for the next commit.
    Add {
        /// Path of the file to stage.
        file: String,
    },

    /// Snapshot the staged files as a new commit.
    Commit {
        /// Commit message.
        message: String,
    },

    /// Show commit history, newest first.
    Log,

    /// Show a commit and its line diff against the parent.
    Show {
        /// Commit hash (short prefixes accepted).
        commit: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("error: cannot determine current directory: {e}");
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Init => cmd_init(&cwd),
        Commands::Add { file } => cmd_add(&cwd, &file),
        Commands::Commit { message } => cmd_commit(&cwd, &message),
        Commands::Log => cmd_log(&cwd),
        Commands::Show { commit } => cmd_show(&cwd, &commit),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn cmd_init(cwd: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match Repository::init(cwd) {
        Ok(_) => {
            println!("initialized silt repository in .silt/");
            Ok(())
        }
        Err(SiltError::AlreadyInitialized) => {
            println!("silt repository already initialized — nothing to do");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_add(cwd: &Path, file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(cwd)?;
    let entry = repo.add(file)?;
    println!("added {} ({})", entry.path, &entry.hash[..12]);
    Ok(())
}

fn cmd_commit(cwd: &Path, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(cwd)?;

    match repo.commit(message) {
        Ok((id, commit)) => {
            println!("committed {id}");
            println!("  message: {}", commit.message);
            println!("  files:   {} entr{}", commit.files.len(), plural_y(commit.files.len()));
            Ok(())
        }
        Err(SiltError::NothingToCommit) => {
            println!("nothing to commit");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_log(cwd: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(cwd)?;

    let mut printed_any = false;
    for item in repo.history()? {
        // History already printed stays on screen even when the chain
        // turns out to be corrupt further down.
        let (id, commit) = item?;
        if printed_any {
            println!();
        }
        println!("commit {id}");
        println!(
            "  time:    {}",
            commit.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("  message: {}", commit.message);
        printed_any = true;
    }

    if !printed_any {
        println!("no commits yet");
    }

    Ok(())
}

fn cmd_show(cwd: &Path, commit: &str) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(cwd)?;
    let view = repo.show(commit)?;
    render_commit_view(&view);
    Ok(())
}

fn render_commit_view(view: &CommitView) {
    println!("commit {}", view.id);
    println!(
        "  time:    {}",
        view.commit.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  message: {}", view.commit.message);
    println!();

    let Some(comparisons) = &view.comparisons else {
        println!("no prior version to compare");
        return;
    };

    for comparison in comparisons {
        match &comparison.change {
            FileChange::Introduced => {
                println!("new file: {}", comparison.path);
            }
            FileChange::Modified(segments) => {
                println!("--- a/{}", comparison.path);
                println!("+++ b/{}", comparison.path);
                for segment in segments {
                    let prefix = match segment.kind {
                        DiffKind::Added => "+",
                        DiffKind::Removed => "-",
                        DiffKind::Equal => " ",
                    };
                    // Segment text keeps its own line terminator.
                    print!("{prefix}{}", segment.text);
                    if !segment.text.ends_with('\n') {
                        println!();
                    }
                }
            }
        }
    }
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
