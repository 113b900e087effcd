//! Unique Numbers entry point
//!
//! Interactive command loop over the session controller. One command runs to
//! completion at a time, mirroring the single-threaded event model the
//! generator assumes.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use unique_numbers::persistence::FileKvStore;
use unique_numbers::{ImportOutcome, Prompt, Session, StartupAction};

/// File holding the persisted generator state inside the data directory
const STORE_FILE: &str = "unique_numbers_store.json";

/// Seeded unique-number generator with persisted history
#[derive(Parser)]
#[command(name = "unique-numbers", version, about)]
struct Cli {
    /// Directory holding the persisted generator state
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory where backup exports are written
    #[arg(long, default_value = ".")]
    backup_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// y/N confirmation on stdin, notifications on stdout
struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  gen <min> <max>   generate a number in [min, max]");
    println!("  history           show the most recent numbers");
    println!("  seed              show current seed and generation count");
    println!("  export            write a backup file");
    println!("  import <file>     restore state from a backup file");
    println!("  help              show this help");
    println!("  quit              exit");
}

fn run_import(session: &mut Session<FileKvStore>, path: &str, prompt: &mut TerminalPrompt) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("Cannot read {path}: {err}");
            return;
        }
    };
    match session.import_backup(&contents, prompt) {
        Ok(ImportOutcome::Restored) => {
            println!("Data restored successfully.");
            if let Some(seed) = session.state().seed {
                println!("Current seed: {seed}");
            }
        }
        Ok(ImportOutcome::Declined) => println!("Restore cancelled; data unchanged."),
        Err(err) => println!("Import failed: {err}"),
    }
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let store = FileKvStore::open(cli.data_dir.join(STORE_FILE));
    let mut session = Session::open(store);
    let mut prompt = TerminalPrompt;

    if session.startup(&mut prompt) == StartupAction::AwaitImport {
        prompt.notify("Enter the path to a backup file:");
        let mut path = String::new();
        if io::stdin().lock().read_line(&mut path).is_ok() && !path.trim().is_empty() {
            run_import(&mut session, path.trim(), &mut prompt);
        }
        if session.state().is_empty() {
            println!("No data restored; the generator will seed itself on first use.");
        }
    }

    print_help();
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break, // EOF
            Ok(_) => {}
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["gen", min, max] => {
                let (Ok(min), Ok(max)) = (min.parse::<i64>(), max.parse::<i64>()) else {
                    println!("min and max must be integers");
                    continue;
                };
                match session.generate(min, max) {
                    Ok(generated) => {
                        println!("Random number: {}", generated.value);
                        if generated.backup_recommended {
                            println!("Consider exporting a backup of your data.");
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            ["gen", ..] => println!("usage: gen <min> <max>"),
            ["history"] => {
                let recent = session.visible_history();
                if recent.is_empty() {
                    println!("No numbers generated yet.");
                } else {
                    for value in recent {
                        println!("{value}");
                    }
                }
            }
            ["seed"] => {
                let state = session.state();
                match state.seed {
                    Some(seed) => println!(
                        "Seed: {seed} ({} generations)",
                        state.generation_count
                    ),
                    None => println!("Not seeded yet."),
                }
            }
            ["export"] => match session.export_backup(&cli.backup_dir) {
                Ok(path) => println!("Backup written to {}", path.display()),
                Err(err) => println!("Export failed: {err}"),
            },
            ["import", path] => run_import(&mut session, path, &mut prompt),
            ["import"] => println!("usage: import <file>"),
            ["help"] => print_help(),
            ["quit"] | ["exit"] => break,
            [cmd, ..] => println!("Unknown command '{cmd}' - try 'help'"),
        }
    }
}
