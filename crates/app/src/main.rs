//! worddrill: terminal shell around the drill services.
//!
//! All scheduling, scoring, and persistence live in the services crate; this
//! binary only maps lines of input onto the drill operations.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;

use services::{
    AnswerOutcome, Clock, CorrectionDecision, DrillError, DrillService,
};
use storage::{DrillPaths, Storage};

#[derive(Parser)]
#[command(name = "worddrill", version, about = "Adaptive vocabulary drill")]
struct Cli {
    /// Directory holding word_list.md, training_stats.md and log.json
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

const HELP: &str = "\
answer   type a translation (empty line skips to the next word)
:add     keep your last answer as a new meaning
:oops    admit the error and lower mastery
:lookup  print a dictionary search link for the current word
:stats   show session counters
:history show the daily training history
:help    show this help
:quit    exit";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DrillError> {
    let storage = Storage::files(DrillPaths::in_dir(&cli.dir));
    let mut drill = DrillService::bootstrap(Clock::default_clock(), &storage)?;
    info!(dir = %cli.dir.display(), "drill ready");

    println!("(:help for commands)");
    match drill.advance()? {
        Some(word) => println!("word: {}", word.term),
        None => println!("no more words, add some to word_list.md"),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let Some(line) = lines.next() else {
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: failed to read input: {e}");
                break;
            }
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":help" => println!("{HELP}"),
            ":stats" => {
                let snapshot = drill.stats_snapshot();
                println!(
                    "tests: {}  avg mastery: {:.2}%",
                    snapshot.total_tests, snapshot.avg_mastery
                );
            }
            ":history" => {
                for entry in drill.history_series()? {
                    println!(
                        "{}  tests: {}  words: {}  avg mastery: {:.2}%",
                        entry.date,
                        entry.summary.total_tests,
                        entry.summary.total_words,
                        entry.summary.avg_mastery
                    );
                }
            }
            ":lookup" => match drill.current_term() {
                Some(term) => println!("https://www.iciba.com/word?w={term}"),
                None => println!("no word is currently scheduled"),
            },
            ":add" => resolve(&mut drill, CorrectionDecision::AcceptNew),
            ":oops" => resolve(&mut drill, CorrectionDecision::AcknowledgeError),
            input => submit(&mut drill, input)?,
        }
    }

    Ok(())
}

fn submit(drill: &mut DrillService, input: &str) -> Result<(), DrillError> {
    match drill.submit_answer(input) {
        Ok(AnswerOutcome::Correct { mastery }) => {
            println!("✔ correct, mastery now {:.2}%", mastery * 100.0);
            println!("(empty line for the next word)");
        }
        Ok(AnswerOutcome::Incorrect { meanings }) => {
            println!("✖ wrong, correct meanings: {meanings}");
            println!("(:add to keep your answer, :oops to lower mastery)");
        }
        Ok(AnswerOutcome::Skipped) => match drill.current_word() {
            Some(word) => println!("word: {}", word.term),
            None => println!("no more words, add some to word_list.md"),
        },
        Err(e @ (DrillError::AwaitingCorrection | DrillError::NoCurrentWord)) => {
            println!("{e}");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn resolve(drill: &mut DrillService, decision: CorrectionDecision) {
    match drill.resolve_correction(decision) {
        Ok(outcome) => match decision {
            CorrectionDecision::AcceptNew => {
                println!("saved, meanings are now: {}", outcome.meanings);
            }
            CorrectionDecision::AcknowledgeError => {
                println!("mastery lowered to {:.2}%", outcome.mastery * 100.0);
            }
        },
        Err(e) => println!("{e}"),
    }
}
