use std::path::PathBuf;

use clap::Parser;
use quizmaster::{QuizMaster, SessionMode};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file holding the quiz collection
    #[arg(short, long, default_value = "quizzes.json")]
    store: PathBuf,

    /// Give each question a 15 second countdown
    #[arg(short, long)]
    timed: bool,
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();
    let mode = if args.timed {
        SessionMode::Timed
    } else {
        SessionMode::Untimed
    };

    let quiz = QuizMaster::open(args.store, mode).expect("Failed to open quiz store");

    if let Err(e) = quiz.run() {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
