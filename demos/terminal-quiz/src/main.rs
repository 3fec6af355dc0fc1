//! Pass-and-play trivia in the terminal.
//!
//! Usage: `terminal-quiz [questions.json] [config.json]`

use std::path::PathBuf;
use std::str::FromStr;

use quizforge::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
commands:
  add | remove            grow or shrink the roster
  next                    go on to subject selection
  subject <name|Mixed>    choose the subject
  difficulty <n>          questions per player
  start                   begin the game
  pick <n>                highlight option n
  submit                  lock in the highlighted option
  review | back           browse answers, return to results
  restart                 new game, same players
  status | help | quit";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Command {
    Intent(Intent),
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".into());
    };
    let arg = words.collect::<Vec<_>>().join(" ");

    let intent = match verb.to_ascii_lowercase().as_str() {
        "add" => Intent::AddPlayer,
        "remove" => Intent::RemovePlayer,
        "next" => Intent::ProceedToSubjectSelection,
        "subject" if arg.is_empty() => return Err("usage: subject <name|Mixed>".into()),
        "subject" => Intent::SelectSubject(Subject::from(arg)),
        "difficulty" => Intent::SelectDifficulty(parse_number(&arg, "difficulty <n>")?),
        "start" => Intent::StartGame,
        "pick" => {
            // Options are numbered from 1 on screen.
            let n: usize = parse_number(&arg, "pick <n>")?;
            let index = n.checked_sub(1).ok_or("options start at 1")?;
            Intent::SelectOption(index)
        }
        "submit" => Intent::SubmitAnswer,
        "review" => Intent::Review,
        "back" => Intent::BackToResults,
        "restart" => Intent::Restart,
        "status" => return Ok(Command::Status),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Command::Intent(intent))
}

fn parse_number<T: FromStr>(arg: &str, usage: &str) -> Result<T, String> {
    arg.parse().map_err(|_| format!("usage: {usage}"))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(note: &Notification) -> Option<String> {
    let text = match note {
        Notification::PhaseChanged(phase) => format!("\n== {phase} =="),
        Notification::PlayersChanged(players) => {
            let roster: Vec<String> = players
                .iter()
                .map(|p| format!("{} [{}] {}", p.name, p.color, p.score))
                .collect();
            format!("players: {}", roster.join(", "))
        }
        Notification::ProceedAllowed(true) => "type 'next' to choose a subject".into(),
        Notification::StartAllowed(true) => "type 'start' to begin".into(),
        Notification::ProceedAllowed(false)
        | Notification::StartAllowed(false)
        | Notification::SubmitAllowed(_) => return None,
        Notification::QuestionChanged {
            index,
            total,
            question,
        } => {
            let mut out = format!("\nQuestion {}/{}: {}", index + 1, total, question.prompt());
            for (i, option) in question.options().iter().enumerate() {
                out.push_str(&format!("\n  {}) {option}", i + 1));
            }
            out
        }
        Notification::TurnChanged { player, remaining } => {
            format!("{}, your turn ({remaining}s)", player.name)
        }
        Notification::TimeRemaining(0) => "time's up!".into(),
        Notification::TimeRemaining(t) if *t <= 5 || t % 5 == 0 => format!("{t}s left"),
        Notification::TimeRemaining(_) => return None,
        Notification::AnswerRecorded { record, correct } => match (record.answer, *correct) {
            (None, _) => format!("{}: no answer", record.player),
            (Some(_), true) => format!("{}: correct!", record.player),
            (Some(_), false) => format!("{}: wrong", record.player),
        },
        Notification::ResultsReady(standings) => {
            let mut out = String::from("results:");
            for s in standings {
                let crown = if s.is_winner { "  (winner)" } else { "" };
                out.push_str(&format!(
                    "\n  {}. {} {}{crown}",
                    s.rank, s.player.name, s.player.score
                ));
            }
            out.push_str("\ntype 'review' or 'restart'");
            out
        }
        Notification::ReviewReady(entries) => {
            let mut out = String::from("review:");
            for e in entries {
                let mark = if e.is_correct { "ok" } else { "x" };
                out.push_str(&format!(
                    "\n  {}. {}\n     answer: {}  chosen: {} [{}] {mark}",
                    e.index + 1,
                    e.question.prompt(),
                    e.correct_answer,
                    e.chosen_answer,
                    e.color
                ));
            }
            out.push_str("\ntype 'back' to return");
            out
        }
        Notification::BankUnavailable(reason) => {
            format!("questions unavailable ({reason}); the game cannot start")
        }
    };
    Some(text)
}

fn default_bank_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("questions.json")
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    quizforge::init_tracing();

    let mut args = std::env::args().skip(1);
    let bank_path = args.next().map_or_else(default_bank_path, PathBuf::from);
    let config = match args.next() {
        Some(path) => load_config(path).await?,
        None => SessionConfig::default(),
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let quiz = spawn_host(config, tx);

    let printer = tokio::spawn(async move {
        while let Some(note) = rx.recv().await {
            if let Some(text) = render(&note) {
                println!("{text}");
            }
        }
    });

    // The host reports a missing bank itself; the roster menus still work.
    if let Err(e) = quiz.load_bank(&bank_path).await {
        tracing::debug!(error = %e, "continuing without a question bank");
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Status) => {
                let snapshot = quiz.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(Command::Intent(intent)) => match quiz.request(intent).await {
                Ok(()) => {}
                Err(QuizError::Game(reason)) => println!("not now: {reason}"),
                Err(e) => return Err(e.into()),
            },
            Err(msg) => println!("{msg}"),
        }
    }

    quiz.shutdown().await?;
    printer.await?;
    Ok(())
}
