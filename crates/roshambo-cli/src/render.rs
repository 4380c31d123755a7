//! Terminal rendering for rounds and the session log.

use colored::Colorize;
use roshambo_core::{RoundEvent, RoundResult, SessionLog, Winner};

pub fn banner() {
    println!();
    println!("{}", "  Gesture Rock Paper Scissors".bold().purple());
    println!("{}", "  Play against the AI using your camera!".dimmed());
    println!();
}

pub fn camera_banner(message: &str) {
    println!("{} {}", "CAMERA OFF".on_red().white().bold(), message.red());
}

pub fn help() {
    println!("  play   start a round (Enter works too)");
    println!("  log    show the rounds played so far");
    println!("  quit   leave the game");
}

/// Renders one progress event from the round driver.
pub fn event(event: &RoundEvent) {
    match event {
        RoundEvent::CountdownTick { remaining: 0 } => {}
        RoundEvent::CountdownTick { remaining } => {
            println!("{}", format!("  {remaining}...").yellow().bold());
        }
        RoundEvent::Capturing => {
            println!("{}", "  *snap*".dimmed());
        }
        RoundEvent::Classifying => {
            println!("{}", "  Analyzing...".cyan());
        }
        RoundEvent::Finished { result } => {
            println!("{}", result_block(result));
        }
        RoundEvent::Failed { message } => {
            println!("{} {}", "  Oops!".red().bold(), message.red());
        }
    }
}

/// The result block: YOU vs CPU with emoji, then the winner line.
pub fn result_block(result: &RoundResult) -> String {
    let verdict = match result.winner {
        Winner::User => result.winner.to_string().green().bold(),
        Winner::Computer => result.winner.to_string().red().bold(),
        Winner::Tie => result.winner.to_string().yellow().bold(),
    };
    format!(
        "\n  YOU {} {}  vs  CPU {} {}\n  {}\n",
        result.user.emoji(),
        result.user,
        result.computer.emoji(),
        result.computer,
        verdict,
    )
}

/// Session log, most recent round first.
pub fn log(log: &SessionLog) {
    if log.is_empty() {
        println!("{}", "  No rounds played yet.".dimmed());
        return;
    }
    for entry in log.iter_recent() {
        let tag = match entry.winner {
            Winner::User => "WIN ".green(),
            Winner::Computer => "LOSS".red(),
            Winner::Tie => "TIE ".yellow(),
        };
        println!(
            "  {} {} {} vs {} {}",
            tag,
            entry.user.emoji(),
            entry.user,
            entry.computer.emoji(),
            entry.computer,
        );
    }
}
