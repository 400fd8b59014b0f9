use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use twentyq::prelude::*;

/// Twenty questions in the terminal.
///
/// Each line is one question: the answer (`y`, `n` or `?`), a space,
/// then the question text.
#[derive(Parser, Debug)]
#[command(name = "twentyq-terminal")]
#[command(version, about, long_about = None)]
struct Args {
    /// Participant names, in turn order
    names: Vec<String>,

    /// Round duration in seconds
    #[arg(short = 'd', long, default_value_t = Roster::DEFAULT_DURATION_SECS)]
    duration: u32,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Print the final round as JSON
    #[arg(long)]
    json: bool,
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

fn parse_line(line: &str) -> Option<(Outcome, &str)> {
    let line = line.trim_start();
    let (key, question) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let outcome = match key.to_ascii_lowercase().as_str() {
        "y" | "yes" => Outcome::Affirmative,
        "n" | "no" => Outcome::Negative,
        "?" => Outcome::Unknown,
        _ => return None,
    };
    Some((outcome, question))
}

fn prompt(snapshot: &RoundSnapshot) {
    if let Some(p) = snapshot.active_participant() {
        println!(
            "[{}s] {}, ask your question ({} left):",
            snapshot.remaining_secs,
            p.name,
            snapshot.questions_left()
        );
    }
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

fn build_host(args: &Args) -> Result<Host, TwentyqError> {
    let mut host = Host::with_config(
        Roster::new(args.duration)?,
        RoundConfig::with_tick_interval(Duration::from_millis(args.tick_ms)),
    );
    for name in &args.names {
        host.add_participant(name)?;
    }
    Ok(host)
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

async fn play(round: RoundHandle) -> Result<RoundSnapshot, Box<dyn std::error::Error>> {
    let mut updates = round.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown_secs = round.snapshot().remaining_secs;
    prompt(&round.snapshot());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Err(RoundError::Unavailable.into());
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.phase.is_ended() {
                    return Ok(snapshot);
                }
                if snapshot.remaining_secs != shown_secs && snapshot.remaining_secs % 10 == 0 {
                    let marker = if snapshot.is_low_time() { "!!" } else { "--" };
                    println!("{marker} {}s left", snapshot.remaining_secs);
                }
                shown_secs = snapshot.remaining_secs;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: let the clock run out.
                    return round.wait_until_ended().await.map_err(Into::into);
                };
                let Some((outcome, question)) = parse_line(&line) else {
                    println!("start the line with y, n or ? and a space");
                    continue;
                };
                match round.submit_question(question, outcome).await {
                    Ok(snapshot) if snapshot.phase.is_ended() => return Ok(snapshot),
                    Ok(snapshot) => prompt(&snapshot),
                    Err(RoundError::EmptyQuestion) => {
                        println!("please write the question again");
                        prompt(&round.snapshot());
                    }
                    Err(err) if !err.is_user_facing() => {
                        tracing::debug!(%err, "submission ignored");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

fn report(last: &RoundSnapshot) {
    match last.end_reason {
        Some(EndReason::TimeExpired) => println!("time is up!"),
        Some(EndReason::QuotaReached) => println!("all {QUESTION_QUOTA} questions asked!"),
        None => {}
    }
    for (i, q) in last.questions.iter().enumerate() {
        println!("{:>2}. [{}] {}", i + 1, q.outcome, q.content);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    twentyq::telemetry::init_tracing();
    let args = Args::parse();

    let mut host = build_host(&args)?;
    let round = match host.start_round() {
        Ok(round) => round.clone(),
        Err(TwentyqError::Round(RoundError::InvalidRoster)) => {
            eprintln!("at least one participant is needed, e.g. `twentyq-terminal Alice Bob`");
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    let last = play(round).await?;
    host.return_to_lobby();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    } else {
        report(&last);
    }
    Ok(())
}
