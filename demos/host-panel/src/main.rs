use std::sync::Arc;

use quizhost::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

const HELP: &str = "\
commands (questions are numbered from 1, options from 0):
  code <CODE>              set the room code
  capacity <N>             set max players (before create)
  create                   create the room
  count <N>                start over with N blank questions
  text <Q> <prompt>        set a question's prompt
  option <Q> <0-3> <text>  set one option
  correct <Q> <0-3>        set the correct option
  time <Q> <secs>          set the time limit
  paste <Q>                paste prompt, 4 options, answer; end with '.'
  submit                   send the questions and start
  kick <player-id>         remove a player from the lobby
  board                    show lobby, ranking and countdown
  quit";

#[derive(Debug, PartialEq)]
enum PanelCommand {
    Code(String),
    Capacity(u32),
    Create,
    Count(usize),
    Text(usize, String),
    Option(usize, usize, String),
    Correct(usize, String),
    Time(usize, u32),
    Paste(usize),
    Submit,
    Kick(String),
    Board,
    Help,
    Quit,
}

/// Parses one input line. Question numbers are 1-based on screen and
/// 0-based in the result.
fn parse(line: &str) -> Result<PanelCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let cmd = match word {
        "code" => PanelCommand::Code(rest.to_string()),
        "capacity" => PanelCommand::Capacity(number(rest)?),
        "create" => PanelCommand::Create,
        "count" => PanelCommand::Count(number(rest)?),
        "text" => {
            let (q, text) = split_index(rest)?;
            PanelCommand::Text(q, text.to_string())
        }
        "option" => {
            let (q, rest) = split_index(rest)?;
            let (o, text) = rest.split_once(' ').unwrap_or((rest, ""));
            PanelCommand::Option(q, number(o)?, text.trim().to_string())
        }
        "correct" => {
            let (q, marker) = split_index(rest)?;
            PanelCommand::Correct(q, marker.to_string())
        }
        "time" => {
            let (q, secs) = split_index(rest)?;
            PanelCommand::Time(q, number(secs)?)
        }
        "paste" => PanelCommand::Paste(question(rest)?),
        "submit" => PanelCommand::Submit,
        "kick" if !rest.is_empty() => PanelCommand::Kick(rest.to_string()),
        "board" => PanelCommand::Board,
        "help" | "" => PanelCommand::Help,
        "quit" | "exit" => PanelCommand::Quit,
        other => return Err(format!("unknown command {other:?}, try 'help'")),
    };
    Ok(cmd)
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("expected a number, got {s:?}"))
}

fn question(s: &str) -> Result<usize, String> {
    match number::<usize>(s)? {
        0 => Err("questions are numbered from 1".into()),
        n => Ok(n - 1),
    }
}

fn split_index(s: &str) -> Result<(usize, &str), String> {
    let (q, rest) = s.split_once(' ').unwrap_or((s, ""));
    Ok((question(q)?, rest.trim()))
}

// ---------------------------------------------------------------------------
// Stdin plumbing
// ---------------------------------------------------------------------------

/// Stdin lines, shared between the command loop and the kick prompt.
type Lines = Arc<Mutex<mpsc::Receiver<String>>>;

fn spawn_stdin() -> Lines {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    Arc::new(Mutex::new(rx))
}

async fn next_line(lines: &Lines) -> Option<String> {
    lines.lock().await.recv().await
}

/// Asks on the terminal before every kick.
struct StdinConfirmer {
    lines: Lines,
}

impl KickConfirmer for StdinConfirmer {
    async fn confirm(&self, player: &LobbyPlayer) -> bool {
        println!("kick {} ({})? [y/N]", player.name, player.id);
        matches!(
            next_line(&self.lines).await.as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_event(event: &HostEvent) {
    match event {
        HostEvent::RoomCreated(room) => {
            println!("room {} created for {} players", room.code, room.capacity)
        }
        HostEvent::RoomError { message } => println!("room error: {message}"),
        HostEvent::LobbyUpdated(players) => {
            println!("lobby ({}):", players.len());
            for p in players {
                println!("  {} {} [{}]", p.emoji.as_deref().unwrap_or(" "), p.name, p.id);
            }
        }
        HostEvent::LeaderboardUpdated(ranking) => render_ranking("scores", ranking),
        HostEvent::CountdownTick(secs) => println!("⏱ {secs}s"),
        HostEvent::SessionStarted { room, questions } => {
            println!("session started in {} with {questions} questions", room.code)
        }
        HostEvent::SessionEnded { ranking } => render_ranking("final standings", ranking),
        HostEvent::Disconnected => println!("disconnected from service"),
    }
}

fn render_ranking(title: &str, ranking: &[RankedEntry]) {
    println!("{title}:");
    for row in ranking {
        println!(
            "  #{} {} {} {}",
            row.rank,
            row.emoji.as_deref().unwrap_or(" "),
            row.name,
            row.score
        );
    }
}

fn render_board(snap: &HostSnapshot) {
    println!("phase: {}  code: {:?}  capacity: {}", snap.phase, snap.draft_code, snap.capacity);
    if let Some(secs) = snap.countdown {
        println!("countdown: {secs}s");
    }
    println!("questions: {}", snap.questions.len());
    for (i, q) in snap.questions.iter().enumerate() {
        println!("  {}. {:?} correct={:?} {}s", i + 1, q.text, q.correct, q.time_limit);
    }
    println!("lobby: {}", snap.roster.len());
    render_ranking(if snap.is_final { "final standings" } else { "scores" }, &snap.ranking);
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

async fn dispatch(host: &HostHandle, lines: &Lines, cmd: PanelCommand) -> Result<(), HostError> {
    match cmd {
        PanelCommand::Code(code) => host.set_room_code(code).await,
        PanelCommand::Capacity(n) => host.set_capacity(n).await,
        PanelCommand::Create => host.create_room().await.map(drop),
        PanelCommand::Count(n) => host.set_question_count(n).await,
        PanelCommand::Text(q, text) => host.edit_field(q, FieldEdit::Text(text)).await,
        PanelCommand::Option(q, o, text) => host.edit_option(q, o, text).await,
        PanelCommand::Correct(q, marker) => host.edit_field(q, FieldEdit::Correct(marker)).await,
        PanelCommand::Time(q, secs) => host.edit_field(q, FieldEdit::TimeLimit(secs)).await,
        PanelCommand::Paste(q) => {
            println!("paste question {}, end with a line containing only '.'", q + 1);
            let mut raw = String::new();
            while let Some(line) = next_line(lines).await {
                if line.trim() == "." {
                    break;
                }
                raw.push_str(&line);
                raw.push('\n');
            }
            host.apply_bulk_paste(q, raw).await
        }
        PanelCommand::Submit => host.submit().await.map(drop),
        PanelCommand::Kick(id) => {
            if !host.kick(PlayerId::new(id)).await? {
                println!("kick cancelled");
            }
            Ok(())
        }
        PanelCommand::Board => {
            render_board(&host.snapshot().await?);
            Ok(())
        }
        PanelCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        // Handled by the caller.
        PanelCommand::Quit => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("QUIZHOST_URL").unwrap_or_else(|_| "ws://127.0.0.1:3001".into());
    let lines = spawn_stdin();

    let (host, mut events) = HostHandle::builder()
        .url(&url)
        .connect(StdinConfirmer {
            lines: Arc::clone(&lines),
        })
        .await?;
    tracing::info!(%url, "host panel connected");
    println!("{HELP}");

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            render_event(&event);
        }
    });

    while let Some(line) = next_line(&lines).await {
        let cmd = match parse(&line) {
            Ok(PanelCommand::Quit) => break,
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        match dispatch(&host, &lines, cmd).await {
            Ok(()) => {}
            Err(HostError::ControllerClosed) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    let _ = host.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_room_commands() {
        assert_eq!(parse("code QUIZ42"), Ok(PanelCommand::Code("QUIZ42".into())));
        assert_eq!(parse("capacity 8"), Ok(PanelCommand::Capacity(8)));
        assert_eq!(parse("  create "), Ok(PanelCommand::Create));
        assert!(parse("capacity lots").is_err());
    }

    #[test]
    fn test_parse_question_numbers_are_one_based() {
        assert_eq!(
            parse("text 1 Capital of France?"),
            Ok(PanelCommand::Text(0, "Capital of France?".into()))
        );
        assert_eq!(
            parse("option 2 3 Madrid"),
            Ok(PanelCommand::Option(1, 3, "Madrid".into()))
        );
        assert_eq!(parse("correct 3 0"), Ok(PanelCommand::Correct(2, "0".into())));
        assert_eq!(parse("time 1 30"), Ok(PanelCommand::Time(0, 30)));
        assert_eq!(parse("paste 4"), Ok(PanelCommand::Paste(3)));
        assert!(parse("paste 0").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("kick s-123"), Ok(PanelCommand::Kick("s-123".into())));
        assert!(parse("kick").is_err());
        assert_eq!(parse(""), Ok(PanelCommand::Help));
        assert_eq!(parse("quit"), Ok(PanelCommand::Quit));
        assert!(parse("dance").is_err());
    }
}
