use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::auth::require_session;
use super::open_kv;
use crate::auth::Session;
use crate::core::AppConfig;
use crate::kv::SqliteKv;
use crate::triage::booking::ALREADY_BOOKED_NOTICE;
use crate::triage::{
    Affordances, BookingPanel, BookingSelection, Category, ChatState, ConversationStore, Speaker,
    Turn,
};

const HELP: &str = "Commands: /book tests, /book medicines, /reset, /help, /quit";

fn print_turn(turn: &Turn) {
    match turn.speaker {
        Speaker::User => println!("> {}\n", turn.text),
        Speaker::Assistant => println!("{}\n", turn.text),
    }
}

fn print_affordances(affordances: Affordances) {
    match affordances {
        Affordances::Hidden => {}
        Affordances::AlreadyBooked => println!("{}\n", ALREADY_BOOKED_NOTICE),
        other => {
            let actions: Vec<String> = other
                .bookable()
                .iter()
                .map(|c| format!("/book {}", c))
                .collect();
            println!("[Book with: {}]\n", actions.join(" | "));
        }
    }
}

async fn open_store(config: &AppConfig) -> Result<(ConversationStore<SqliteKv>, Session)> {
    let kv = open_kv(config).await?;
    let session = require_session(&kv).await?;
    Ok((ConversationStore::from_config(kv, config), session))
}

/// Resolve the user's picks, given as item names or 1-based positions.
fn select_items(selection: &mut BookingSelection, picks: &[String]) -> Result<()> {
    for pick in picks {
        let item = match pick.trim().parse::<usize>() {
            Ok(n) if n >= 1 => selection
                .items()
                .get(n - 1)
                .cloned()
                .ok_or(anyhow!("There is no item {}", n))?,
            _ => pick.trim().to_string(),
        };
        selection.toggle(&item)?;
    }
    Ok(())
}

async fn book_latest(
    store: &ConversationStore<SqliteKv>,
    session: &Session,
    state: &mut ChatState,
    category: Category,
    picks: &[String],
) -> Result<Vec<String>> {
    let mut selection = state
        .selection(category)
        .ok_or(anyhow!("Nothing to book for {}", category))?;
    select_items(&mut selection, picks)?;
    let booked = selection.confirm()?;
    store.confirm_booking(session, state, category).await?;
    Ok(booked)
}

/// Split a line like `1, CBC` into picks. `None` when the prompt was
/// cancelled with Ctrl-C or Ctrl-D.
fn parse_picks(read: Result<String, ReadlineError>) -> Result<Option<Vec<String>>> {
    let line = match read {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(
        line.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    ))
}

fn read_picks(
    rl: &mut DefaultEditor,
    category: Category,
    items: &[String],
) -> Result<Option<Vec<String>>> {
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
    parse_picks(rl.readline(&format!("Select {} to book (e.g. 1,2): ", category)))
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let (store, session) = open_store(config).await?;
    let mut rl = DefaultEditor::new()?;

    let mut state = ChatState::default();
    store.load(&session, &mut state).await;
    for turn in state.transcript.turns() {
        print_turn(turn);
    }

    let mut panel = BookingPanel::new();
    panel.settle(&state.transcript);
    print_affordances(panel.visible(&state.transcript, &state.flags));
    println!("{}\n", HELP);

    loop {
        let readline = rl.readline("Describe your symptoms… ");
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };
        let _ = rl.add_history_entry(line.as_str());
        let input = line.trim();

        match input {
            "/quit" | "/exit" => break,
            "/help" => println!("{}\n", HELP),
            "/reset" => {
                if let Err(e) = store.reset_booking_flags(&session, &mut state).await {
                    tracing::error!("Failed to reset bookings: {}", e);
                    println!("Could not reset bookings. Try again later.\n");
                    continue;
                }
                println!("Bookings Reset: You can now test booking again.\n");
                print_affordances(panel.visible(&state.transcript, &state.flags));
            }
            cmd if cmd.starts_with("/book") => {
                let category = match cmd.trim_start_matches("/book").parse::<Category>() {
                    Ok(category) => category,
                    Err(e) => {
                        println!("{}\n", e);
                        continue;
                    }
                };
                // Bookings may have been made from another session
                store.refresh_booking_flags(&session, &mut state).await;
                if !panel.visible(&state.transcript, &state.flags).allows(category) {
                    println!("Nothing to book for {}\n", category);
                    print_affordances(panel.visible(&state.transcript, &state.flags));
                    continue;
                }
                let items = state.recommendation().items(category).to_vec();
                let picks = match read_picks(&mut rl, category, &items) {
                    Ok(Some(picks)) => picks,
                    Ok(None) => {
                        println!("Booking cancelled\n");
                        continue;
                    }
                    Err(e) => {
                        tracing::error!("Failed to read booking selection: {}", e);
                        println!("Booking cancelled\n");
                        continue;
                    }
                };
                match book_latest(&store, &session, &mut state, category, &picks).await {
                    Ok(booked) => println!(
                        "✅ Your selected {} have been booked: {}\n",
                        category,
                        booked.join(", ")
                    ),
                    Err(e) => println!("{}\n", e),
                }
                print_affordances(panel.visible(&state.transcript, &state.flags));
            }
            _ => match store.send(&session, &mut state, input).await {
                Ok(Some(turn)) => {
                    print_turn(&turn);
                    store.refresh_booking_flags(&session, &mut state).await;
                    panel.settle(&state.transcript);
                    print_affordances(panel.visible(&state.transcript, &state.flags));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to save message: {}", e);
                    println!("Sorry, something went wrong. Try again later.\n");
                }
            },
        }
    }

    Ok(())
}

pub async fn history(config: &AppConfig) -> Result<()> {
    let (store, session) = open_store(config).await?;
    let mut state = ChatState::default();
    store.load(&session, &mut state).await;
    for turn in state.transcript.turns() {
        print_turn(turn);
    }
    Ok(())
}

pub async fn reset(config: &AppConfig) -> Result<()> {
    let (store, session) = open_store(config).await?;
    let mut state = ChatState::default();
    store.reset_booking_flags(&session, &mut state).await?;
    println!("Bookings Reset: You can now test booking again.");
    Ok(())
}

pub async fn book(config: &AppConfig, category: Category, picks: &[String]) -> Result<()> {
    let (store, session) = open_store(config).await?;
    let mut state = ChatState::default();
    store.load(&session, &mut state).await;
    let booked = book_latest(&store, &session, &mut state, category, picks).await?;
    println!(
        "✅ Your selected {} have been booked: {}",
        category,
        booked.join(", ")
    );
    Ok(())
}
