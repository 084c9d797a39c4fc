//! Terminal front end for a demo navigation session
//!
//! Reads commands from stdin and prints the navigation screen after every
//! update. Pass `--json` to print views as JSON lines instead.

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfinder::config::SessionConfig;
use wayfinder::route::Route;
use wayfinder::runtime::{spawn_session, BroadcastSink, SessionError};
use wayfinder::settings::AudioSettings;
use wayfinder::state_machine::{SessionContext, SessionState};
use wayfinder::view::SessionView;

const USAGE: &str = "Commands: next | cancel | reroute | settings key=value... | view | quit. \
Anything else is a question for the assistant.";

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Advance,
    Cancel,
    Reroute,
    Settings(&'a str),
    View,
    Quit,
    Ask(&'a str),
    Blank,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        match head.to_ascii_lowercase().as_str() {
            "" => Command::Blank,
            "next" if rest.is_empty() => Command::Advance,
            "cancel" if rest.is_empty() => Command::Cancel,
            "reroute" if rest.is_empty() => Command::Reroute,
            "settings" => Command::Settings(rest),
            "view" => Command::View,
            "quit" | "exit" => Command::Quit,
            _ => Command::Ask(line),
        }
    }
}

fn render(
    state: &SessionState,
    context: &SessionContext,
    json: bool,
) -> Result<(), serde_json::Error> {
    let view = SessionView::capture(state, context, &Local::now());
    if json {
        println!("{}", serde_json::to_string(&view)?);
    } else {
        println!("{view}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout is reserved for the screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfinder=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let json = std::env::args().skip(1).any(|arg| arg == "--json");

    // Configuration
    let config = SessionConfig::from_env()?;
    let route = Route::demo();
    config.check_route(&route)?;
    let context = SessionContext::generate(&config);
    let initial_state = SessionState::new(
        route,
        AudioSettings {
            language: config.language,
            ..AudioSettings::default()
        },
    );

    let sink = BroadcastSink::new(64);
    let mut updates = sink.subscribe();
    let (handle, runtime_task) = spawn_session(context.clone(), initial_state, sink);

    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest: Option<SessionState> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let sent = match Command::parse(&line) {
                    Command::Blank => Ok(()),
                    Command::Quit => break,
                    Command::Advance => handle.advance().await,
                    Command::Cancel => handle.cancel().await,
                    Command::Reroute => handle.start_reroute().await,
                    Command::View => {
                        if let Some(state) = &latest {
                            render(state, &context, json)?;
                        }
                        Ok(())
                    }
                    Command::Settings(pairs) => {
                        let base = latest
                            .as_ref()
                            .map(|state| *state.audio_settings())
                            .unwrap_or_default();
                        match base.apply_pairs(pairs) {
                            Ok(settings) => handle.update_audio_settings(settings).await,
                            Err(e) => {
                                println!("{e}");
                                Ok(())
                            }
                        }
                    }
                    Command::Ask(question) => handle.submit_question(question).await,
                };
                match sent {
                    Ok(()) => {}
                    Err(SessionError::Closed) => break,
                    Err(e) => println!("{e}"),
                }
            }
            update = updates.recv() => match update {
                Ok(update) => {
                    render(&update.state, &context, json)?;
                    latest = Some(update.state);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Screen fell behind session updates");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown();
    runtime_task.await?;
    Ok(())
}
