//! midicat-ui - Interactive catalog search front end
//!
//! Line-driven terminal client over [`SearchSession`]: plain input
//! replaces the query text (autocomplete fires after the debounce
//! window), `:commands` drive filters and submissions, and session
//! events render as they broadcast.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use midicat_common::config::SearchConfig;
use midicat_common::events::SearchEvent;
use midicat_common::facets::{Difficulty, Genre};
use midicat_common::records::ResultRecord;
use midicat_common::FilterState;
use midicat_ui::SearchSession;

/// Command-line arguments for midicat-ui
#[derive(Parser, Debug)]
#[command(name = "midicat-ui")]
#[command(about = "Interactive search client for the MIDI catalog service")]
#[command(version)]
struct Args {
    /// Base URL of the catalog service
    #[arg(short, long, env = "MIDICAT_SERVICE_URL")]
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "midicat_ui=info,midicat_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = SearchConfig::load(args.service_url.as_deref());

    info!("Starting midicat search client");
    info!("Catalog service: {}", config.service_url);

    let session = SearchSession::new(config).context("Failed to create search session")?;
    let mut events = session.subscribe();

    println!("midicat interactive search (:help for commands)");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                if let Ok(event) = event {
                    render_event(&session, &event).await;
                }
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if !handle_line(&session, line.trim()).await {
                            break;
                        }
                    }
                    None => break, // stdin closed
                }
            }
            _ = signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Apply one input line; returns false to exit
async fn handle_line(session: &SearchSession, line: &str) -> bool {
    if line.is_empty() {
        return true;
    }

    let Some(command) = line.strip_prefix(':') else {
        session.set_query_text(line).await;
        return true;
    };

    let mut parts = command.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match verb {
        "quit" | "q" => return false,
        "help" => print_help(),
        "search" => session.submit_search().await,
        "pick" => {
            match args.first().and_then(|a| a.parse::<usize>().ok()) {
                Some(n) if n >= 1 => {
                    let snapshot = session.snapshot().await;
                    match snapshot.suggestions.get(n - 1) {
                        Some(suggestion) => {
                            let suggestion = suggestion.clone();
                            println!("> {}", suggestion);
                            session.pick_suggestion(&suggestion).await;
                        }
                        None => println!("No suggestion #{}", n),
                    }
                }
                _ => println!("Usage: :pick <number>"),
            }
        }
        "difficulty" => match args.first().and_then(|v| Difficulty::from_str(v)) {
            Some(difficulty) => session.toggle_difficulty(difficulty).await,
            None => println!("Usage: :difficulty <beginner|intermediate|advanced|expert>"),
        },
        "genre" => match args.first().and_then(|v| Genre::from_str(v)) {
            Some(genre) => session.toggle_genre(genre).await,
            None => println!("Usage: :genre <classical|pop|jazz|game|film|other>"),
        },
        "tempo" => {
            if args.len() == 2 {
                match (parse_bound(args[0]), parse_bound(args[1])) {
                    (Some(min), Some(max)) => {
                        session.set_tempo_min(min).await;
                        session.set_tempo_max(max).await;
                    }
                    _ => println!("Tempo bounds must be whole BPM or '-'"),
                }
            } else {
                println!("Usage: :tempo <min|-> <max|->");
            }
        }
        "duration" => match args.first() {
            Some(&"-") => session.set_duration_max(None).await,
            Some(arg) => match arg.parse::<f64>() {
                Ok(secs) => session.set_duration_max(Some(secs)).await,
                Err(_) => println!("Usage: :duration <seconds|->"),
            },
            None => println!("Usage: :duration <seconds|->"),
        },
        "quality" => match args.first().and_then(|a| a.parse::<f64>().ok()) {
            Some(score) => session.set_min_quality(score).await,
            None => println!("Usage: :quality <score>"),
        },
        "clear" => session.clear_filters().await,
        "dismiss" => session.dismiss_suggestions().await,
        "state" => {
            let snapshot = session.snapshot().await;
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Failed to render state: {}", e),
            }
        }
        other => println!("Unknown command :{} (:help lists commands)", other),
    }

    true
}

/// Parse a numeric bound argument, with '-' meaning unset
fn parse_bound(arg: &str) -> Option<Option<u32>> {
    if arg == "-" {
        Some(None)
    } else {
        arg.parse::<u32>().ok().map(Some)
    }
}

/// Render one broadcast event to the terminal
async fn render_event(session: &SearchSession, event: &SearchEvent) {
    match event {
        SearchEvent::SuggestionsUpdated { suggestions, .. } => {
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("  {}. {}", i + 1, suggestion);
            }
        }
        SearchEvent::FiltersChanged { filters, .. } => {
            println!("filters: {}", describe_filters(filters));
        }
        SearchEvent::SearchStarted { .. } => {
            println!("searching...");
        }
        SearchEvent::SearchCompleted { result_count, .. } => {
            println!("{} result(s)", result_count);
            let snapshot = session.snapshot().await;
            render_results(&snapshot.results);
        }
        SearchEvent::SearchFailed { message, .. } => {
            println!("{}", message);
        }
    }
}

/// One-line summary of the active filters
fn describe_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();

    if !filters.difficulties.is_empty() {
        let values: Vec<&str> = filters.difficulties.iter().map(|d| d.as_str()).collect();
        parts.push(format!("difficulty={}", values.join(",")));
    }
    if !filters.genres.is_empty() {
        let values: Vec<&str> = filters.genres.iter().map(|g| g.as_str()).collect();
        parts.push(format!("genre={}", values.join(",")));
    }
    if let Some(bpm) = filters.tempo_min {
        parts.push(format!("tempo>={}", bpm));
    }
    if let Some(bpm) = filters.tempo_max {
        parts.push(format!("tempo<={}", bpm));
    }
    if let Some(secs) = filters.duration_max_secs {
        parts.push(format!("duration<={}s", secs));
    }
    parts.push(format!("quality>={}", filters.min_quality));

    parts.join(" ")
}

fn render_results(results: &[ResultRecord]) {
    for (i, record) in results.iter().enumerate() {
        let title = if record.title.is_empty() {
            "(untitled)"
        } else {
            record.title.as_str()
        };
        let composer = if record.composer.is_empty() {
            "(unknown)"
        } else {
            record.composer.as_str()
        };

        let mut line = format!(
            "  {}. {} by {} [{}/{}]",
            i + 1,
            title,
            composer,
            record.genre.as_str(),
            record.difficulty.as_str(),
        );
        if let Some(bpm) = record.tempo_bpm {
            line.push_str(&format!(" {} BPM", bpm));
        }
        if let Some(secs) = record.duration_secs {
            line.push_str(&format!(" {}", format_duration(secs)));
        }
        if record.quality_score > 0.0 {
            line.push_str(&format!(" q={:.1}", record.quality_score));
        }
        println!("{}", line);
    }
}

/// Format seconds as m:ss
fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn print_help() {
    println!("Type text to update the query (suggestions follow after a pause)");
    println!("Commands:");
    println!("  :search                     run a search with the current text and filters");
    println!("  :pick <n>                   adopt suggestion n and search immediately");
    println!("  :difficulty <value>         toggle a difficulty facet");
    println!("  :genre <value>              toggle a genre facet");
    println!("  :tempo <min|-> <max|->      set tempo bounds in BPM");
    println!("  :duration <seconds|->       cap result duration");
    println!("  :quality <score>            set the minimum quality score (0-10)");
    println!("  :clear                      reset the query text and all filters");
    println!("  :dismiss                    close the suggestion list");
    println!("  :state                      print the session state as JSON");
    println!("  :quit                       exit");
}
