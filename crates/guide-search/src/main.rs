mod config;
mod error;
mod ingest;
mod model;
mod parser;
mod ranker;
mod state;

use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guide_common::gemini::{GeminiClient, GeminiClientConfig};

use config::Config;
use state::{Event, Phase, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting guide search");

    let config = Config::from_env()?;
    info!(csv_url = %config.csv_url, model = %config.model, "configuration loaded");

    let http = reqwest::Client::new();
    let gemini = GeminiClient::new(GeminiClientConfig::from_env())?;

    let mut session = Session::new();
    session.apply(Event::LoadStarted);
    let guides = ingest::fetch_and_parse_guides(&http, &config.csv_url).await;
    info!(guides = guides.len(), "knowledge base ready");
    session.apply(Event::LoadFinished(guides));
    print_results(&session);

    // One query per line; an empty line clears the search. Searches run to
    // completion before the next line is read, so no two calls overlap.
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let query = line.trim().to_string();
        if query.is_empty() {
            session.apply(Event::SearchCleared);
        } else {
            session.apply(Event::SearchStarted(query.clone()));
            let results =
                ranker::search_guides_with_ai(&gemini, &config.model, &query, &session.guides)
                    .await;
            session.apply(Event::SearchFinished(results));
        }
        print_results(&session);
    }

    info!("stdin closed, shutting down");
    Ok(())
}

fn print_results(session: &Session) {
    debug_assert_ne!(session.phase, Phase::Searching);

    if session.last_query.is_empty() {
        println!("All available guides ({}):", session.results.len());
    } else {
        println!(
            "Top guides for \"{}\" ({} match{}):",
            session.last_query,
            session.results.len(),
            if session.results.len() == 1 { "" } else { "es" }
        );
    }

    for result in &session.results {
        let g = &result.guide;
        if result.reasoning.is_empty() {
            println!("  [{}] {}: {}", g.category, g.title, g.description);
        } else {
            println!(
                "  ({:>3}) [{}] {}: {}",
                result.relevance_score, g.category, g.title, result.reasoning
            );
        }
    }
    println!();
}
