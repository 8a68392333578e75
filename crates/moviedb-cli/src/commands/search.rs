use super::ui::LoadingSpinner;
use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use moviedb_core::{SearchState, Session};
use serde_json::json;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut session = ctx.open_session()?;

    search_with_spinner(&mut session, query, output).await;
    print_search_state(&session, output);
    Ok(())
}

/// Run one search, showing a spinner while it is in flight
pub async fn search_with_spinner(session: &mut Session, query: &str, output: &Output) {
    let pending = session.start_search(query);
    let spinner = LoadingSpinner::start(format!("Searching for '{}'...", query), output.shows_views());
    let completion = pending.run().await;
    spinner.finish();
    session.apply_search(completion);
}

pub fn print_search_state(session: &Session, output: &Output) {
    let favorites = session.favorites();

    match session.search_flow().state() {
        SearchState::Idle | SearchState::Loading { .. } => {
            if output.shows_views() {
                render::print_welcome();
            }
        }
        SearchState::Loaded { query, results } => {
            if !output.is_human() {
                output.json(&json!({
                    "query": query,
                    "results": render::movies_json(results, favorites),
                }));
            } else if output.shows_views() {
                if results.is_empty() {
                    render::print_welcome();
                } else {
                    output.info(format!("{} results for '{}'", results.len(), query));
                    println!("{}", render::movie_table(results, favorites));
                }
            }
        }
        SearchState::Failed { message, .. } => {
            if output.is_human() {
                render::print_search_error(message);
            } else {
                output.error(message);
            }
        }
    }
}
