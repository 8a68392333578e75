use super::movie::{load_detail, print_detail, report_save, report_toggle};
use super::prompts::{prompt_select, prompt_string, prompt_yes_no};
use super::search::{print_search_state, search_with_spinner};
use super::ui::is_interactive;
use super::{favorites::print_favorites, AppContext};
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use moviedb_core::{Session, View};
use moviedb_models::{EditableField, Movie};

enum Step {
    Continue,
    Quit,
}

pub async fn run_browse(output: &Output) -> Result<()> {
    if !is_interactive() || !output.is_human() {
        return Err(color_eyre::eyre::eyre!(
            "'moviedb browse' needs an interactive terminal and human output"
        ));
    }

    let ctx = AppContext::load()?;
    let mut session = ctx.open_session()?;
    render::print_welcome();

    loop {
        let step = match session.view() {
            View::Results => results_menu(&mut session, output).await?,
            View::Detail => detail_menu(&mut session, output).await?,
            View::Favorites => favorites_menu(&mut session, output).await?,
        };
        if let Step::Quit = step {
            break;
        }
    }

    tracing::debug!("Browse session ended with {} favorites", session.favorites().len());
    Ok(())
}

fn card_label(movie: &Movie, is_favorite: bool) -> String {
    format!(
        "{}{} ({}) [{}]",
        if is_favorite { "★ " } else { "" },
        movie.title,
        movie.year,
        movie.imdb_id
    )
}

async fn new_search(session: &mut Session, output: &Output) -> Result<()> {
    let query = prompt_string("Search movies", None)?;
    search_with_spinner(session, &query, output).await;
    print_search_state(session, output);
    Ok(())
}

async fn open_movie(session: &mut Session, imdb_id: &str, output: &Output) {
    if load_detail(session, imdb_id, output).await {
        print_detail(session, output);
    }
}

async fn results_menu(session: &mut Session, output: &Output) -> Result<Step> {
    let results: Vec<Movie> = session.search_flow().results().to_vec();

    let mut items: Vec<String> = results
        .iter()
        .map(|m| card_label(m, session.is_favorite(&m.imdb_id)))
        .collect();
    items.push("New search".to_string());
    items.push("Favorites".to_string());
    items.push("Quit".to_string());

    let choice = prompt_select("Choose a movie or action", &items)?;
    if let Some(movie) = results.get(choice) {
        open_movie(session, &movie.imdb_id, output).await;
        return Ok(Step::Continue);
    }

    match choice - results.len() {
        0 => new_search(session, output).await?,
        1 => {
            session.show_favorites();
            print_favorites(session.favorites(), output);
        }
        _ => return Ok(Step::Quit),
    }
    Ok(Step::Continue)
}

async fn detail_menu(session: &mut Session, output: &Output) -> Result<Step> {
    // Failed fetch: nothing to act on, go back
    if session.detail_flow().current().is_none() {
        session.show_results();
        return Ok(Step::Continue);
    }

    if session.detail_flow().is_editing() {
        return edit_menu(session, output);
    }

    let favorite_action = if session.detail_flow().is_favorite(session.favorites()) {
        "Remove from favorites"
    } else {
        "Add to favorites"
    };
    let items = [favorite_action, "Edit", "Back to results", "Favorites", "New search", "Quit"];

    match prompt_select("Movie", &items)? {
        0 => toggle_detail(session, output)?,
        1 => {
            session
                .detail_flow_mut()
                .begin_edit()
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            print_detail(session, output);
        }
        2 => {
            session.show_results();
            print_search_state(session, output);
        }
        3 => {
            session.show_favorites();
            print_favorites(session.favorites(), output);
        }
        4 => new_search(session, output).await?,
        _ => return Ok(Step::Quit),
    }
    Ok(Step::Continue)
}

fn toggle_detail(session: &mut Session, output: &Output) -> Result<()> {
    let now_favorite = session
        .toggle_detail_favorite()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    report_toggle(session, now_favorite, output);
    Ok(())
}

fn edit_menu(session: &mut Session, output: &Output) -> Result<Step> {
    let working = session
        .detail_flow()
        .working_copy()
        .cloned()
        .ok_or_else(|| color_eyre::eyre::eyre!("No edit in progress"))?;

    let mut items: Vec<String> = EditableField::ALL
        .iter()
        .map(|field| format!("{}: {}", field.label(), working.field(*field).unwrap_or("")))
        .collect();
    items.push("Save".to_string());
    items.push("Cancel".to_string());
    items.push("Toggle favorite".to_string());

    let choice = prompt_select("Edit movie", &items)?;
    if let Some(field) = EditableField::ALL.get(choice).copied() {
        let value = prompt_string(field.label(), working.field(field))?;
        session
            .detail_flow_mut()
            .set_field(field, value)
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        return Ok(Step::Continue);
    }

    match choice - EditableField::ALL.len() {
        0 => {
            let synced = session.save_edit().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            report_save(session, synced, output);
            print_detail(session, output);
        }
        1 => {
            if prompt_yes_no("Discard unsaved changes?", Some(true))? {
                session
                    .detail_flow_mut()
                    .cancel_edit()
                    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
                print_detail(session, output);
            }
        }
        _ => toggle_detail(session, output)?,
    }
    Ok(Step::Continue)
}

async fn favorites_menu(session: &mut Session, output: &Output) -> Result<Step> {
    let favorites: Vec<Movie> = session.favorites().list().to_vec();

    let mut items: Vec<String> = favorites.iter().map(|m| card_label(m, true)).collect();
    items.push("Back to results".to_string());
    items.push("New search".to_string());
    items.push("Quit".to_string());

    let choice = prompt_select("Choose a favorite or action", &items)?;
    if let Some(movie) = favorites.get(choice) {
        match prompt_select(&movie.title, &["View details", "Remove from favorites", "Back"])? {
            0 => open_movie(session, &movie.imdb_id, output).await,
            1 => {
                if session.remove_favorite(&movie.imdb_id) {
                    output.success(format!("Removed '{}' from favorites", movie.title));
                }
                print_favorites(session.favorites(), output);
            }
            _ => {}
        }
        return Ok(Step::Continue);
    }

    match choice - favorites.len() {
        0 => {
            session.show_results();
            print_search_state(session, output);
        }
        1 => new_search(session, output).await?,
        _ => return Ok(Step::Quit),
    }
    Ok(Step::Continue)
}
