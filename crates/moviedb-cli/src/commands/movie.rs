use super::ui::LoadingSpinner;
use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use moviedb_core::{DetailState, Session};
use moviedb_models::EditableField;
use serde_json::json;

/// Field overwrites passed on the command line
#[derive(Debug, Default)]
pub struct FieldEdits {
    pub title: Option<String>,
    pub year: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
}

impl FieldEdits {
    pub fn into_changes(self) -> Vec<(EditableField, String)> {
        [
            (EditableField::Title, self.title),
            (EditableField::Year, self.year),
            (EditableField::Actors, self.actors),
            (EditableField::Director, self.director),
            (EditableField::Genre, self.genre),
            (EditableField::Runtime, self.runtime),
            (EditableField::Plot, self.plot),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Fetch one movie into the detail view, showing a spinner while in flight.
/// Returns false (after reporting the error) when nothing could be displayed.
pub async fn load_detail(session: &mut Session, imdb_id: &str, output: &Output) -> bool {
    if let Some(pending) = session.open_detail(imdb_id) {
        let spinner = LoadingSpinner::start(format!("Loading {}...", pending.imdb_id()), output.shows_views());
        let completion = pending.run().await;
        spinner.finish();
        session.apply_detail(completion);
    }

    match session.detail_flow().state() {
        DetailState::Failed { message } => {
            output.error(message);
            false
        }
        _ => session.detail_flow().current().is_some(),
    }
}

pub fn print_detail(session: &Session, output: &Output) {
    let detail = session.detail_flow();
    let Some(movie) = detail.current() else {
        return;
    };
    let is_favorite = detail.is_favorite(session.favorites());

    if !output.is_human() {
        let mut value = render::movie_json(movie, is_favorite);
        if let Some(working) = detail.working_copy() {
            value["editing"] = json!(working);
        }
        output.json(&value);
    } else if output.shows_views() {
        println!("{}", render::detail_table(movie, is_favorite, detail.working_copy()));
    }
}

pub async fn run_show(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut session = ctx.open_session()?;

    if load_detail(&mut session, imdb_id, output).await {
        print_detail(&session, output);
    }
    Ok(())
}

pub async fn run_toggle_favorite(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut session = ctx.open_session()?;

    if !load_detail(&mut session, imdb_id, output).await {
        return Ok(());
    }

    let now_favorite = session
        .toggle_detail_favorite()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    report_toggle(&session, now_favorite, output);
    Ok(())
}

pub fn report_toggle(session: &Session, now_favorite: bool, output: &Output) {
    let title = session
        .detail_flow()
        .current()
        .map(|m| m.title.as_str())
        .unwrap_or_default();
    if now_favorite {
        output.success(format!("Added '{}' to favorites", title));
    } else {
        output.success(format!("Removed '{}' from favorites", title));
    }
}

pub async fn run_edit(imdb_id: &str, edits: FieldEdits, output: &Output) -> Result<()> {
    let changes = edits.into_changes();
    if changes.is_empty() {
        output.warn("No fields to edit. Use --title, --year, --actors, --director, --genre, --runtime or --plot");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    let mut session = ctx.open_session()?;

    if !load_detail(&mut session, imdb_id, output).await {
        return Ok(());
    }

    let detail = session.detail_flow_mut();
    detail.begin_edit().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    for (field, value) in changes {
        detail
            .set_field(field, value)
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    }

    let synced = session.save_edit().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    report_save(&session, synced, output);
    print_detail(&session, output);
    Ok(())
}

pub fn report_save(session: &Session, synced: bool, output: &Output) {
    let Some(movie) = session.detail_flow().current() else {
        return;
    };
    if synced {
        output.success(format!("Saved changes to favorite '{}'", movie.title));
    } else {
        output.warn(format!(
            "'{}' is not a favorite, so the changes are not kept after this session",
            movie.title
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_edits_keep_given_fields_in_order() {
        let edits = FieldEdits {
            plot: Some("New plot".to_string()),
            title: Some("X".to_string()),
            ..FieldEdits::default()
        };
        assert_eq!(
            edits.into_changes(),
            vec![
                (EditableField::Title, "X".to_string()),
                (EditableField::Plot, "New plot".to_string()),
            ]
        );
    }

    #[test]
    fn test_field_edits_empty() {
        assert!(FieldEdits::default().into_changes().is_empty());
    }
}
