use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use moviedb_core::FavoritesStore;
use serde_json::json;

pub fn print_favorites(favorites: &FavoritesStore, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "count": favorites.len(),
            "favorites": render::movies_json(favorites.list(), favorites),
        }));
    } else if output.shows_views() {
        render::print_favorites(favorites);
    }
}

/// Favorites never need the remote service, so no API key is required here
pub fn run_list(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let favorites = ctx.open_favorites()?;
    print_favorites(&favorites, output);
    Ok(())
}

pub fn run_remove(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut favorites = ctx.open_favorites()?;

    let Some(title) = favorites.get(imdb_id).map(|m| m.title.clone()) else {
        output.warn(format!("{} is not in your favorites", imdb_id));
        return Ok(());
    };

    favorites.remove(imdb_id);
    output.success(format!("Removed '{}' from favorites", title));
    Ok(())
}
