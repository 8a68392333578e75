use comfy_table::{Attribute, Cell, Color, Table};
use moviedb_core::FavoritesStore;
use moviedb_models::{EditableField, Movie};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

pub const RETRY_HINT: &str = "Try searching for a different movie.";
pub const WELCOME_TITLE: &str = "Welcome to MovieDB";
pub const WELCOME_HINT: &str = "Search for movies with 'moviedb search <title>' to get started.";
pub const NO_FAVORITES_TITLE: &str = "No Favorites Yet";
pub const NO_FAVORITES_HINT: &str =
    "Search for movies and toggle the favorite flag on any movie to add them here.";
pub const POSTER_PLACEHOLDER: &str = "(no poster available)";
const FAVORITE_MARKER: &str = "★";

pub fn saved_count(count: usize) -> String {
    format!("{} movie{} saved", count, if count == 1 { "" } else { "s" })
}

pub fn rating_line(movie: &Movie) -> String {
    format!("{}/10", movie.imdb_rating.as_deref().unwrap_or("N/A"))
}

fn styled(table: &mut Table) {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
}

/// Card grid rendered as one row per movie
pub fn movie_table(movies: &[Movie], favorites: &FavoritesStore) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("").add_attribute(Attribute::Bold),
        Cell::new("IMDb ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
    ]);
    for movie in movies {
        let marker = if favorites.contains(&movie.imdb_id) {
            Cell::new(FAVORITE_MARKER).fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(&movie.imdb_id),
            Cell::new(&movie.title),
            Cell::new(&movie.year),
            Cell::new(movie.media_type.to_string()),
        ]);
    }
    styled(&mut table);
    table
}

/// Detail panel. While editing, `working` holds the unsaved values and is
/// shown next to the saved record.
pub fn detail_table(movie: &Movie, is_favorite: bool, working: Option<&Movie>) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        Cell::new(&movie.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(if is_favorite {
            format!("{} Favorite", FAVORITE_MARKER)
        } else {
            "Not a favorite".to_string()
        }),
    ];
    if working.is_some() {
        header.push(Cell::new("Editing").fg(Color::Yellow).add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    table.add_row(vec![Cell::new("IMDb ID"), Cell::new(&movie.imdb_id)]);
    table.add_row(vec![
        Cell::new("Poster"),
        Cell::new(movie.poster.url_or(POSTER_PLACEHOLDER)),
    ]);
    for field in EditableField::ALL {
        let mut row = vec![
            Cell::new(field.label()),
            Cell::new(movie.field(field).unwrap_or("")),
        ];
        if let Some(working) = working {
            let value = working.field(field).unwrap_or("");
            let cell = if working.field(field) != movie.field(field) {
                Cell::new(value).fg(Color::Yellow)
            } else {
                Cell::new(value)
            };
            row.push(cell);
        }
        table.add_row(row);
    }
    table.add_row(vec![Cell::new("IMDb Rating"), Cell::new(rating_line(movie))]);
    styled(&mut table);
    table
}

pub fn movie_json(movie: &Movie, is_favorite: bool) -> Value {
    json!({ "movie": movie, "favorite": is_favorite })
}

pub fn movies_json(movies: &[Movie], favorites: &FavoritesStore) -> Value {
    Value::Array(
        movies
            .iter()
            .map(|m| movie_json(m, favorites.contains(&m.imdb_id)))
            .collect(),
    )
}

pub fn print_welcome() {
    println!("\n{}", WELCOME_TITLE.bright_cyan().bold());
    println!("{}", WELCOME_HINT.bright_black());
}

pub fn print_search_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
    eprintln!("{}", RETRY_HINT.bright_black());
}

pub fn print_favorites(favorites: &FavoritesStore) {
    if favorites.is_empty() {
        println!("\n{}", NO_FAVORITES_TITLE.bright_cyan().bold());
        println!("{}", NO_FAVORITES_HINT.bright_black());
        return;
    }

    println!("\n{}", "My Favorite Movies".bright_cyan().bold());
    println!("{}", saved_count(favorites.len()).bright_black());
    println!("{}", movie_table(favorites.list(), favorites));
}
