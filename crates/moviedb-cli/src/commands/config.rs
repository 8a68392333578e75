use super::prompts;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use moviedb_config::{Config, CredentialStore, PathManager, API_KEY_PLACEHOLDER};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Init { api_key } => init_config(api_key, output),
    }
}

/// Where the API key that would be used comes from
fn api_key_source(config: &Config, credentials: &CredentialStore) -> (&'static str, Option<String>) {
    match config.resolve_api_key_with_source(credentials) {
        Ok((source, key)) => (source.label(), Some(key)),
        Err(_) => ("not set", None),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Defaults are used until you run 'moviedb config init'.");
    }

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    let (key_source, key) = api_key_source(&config, &credentials);
    let key_display = match &key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let data_dir = config.data_dir(path_manager.data_dir());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "credentials_file": path_manager.credentials_file().display().to_string(),
            "omdb": {
                "base_url": config.omdb.base_url,
                "search_type": config.omdb.search_type,
                "timeout_seconds": config.omdb.timeout_seconds,
                "api_key": key_display,
                "api_key_source": key_source,
            },
            "storage": {
                "favorites_key": config.storage.favorites_key,
                "data_dir": data_dir.display().to_string(),
            },
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());

    let mut info_table = Table::new();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);
    info_table.add_row(vec![
        Cell::new("Credentials File"),
        Cell::new(path_manager.credentials_file().display().to_string()),
    ]);
    info_table.load_preset(comfy_table::presets::UTF8_FULL);
    info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", info_table);
    println!();

    let mut omdb_table = Table::new();
    omdb_table.set_header(vec![
        Cell::new("OMDb").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    omdb_table.add_row(vec![Cell::new("Base URL"), Cell::new(&config.omdb.base_url)]);
    omdb_table.add_row(vec![Cell::new("Search Type"), Cell::new(config.omdb.search_type.to_string())]);
    omdb_table.add_row(vec![
        Cell::new("Timeout"),
        Cell::new(format!("{} seconds", config.omdb.timeout_seconds)),
    ]);
    omdb_table.add_row(vec![
        Cell::new("API Key"),
        Cell::new(format!("{} ({})", key_display, key_source)),
    ]);
    omdb_table.load_preset(comfy_table::presets::UTF8_FULL);
    omdb_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", omdb_table);
    println!();

    let mut storage_table = Table::new();
    storage_table.set_header(vec![
        Cell::new("Favorites Storage").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    storage_table.add_row(vec![Cell::new("Key"), Cell::new(&config.storage.favorites_key)]);
    storage_table.add_row(vec![Cell::new("Data Directory"), Cell::new(data_dir.display().to_string())]);
    storage_table.load_preset(comfy_table::presets::UTF8_FULL);
    storage_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", storage_table);

    if key.is_none() {
        println!(
            "\n{}",
            "No OMDb API key configured. Run 'moviedb config init' to add one.".yellow()
        );
    }

    Ok(())
}

fn init_config(api_key_arg: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    if config_file.exists() {
        output.info(format!("Keeping existing configuration at {}", config_file.display()));
    } else {
        Config::default()
            .save_to_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
        output.success(format!("Created configuration: {}", config_file.display()));
    }

    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    if credentials.get_omdb_api_key().is_some()
        && api_key_arg.is_none()
        && !prompts::prompt_yes_no("An OMDb API key is already stored. Replace it?", Some(false))?
    {
        output.info("API key unchanged");
        return Ok(());
    }

    let api_key = match api_key_arg {
        Some(key) => key.trim().to_string(),
        None => {
            output.info("Get a free key at https://www.omdbapi.com/apikey.aspx");
            prompts::prompt_secret("OMDb API key")?
        }
    };
    validate_api_key(&api_key).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    credentials.set_omdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("API key saved to {}", credentials.path().display()));
    Ok(())
}

fn validate_api_key(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input == API_KEY_PLACEHOLDER {
        return Err("Replace the placeholder with your own API key");
    }
    if input.chars().any(char::is_whitespace) {
        return Err("API key cannot contain whitespace");
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    let count = s.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let head: String = s.chars().take(2).collect();
    let tail: String = s.chars().skip(count - 2).collect();
    format!("{}***{}", head, tail)
}
