use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, favorites, movie, search};
use moviedb_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "moviedb")]
#[command(about = "MovieDB - Search movies and keep your favorites")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily-rotated file instead of stderr (defaults to logs/moviedb.log under the config dir)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search the OMDb catalog by title. Results are listed with a marker for movies already in your favorites.")]
    Search {
        /// Title (or part of a title) to search for
        query: String,
    },
    /// Show full details of one movie
    Show {
        /// IMDb identifier, e.g. tt0111161
        imdb_id: String,
    },
    /// Add a movie to favorites, or remove it if already there
    Favorite {
        /// IMDb identifier, e.g. tt0111161
        imdb_id: String,
    },
    /// Edit the details of a movie
    #[command(long_about = "Fetch a movie, overwrite the given fields and save. Edits are kept only when the movie is one of your favorites; the favorites entry is replaced with the edited record.")]
    Edit {
        /// IMDb identifier, e.g. tt0111161
        imdb_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        actors: Option<String>,

        #[arg(long)]
        director: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        runtime: Option<String>,

        #[arg(long)]
        plot: Option<String>,
    },
    /// List or remove favorites
    Favorites {
        #[command(subcommand)]
        cmd: Option<FavoritesCommands>,
    },
    /// Interactive session: search, view, edit and manage favorites
    Browse,
    /// Inspect or create the configuration
    #[command(long_about = "Manage configuration and credentials for MovieDB. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// List saved favorites
    List,
    /// Remove a favorite by IMDb identifier
    Remove { imdb_id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Create the configuration and store an OMDb API key
    Init {
        /// OMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    // All state lives in one session on one thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        match cli.command {
            Commands::Search { query } => search::run_search(&query, &output).await,
            Commands::Show { imdb_id } => movie::run_show(&imdb_id, &output).await,
            Commands::Favorite { imdb_id } => movie::run_toggle_favorite(&imdb_id, &output).await,
            Commands::Edit {
                imdb_id,
                title,
                year,
                actors,
                director,
                genre,
                runtime,
                plot,
            } => {
                let edits = movie::FieldEdits {
                    title,
                    year,
                    actors,
                    director,
                    genre,
                    runtime,
                    plot,
                };
                movie::run_edit(&imdb_id, edits, &output).await
            }
            Commands::Favorites { cmd } => match cmd.unwrap_or(FavoritesCommands::List) {
                FavoritesCommands::List => favorites::run_list(&output),
                FavoritesCommands::Remove { imdb_id } => favorites::run_remove(&imdb_id, &output),
            },
            Commands::Browse => browse::run_browse(&output).await,
            Commands::Config { cmd } => {
                let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
                config::run_config(cmd, &output)
            }
        }
    })
}
