use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use lectern::config::Config;
use lectern::db::RatingStore;
use lectern::recommend::{RecommendError, Recommender};

/// Lectern: book recommendations from readers with similar taste.
///
/// Finds readers whose ratings agree with yours and surfaces the books they
/// rated highly that you haven't read yet.
#[derive(Parser)]
#[command(name = "lectern", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import a catalog and reader histories from a JSON seed file
    Import {
        /// Path to the seed document
        path: PathBuf,
    },

    /// Show personalized recommendations for a reader
    Recommend {
        /// The reader's user id
        user_id: String,
    },

    /// Show the most popular books
    Popular {
        /// How many books to list (default: LECTERN_POPULAR_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a rating (0 to 5) of a book by a reader
    Rate {
        user_id: String,
        item_id: String,
        rating: f64,
    },

    /// Run the HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: LECTERN_PORT or 5000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: LECTERN_BIND or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Show database status (size, reader/item/rating counts)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lectern=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Lectern database...");
            let store = lectern::db::initialize_sqlite(&config.db_path)?;
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: load a catalog with `lectern import <seed.json>`");
        }

        Commands::Import { path } => {
            let store = lectern::db::initialize_sqlite(&config.db_path)?;
            let doc = lectern::db::seed::SeedDocument::from_path(&path)?;
            println!("Importing {}...", path.display());
            let summary = lectern::db::seed::import(store.as_ref(), &doc).await?;
            println!("  {} {} catalog items", "✓".green(), summary.items);
            println!(
                "  {} {} ratings from {} readers",
                "✓".green(),
                summary.ratings,
                summary.users
            );
        }

        Commands::Recommend { user_id } => {
            let recommender = open_recommender(&config)?;
            match recommender.recommend_for_user(&user_id).await {
                Ok(items) => lectern::output::terminal::display_recommendations(&user_id, &items),
                Err(RecommendError::NotFound { .. }) => {
                    anyhow::bail!(
                        "No reader with id {user_id:?}. Rate a book first with `lectern rate`."
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Popular { limit } => {
            let recommender = open_recommender(&config)?;
            let limit = limit.unwrap_or(config.recommend.popular_limit);
            let items = recommender.popular_with_limit(limit).await?;
            lectern::output::terminal::display_popular(&items);
        }

        Commands::Rate {
            user_id,
            item_id,
            rating,
        } => {
            let recommender = open_recommender(&config)?;
            recommender
                .update_history(&user_id, &item_id, rating)
                .await?;
            println!(
                "{} Recorded {rating} for {item_id} in {user_id}'s reading history",
                "✓".green()
            );
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let store = lectern::db::initialize_sqlite(&config.db_path)?;
            let recommender = Recommender::new(store, config.recommend);
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            lectern::web::run_server(recommender, port, &bind).await?;
        }

        Commands::Status => {
            let store = open_store(&config)?;
            lectern::status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Open the configured store. The database must already exist.
fn open_store(config: &Config) -> Result<Arc<dyn RatingStore>> {
    lectern::db::open_sqlite(&config.db_path)
}

fn open_recommender(config: &Config) -> Result<Recommender> {
    Ok(Recommender::new(open_store(config)?, config.recommend))
}
