use clap::Parser;
use cookhelp::{
    cli::{commands, Cli, Commands, FavoritesAction},
    config::Settings,
    db,
    search::SearchFilters,
    Result,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cookhelp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e.log_safe());
        eprintln!("\x1b[31m\u{2717}\x1b[0m {}", e.log_safe());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Search {
            query,
            ingredients,
            cuisine,
            diet,
            pages,
        } => {
            let filters = SearchFilters {
                query,
                ingredients,
                cuisine,
                diet,
                ranking: None,
            };
            commands::search(&settings, filters, pages).await
        }
        Commands::Ingredients {
            ingredients,
            ranking,
            pages,
        } => commands::search_by_ingredients(&settings, ingredients, ranking, pages).await,
        Commands::Open { route, pages } => commands::open_route(&settings, &route, pages).await,
        Commands::Recipe {
            id,
            toggle_favorite,
        } => commands::show_recipe(&settings, id, toggle_favorite).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&settings).await,
            FavoritesAction::Add { id } => commands::add_favorite(&settings, id).await,
            FavoritesAction::Remove { id } => commands::remove_favorite(&settings, id).await,
        },
        Commands::Migrate => migrate(&settings).await,
    }
}

async fn migrate(settings: &Settings) -> Result<()> {
    info!("Running database migrations on {}", settings.database.url);

    let pool = db::init_pool_with_config(&settings.database).await?;
    db::run_migrations(&pool).await?;

    println!("\x1b[32m\u{2713}\x1b[0m Database migrations completed successfully");
    Ok(())
}
