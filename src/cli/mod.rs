pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cookhelp")]
#[command(about = "CookHelp - Spoonacular recipe search with local favorites", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search recipes by free text, ingredients, cuisine and diet
    Search {
        /// Free-text query
        query: Option<String>,

        /// Comma-separated ingredients to include
        #[arg(short, long, value_delimiter = ',')]
        ingredients: Vec<String>,

        /// Cuisine filter (e.g. Italian)
        #[arg(short, long)]
        cuisine: Option<String>,

        /// Diet filter (e.g. vegetarian)
        #[arg(short, long)]
        diet: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },

    /// Find recipes that use the ingredients you have
    Ingredients {
        /// Ingredients on hand
        #[arg(required = true, value_delimiter = ',')]
        ingredients: Vec<String>,

        /// 1 = use as many ingredients as possible, 2 = miss as few as possible
        #[arg(short, long, default_value_t = 1)]
        ranking: u8,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },

    /// Run a search from a results route, e.g. "type=complex&ingredients=null&cuisine=Thai&ranking=null"
    Open {
        route: String,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },

    /// Show a recipe's details
    Recipe {
        /// Spoonacular recipe ID
        id: i64,

        /// Add the recipe to favorites, or remove it if already there
        #[arg(long)]
        toggle_favorite: bool,
    },

    /// Manage local favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Run database migrations
    Migrate,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorites, most recently added first
    List,

    /// Fetch a recipe and store it as a favorite
    Add { id: i64 },

    /// Remove a favorite
    Remove { id: i64 },
}
