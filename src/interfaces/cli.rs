use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dining")]
#[command(about = "Dining hall menus and nutrition facts, cached.")]
#[command(version)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long, global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the JSON API
    Serve {
        /// Address to bind, overrides [server].bind
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List dining halls
    Halls,

    /// List meal periods of a hall
    Periods { hall: String },

    /// List categories of a meal period
    Categories { hall: String, period: String },

    /// List food items of a category
    Items {
        hall: String,
        period: String,
        category: String,
    },

    /// List every food of a meal period with its category
    Foods { hall: String, period: String },

    /// Show nutrition facts for one food item
    Nutrition {
        hall: String,
        period: String,
        category: String,
        food: String,
    },

    /// Re-scrape the menu now
    Refresh,

    /// Show cache status
    Status,

    /// Generate config sample
    GenerateConfig,
}
