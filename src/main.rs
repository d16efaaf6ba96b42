// Main entry point
use clap::Parser;
use colored::Colorize;
use dining_menu::application::query;
use dining_menu::infrastructure::config::{self, Config, Logging};
use dining_menu::interfaces::cli::{Cli, Command};
use dining_menu::interfaces::http;
use dining_menu::presentation::{render, theme::Theme};
use dining_menu::{AppState, MenuError};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::GenerateConfig = cli.command {
        let path = config::generate_config_sample(cli.config.as_deref())?;
        println!("Generated config file at: {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    let state = AppState::new(config.clone())?;

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    match run(&cli, &state, &config, &theme).await {
        Ok(()) => Ok(()),
        Err(CommandError::Menu(e)) if e.is_not_found() => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
        Err(CommandError::Menu(e)) => Err(e.into()),
        Err(CommandError::Other(e)) => Err(e),
    }
}

enum CommandError {
    Menu(MenuError),
    Other(anyhow::Error),
}

impl From<MenuError> for CommandError {
    fn from(e: MenuError) -> Self {
        CommandError::Menu(e)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(e: anyhow::Error) -> Self {
        CommandError::Other(e)
    }
}

async fn run(cli: &Cli, state: &AppState, config: &Config, theme: &Theme) -> Result<(), CommandError> {
    match &cli.command {
        Command::Serve { bind } => {
            let address = bind.as_deref().unwrap_or(config.server.bind.as_str());
            http::serve(state.clone(), address).await?;
        }
        Command::Halls => {
            let halls = query::list_halls(state).await?;
            emit(cli.json, &halls, || render::format_list("Dining halls", &halls, theme))?;
        }
        Command::Periods { hall } => {
            let periods = query::list_periods(state, hall).await?;
            emit(cli.json, &periods, || render::format_list(hall, &periods, theme))?;
        }
        Command::Categories { hall, period } => {
            let categories = query::list_categories(state, hall, period).await?;
            let title = format!("{} / {}", hall, period);
            emit(cli.json, &categories, || {
                render::format_list(&title, &categories, theme)
            })?;
        }
        Command::Items {
            hall,
            period,
            category,
        } => {
            let items = query::list_items(state, hall, period, category).await?;
            let title = format!("{} / {} / {}", hall, period, category);
            emit(cli.json, &items, || render::format_list(&title, &items, theme))?;
        }
        Command::Foods { hall, period } => {
            let foods = query::list_foods(state, hall, period).await?;
            let title = format!("{} / {}", hall, period);
            emit(cli.json, &foods, || render::format_foods(&title, &foods, theme))?;
        }
        Command::Nutrition {
            hall,
            period,
            category,
            food,
        } => {
            let facts = query::nutrition(state, hall, period, category, food).await?;
            emit(cli.json, &facts, || render::format_nutrition(food, &facts, theme))?;
        }
        Command::Refresh => {
            let summary = query::refresh(state).await?;
            emit(cli.json, &summary, || render::format_refresh(&summary, theme))?;
        }
        Command::Status => {
            let status = query::status(state).await;
            emit(cli.json, &status, || render::format_status(&status, theme))?;
        }
        Command::GenerateConfig => {}
    }

    Ok(())
}

/// Print as pretty JSON or as themed text
fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), CommandError> {
    if json {
        let rendered = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
        println!("{}", rendered);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
