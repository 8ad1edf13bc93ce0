mod analytics;
mod auth;
mod blog;
mod chat;
mod cli;
mod config;
mod contact;
mod panel;
mod provider;
mod registry;
mod theme;
mod ui;
mod validate;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use analytics::Analytics;
use auth::{HttpIdentityProvider, IdentityProvider};
use cli::{Cli, ThemeArg};
use config::AppConfig;
use provider::gemini::GeminiClient;
use provider::GenerationProvider;
use theme::Theme;
use ui::tui::App;

/// Log to a file; stdout belongs to the TUI.
fn init_logging() -> Result<()> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".toolhub");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("toolhub.log"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_env("TOOLHUB_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn resolve_theme(config: &AppConfig, flag: Option<ThemeArg>) -> Theme {
    match flag {
        Some(ThemeArg::Dark) => Theme::Dark,
        Some(ThemeArg::Light) => Theme::Light,
        None => theme::load_preference()
            .unwrap_or_else(|| Theme::from_name(&config.ui.theme)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    // Auto-generate the config file on first run so there is something to
    // put the API key into.
    if cli.config.is_none() {
        let config_path = AppConfig::config_path()?;
        if !config_path.exists() {
            let path = AppConfig::save_default()?;
            println!("Created default config: {}", path.display());
            println!("Edit it to set your Gemini API key, auth URL, etc.");
        }
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let theme = resolve_theme(&config, cli.theme);

    let provider: Arc<dyn GenerationProvider> = Arc::new(GeminiClient::new(
        config.gemini_api_key(),
        config.gemini.model.clone(),
        config.gemini.api_base.clone(),
    ));
    info!(
        provider = provider.name(),
        model = %config.gemini.model,
        configured = provider.is_configured(),
        "provider ready"
    );

    let identity: Option<Arc<dyn IdentityProvider>> =
        match (&config.auth.base_url, &config.auth.anon_key) {
            (Some(base), Some(key)) if !base.is_empty() => Some(Arc::new(
                HttpIdentityProvider::new(base.clone(), key.clone()),
            )),
            _ => None,
        };

    let analytics = Arc::new(Analytics::new(
        config.analytics.measurement_id.clone(),
        config.analytics.api_secret.clone(),
    ));

    let app = App::new(&config, theme, provider, identity, analytics, cli.view);
    app.run().await?;
    Ok(())
}
