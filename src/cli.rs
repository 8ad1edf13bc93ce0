//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::tui::View;

#[derive(Debug, Parser)]
#[command(name = "toolhub", version, about = "Terminal workbench for Gemini-powered AI tools")]
pub struct Cli {
    /// Path to an alternative config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// View to open at startup.
    #[arg(long, value_enum, default_value = "home")]
    pub view: View,

    /// Force a theme for this run (overrides the saved preference).
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["toolhub"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.view, View::Home));
        assert!(cli.theme.is_none());
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::parse_from([
            "toolhub",
            "--view",
            "tools",
            "--theme",
            "light",
            "--config",
            "/tmp/alt.toml",
        ]);
        assert!(matches!(cli.view, View::Tools));
        assert!(matches!(cli.theme, Some(ThemeArg::Light)));
        assert_eq!(cli.config.as_deref().unwrap().to_str(), Some("/tmp/alt.toml"));
    }
}
