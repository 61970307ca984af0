use crate::engine::board::START_FEN;

/// CLI configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Position the CLI starts from.
    pub start_fen: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Pretty-print the JSON report.
    pub pretty_json: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            start_fen: lookup("CHESS_START_FEN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.start_fen),
            log_filter: lookup("CHESS_LOG").unwrap_or(defaults.log_filter),
            pretty_json: lookup("CHESS_PRETTY")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.pretty_json),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            start_fen: START_FEN.to_string(),
            log_filter: "chess_rules=info".to_string(),
            pretty_json: false,
        }
    }
}
