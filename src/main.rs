use std::process::ExitCode;

use chess_rules::config::AppConfig;
use chess_rules::engine::{ChessError, Game};
use chess_rules::report::PositionReport;

const USAGE: &str = "usage: chess-rules [--fen \"<FEN>\"] [--pretty] [MOVE ...]\n\
                     moves are coordinate pairs such as e2e4 or e1g1";

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    fen: Option<String>,
    pretty: bool,
    moves: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--fen" => {
                let fen = args.next().ok_or("--fen needs a value")?;
                parsed.fen = Some(fen);
            }
            "--pretty" => parsed.pretty = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => parsed.moves.push(arg),
        }
    }
    Ok(Some(parsed))
}

fn run(config: &AppConfig, args: &Args) -> Result<PositionReport, ChessError> {
    let fen = args.fen.as_deref().unwrap_or(&config.start_fen);
    let mut game = Game::from_fen(fen)?;
    for text in &args.moves {
        let mv = game.play(text)?;
        tracing::info!(%mv, status = %game.status(), "applied move");
    }
    Ok(PositionReport::from_game(&game))
}

fn main() -> ExitCode {
    let config = AppConfig::from_env();

    // Initialize tracing (structured logging) on stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let report = match run(&config, &args) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match report.to_json(args.pretty || config.pretty_json) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialise report: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Option<Args>, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_fen_flag_and_moves() {
        let parsed = args(&["--fen", "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "e1d1", "--pretty"])
            .unwrap()
            .unwrap();
        assert_eq!(parsed.fen.as_deref(), Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(parsed.pretty);
        assert_eq!(parsed.moves, vec!["e1d1".to_string()]);
    }

    #[test]
    fn help_and_bad_options() {
        assert_eq!(args(&["--help"]), Ok(None));
        assert!(args(&["--fen"]).is_err());
        assert!(args(&["--depth", "3"]).is_err());
    }

    #[test]
    fn run_replays_moves() {
        let parsed = args(&["e2e4", "e7e5"]).unwrap().unwrap();
        let report = run(&AppConfig::default(), &parsed).unwrap();
        assert_eq!(report.to_move, "white");
        assert_eq!(report.move_history.len(), 2);
    }

    #[test]
    fn run_stops_on_illegal_move() {
        let parsed = args(&["e2e5"]).unwrap().unwrap();
        assert!(matches!(
            run(&AppConfig::default(), &parsed),
            Err(ChessError::InvalidMove { .. })
        ));
    }
}
