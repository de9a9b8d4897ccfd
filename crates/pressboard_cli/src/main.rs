//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `pressboard_core` linkage.
//! - When `PRESSBOARD_API_URL` is set, probe the live API read path.

use pressboard_core::{http_editor, ApiConfig, ConfigError, NotificationLog, ViewFilter};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("pressboard_core ping={}", pressboard_core::ping());
    println!("pressboard_core version={}", pressboard_core::core_version());

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingVar(_)) => return ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match probe(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn probe(config: &ApiConfig) -> Result<(), String> {
    let notifications = Arc::new(NotificationLog::new());
    let editor = http_editor(config, notifications.clone()).map_err(|err| err.to_string())?;

    let weeks = editor.reload_vocabulary().map_err(|err| err.to_string())?;
    println!("strategic weeks={weeks}");
    for cycle in editor.available_cycles() {
        let categories = editor.available_categories(Some(cycle));
        println!("cycle {cycle}: {}", categories.join(", "));
    }

    let count = editor
        .load_items(None, ViewFilter::All)
        .map_err(|err| err.to_string())?;
    let breakdown = editor.sentiment_totals().breakdown();
    println!(
        "news items={count} positive={:.1}% negative={:.1}% neutral={:.1}%",
        breakdown.positive_pct, breakdown.negative_pct, breakdown.neutral_pct
    );
    Ok(())
}
