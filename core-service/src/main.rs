//! Fallwatch Trainer - fits the fall classifier from labeled recordings

use std::process::ExitCode;

use fallwatch_core::constants;
use fallwatch_core::logic::trainer::{self, TrainerConfig};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} trainer v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = TrainerConfig::from_env();
    log::info!("Dataset: {}", config.dataset_dir.display());
    log::info!("Trees: {} (seed {})", config.forest.n_estimators, config.forest.seed);

    match trainer::train(&config) {
        Ok(outcome) => {
            if let Some(report) = &outcome.report {
                println!("\nModel Evaluation Results:");
                println!("Accuracy: {:.2} %", report.accuracy() * 100.0);
                println!("\nConfusion Matrix:\n{}", report.confusion);
                println!("\nClassification Report:\n{}", report);
            }
            println!("\nModel saved to {}", outcome.model_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Training failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
