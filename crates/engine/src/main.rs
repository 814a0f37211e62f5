//! Arkham - investigator generator entry point.

use std::sync::Arc;

use anyhow::Context;
use arkham_domain::{NoOccupationEffects, RandomPort};
use arkham_engine::infrastructure::{names::CsvNameTable, random::SeededRandom, random::SystemRandom};
use arkham_engine::presentation::{render_json, render_sheet};
use arkham_engine::{GenerateInvestigator, GenerateRequest, GeneratorConfig, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr, stdout carries the sheets
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arkham_engine=info,arkham_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GeneratorConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        count = config.count,
        seed = ?config.seed,
        output = %config.output,
        "Starting Arkham"
    );

    let random: Arc<dyn RandomPort> = match config.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(SystemRandom::new()),
    };
    let names = Arc::new(CsvNameTable::in_dir(&config.data_dir, random.clone()));
    let generator = GenerateInvestigator::new(random, names, Arc::new(NoOccupationEffects));

    let investigators = (0..config.count)
        .map(|i| {
            generator
                .execute(GenerateRequest::from(&config))
                .with_context(|| format!("Failed to generate investigator {}", i + 1))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    match config.output {
        OutputFormat::Text => {
            let sheets: Vec<String> = investigators.iter().map(render_sheet).collect();
            println!("{}", sheets.join("\n\n"));
        }
        OutputFormat::Json => {
            println!("{}", render_json(&investigators)?);
        }
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
