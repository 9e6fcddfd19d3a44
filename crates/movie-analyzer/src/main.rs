mod bootstrap;
mod report;

use std::process::ExitCode;

use analyzer_core::settings::Settings;
use analyzer_data::analysis::{analyze_dataset, AnalysisOptions};
use analyzer_data::export::export_json;
use analyzer_data::reader::load_dataset;
use anyhow::{bail, Result};

fn main() -> ExitCode {
    let settings = Settings::load();
    bootstrap::setup_logging(&settings.log_level);

    tracing::info!("Movie analyzer v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let install_dir = bootstrap::install_dir();
    let data_dir = bootstrap::discover_data_dir(&install_dir);
    let sources = settings.data_sources(&data_dir);
    tracing::debug!("Data sources: {:?}", sources);

    let dataset = load_dataset(&sources)?;

    let options = AnalysisOptions {
        top_movies: settings.top_movies as usize,
        top_keywords: settings.top_keywords as usize,
        join_via_links: settings.join_via_links,
    };
    let result = analyze_dataset(&dataset, &options);
    tracing::debug!(
        "Analysis generated at {} in {:.3}s",
        result.metadata.generated_at,
        result.metadata.analysis_time_seconds
    );

    for line in report::render_report(&result, options.top_movies, options.top_keywords) {
        println!("{}", line);
    }

    let failures = result.failures();
    for (label, e) in &failures {
        tracing::error!("An error occurred: {label}: {e}");
    }

    if let Ok(prepared) = &result.prepared_metadata {
        export_json(prepared, &settings.output_path(&install_dir))?;
    }

    if !failures.is_empty() {
        bail!("{} analysis steps failed", failures.len());
    }
    Ok(())
}
