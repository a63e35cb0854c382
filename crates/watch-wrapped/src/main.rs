mod bootstrap;
mod report;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use wrapped_core::settings::Settings;
use wrapped_data::analysis::{run_pipeline, summarize_enriched, PipelineConfig, PipelineResult};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("watch-wrapped v{} starting", env!("CARGO_PKG_VERSION"));

    let today = Local::now().date_naive();
    let result = run(&settings, today)?;

    let rendered = if settings.wants_json() {
        report::render_json(&result)?
    } else {
        report::render_text(&result)
    };
    println!("{rendered}");

    Ok(())
}

/// Run either the full pipeline or a summarize-only pass over an existing
/// enriched file, depending on `--from-enriched`.
fn run(settings: &Settings, today: NaiveDate) -> Result<PipelineResult> {
    match &settings.from_enriched {
        Some(path) => {
            // Without an explicit period the whole file is summarized.
            let period = if settings.year.is_some() || settings.from.is_some() {
                Some(settings.period(today)?)
            } else {
                None
            };
            tracing::info!("Summarizing enriched dataset {}", path.display());
            summarize_enriched(path, settings.top as usize, period)
                .with_context(|| format!("summarizing {}", path.display()))
        }
        None => {
            let config = pipeline_config(settings, today)?;
            tracing::info!(
                "Summarizing {} against {} for {}",
                config.history.display(),
                config.reference.display(),
                config.period
            );
            run_pipeline(&config).with_context(|| {
                format!(
                    "processing {} with {}",
                    config.history.display(),
                    config.reference.display()
                )
            })
        }
    }
}

fn pipeline_config(settings: &Settings, today: NaiveDate) -> Result<PipelineConfig> {
    Ok(PipelineConfig {
        history: settings.history.clone(),
        reference: settings.reference.clone(),
        output: (!settings.no_write).then(|| settings.output.clone()),
        period: settings.period(today).context("resolving the period")?,
        delimiter: settings.delimiter,
        top_k: settings.top as usize,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
    }

    fn settings_for(dir: &Path, extra: &[&str]) -> Settings {
        let history = dir.join("history.csv");
        let reference = dir.join("reference.csv");
        let output = dir.join("wrapped.csv");
        let mut args = vec![
            "watch-wrapped".to_string(),
            "--history".to_string(),
            history.display().to_string(),
            "--reference".to_string(),
            reference.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Settings::load_from_args(args)
    }

    fn write_inputs(dir: &Path) {
        std::fs::write(
            dir.join("history.csv"),
            "Title,Date,Runtime_min\nAlpha: Pilot,1/5/20,60\nBeta,2/10/20,120\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("reference.csv"),
            "Title,Media,Genre\nAlpha,TV Show,Drama\n",
        )
        .unwrap();
    }

    #[test]
    fn test_pipeline_config_defaults_to_previous_year() {
        let tmp = TempDir::new().unwrap();
        let config = pipeline_config(&settings_for(tmp.path(), &[]), today()).unwrap();

        assert_eq!(config.period.start(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(config.period.end(), NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert_eq!(config.delimiter, ':');
        assert_eq!(config.top_k, 3);
        assert_eq!(config.output, Some(tmp.path().join("wrapped.csv")));
    }

    #[test]
    fn test_pipeline_config_no_write() {
        let tmp = TempDir::new().unwrap();
        let config =
            pipeline_config(&settings_for(tmp.path(), &["--no-write"]), today()).unwrap();
        assert!(config.output.is_none());
    }

    #[test]
    fn test_run_full_pipeline_then_from_enriched() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());

        let first = run(&settings_for(tmp.path(), &["--year", "2020"]), today()).unwrap();
        assert_eq!(first.summary.totals.total_minutes, 180);
        assert!(tmp.path().join("wrapped.csv").exists());

        let enriched = tmp.path().join("wrapped.csv");
        let enriched = enriched.display().to_string();
        let second = run(
            &settings_for(tmp.path(), &["--from-enriched", &enriched]),
            today(),
        )
        .unwrap();
        assert!(second.metadata.period.is_none());
        assert_eq!(second.summary.totals, first.summary.totals);
    }

    #[test]
    fn test_run_missing_input_reports_context() {
        let tmp = TempDir::new().unwrap();
        let err = run(&settings_for(tmp.path(), &[]), today()).unwrap_err();
        assert!(format!("{err:#}").contains("processing"));
    }
}
