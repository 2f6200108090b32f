mod commands;
mod progress;

use std::sync::Arc;

use clap::Parser;
use llm_eval::backends::default_backends_with_timeout;
use llm_eval::report::{generate_report, save_results};
use llm_eval::{Catalog, EvaluationRunner, TestCase};

use crate::args::{Action, CliArgs, RunMode};
use crate::config::{load_config, RunConfig};
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    execute(CliArgs::parse()).await
}

async fn execute(args: CliArgs) -> anyhow::Result<()> {
    // bail out before any file is read or written
    let Some(action) = args.action() else {
        println!("❌ No action specified. Use --help for options");
        return Ok(());
    };

    let loaded = load_config(args.config.clone())?;
    let run_config = apply_overrides(loaded.config.run.clone(), &args);
    let catalog = Arc::new(load_catalog(&run_config)?);

    let mode = match action {
        Action::ListCategories => {
            commands::list_categories(&catalog);
            return Ok(());
        }
        Action::Run(mode) => mode,
    };

    init_logging(&loaded.config.logging, &loaded.paths)?;

    let backends = default_backends_with_timeout(run_config.timeout()?);
    commands::report_unavailable(&backends);
    let mut runner = EvaluationRunner::new(catalog.clone(), backends)
        .delay(run_config.delay()?)
        .on_progress(progress::print_event);

    match mode {
        RunMode::All => {
            println!("\n🚀 Running ALL evaluation tests...");
            println!("Total tests: {}", catalog.total_tests());
            runner.run_all().await;
        }
        RunMode::Category(name) => {
            if let Err(err) = runner.run_category(&name).await {
                log::warn!("{err}");
                println!("❌ Unknown category: {name}");
                println!("Available: {}", catalog.names().join(", "));
            }
        }
        RunMode::Prompt(prompt) => {
            runner.run_single_test(&TestCase::custom(prompt)).await;
        }
    }

    let output_dir = run_config.output_dir();
    let results_path = save_results(&runner.report(), None, &output_dir)?;
    println!("\n✅ Results saved to: {}", results_path.display());
    let report_path = generate_report(runner.results(), &output_dir)?;
    println!("✅ Report generated: {}", report_path.display());

    commands::print_next_steps();
    Ok(())
}

fn apply_overrides(mut run: RunConfig, args: &CliArgs) -> RunConfig {
    if let Some(delay) = args.delay {
        run.delay_secs = delay;
    }
    if let Some(dir) = &args.output_dir {
        run.output_dir = Some(dir.clone());
    }
    if let Some(catalog) = &args.catalog {
        run.catalog = Some(catalog.clone());
    }
    run
}

fn load_catalog(run: &RunConfig) -> anyhow::Result<Catalog> {
    match &run.catalog {
        Some(path) => Ok(Catalog::from_path(path)?),
        None => Ok(Catalog::builtin()),
    }
}
