use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use efx_simulator_core_rs::{
    enumerate_efx_partitions, render_table, scenario, AllocationEngine, RunReport,
    ScenarioConfig, ValuationTable,
};

#[derive(Parser, Debug)]
#[command(name = "efx-sim", version, about = "Online EFX fair-division simulator")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the online allocation over a scenario and print the step trace
    Run {
        #[command(flatten)]
        source: TableSource,
    },
    /// Enumerate all globally EFX partitions and compare the online result
    Verify {
        #[command(flatten)]
        source: TableSource,
    },
}

#[derive(clap::Args, Debug)]
struct TableSource {
    #[arg(long, default_value_t = 10, help = "Number of generated items")]
    items: usize,
    #[arg(long, default_value_t = 42, help = "Scenario RNG seed")]
    seed: u64,
    #[arg(long, default_value_t = 1, help = "Minimum generated valuation")]
    min_value: i64,
    #[arg(long, default_value_t = 100, help = "Maximum generated valuation")]
    max_value: i64,
    #[arg(
        long,
        help = "JSON file with [{\"id\", \"value_1\", \"value_2\"}, ...]; overrides generation"
    )]
    table: Option<PathBuf>,
}

impl TableSource {
    fn load(&self) -> Result<(ValuationTable, Option<ScenarioConfig>), String> {
        match &self.table {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                let table: ValuationTable = serde_json::from_str(&raw)
                    .map_err(|e| format!("invalid table in {}: {}", path.display(), e))?;
                Ok((table, None))
            }
            None => {
                let config = ScenarioConfig {
                    num_items: self.items,
                    seed: self.seed,
                    min_value: self.min_value,
                    max_value: self.max_value,
                };
                let table = scenario::generate(&config).map_err(|e| e.to_string())?;
                Ok((table, Some(config)))
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Run { source } => cmd_run(source, cli.json),
        Commands::Verify { source } => cmd_verify(source, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(source: &TableSource, json: bool) -> Result<(), String> {
    let (table, config) = source.load()?;
    let mut engine = AllocationEngine::new(table).map_err(|e| e.to_string())?;
    let summary = engine.run().map_err(|e| e.to_string())?;
    let report = RunReport::new(&summary, engine.trace(), config.as_ref());

    if json {
        let payload = serde_json::json!({
            "report": report,
            "summary": summary,
            "trace": engine.trace().rows(),
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap());
        return Ok(());
    }

    print!("{}", render_table(engine.trace()));
    println!(
        "A1: {:?} (total {})",
        summary.assigned_1, summary.self_total_1
    );
    println!(
        "A2: {:?} (total {})",
        summary.assigned_2, summary.self_total_2
    );
    if !summary.deferred.is_empty() {
        println!("Deferred: {:?}", summary.deferred);
    }
    println!(
        "Allocated {}/{} items (trace digest {})",
        summary.allocated_count, summary.num_items, report.trace_digest
    );
    Ok(())
}

fn cmd_verify(source: &TableSource, json: bool) -> Result<(), String> {
    let (table, _config) = source.load()?;
    let partitions = enumerate_efx_partitions(&table).map_err(|e| e.to_string())?;

    let mut engine = AllocationEngine::new(table.clone()).map_err(|e| e.to_string())?;
    let summary = engine.run().map_err(|e| e.to_string())?;

    let online_is_global = summary.deferred.is_empty()
        && partitions
            .iter()
            .any(|p| p.matches_bundles(&table, &summary.assigned_1, &summary.assigned_2));

    if json {
        let payload = serde_json::json!({
            "num_items": table.len(),
            "global_efx_partitions": partitions.len(),
            "online_allocated_count": summary.allocated_count,
            "online_deferred": summary.deferred,
            "online_result_is_global_efx": online_is_global,
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap());
        return Ok(());
    }

    println!(
        "{} globally EFX partition(s) over {} items",
        partitions.len(),
        table.len()
    );
    if summary.deferred.is_empty() {
        println!(
            "online result is {}among them",
            if online_is_global { "" } else { "NOT " }
        );
    } else {
        println!(
            "online run deferred {:?}; partial allocations are not compared",
            summary.deferred
        );
    }
    Ok(())
}
