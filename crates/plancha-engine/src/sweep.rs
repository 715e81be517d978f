//! One scenario per material, run concurrently.
//!
//! Material names are handed to scoped worker threads over a job channel;
//! each worker validates and runs its scenario independently and sends the
//! report back. Results are returned in material-table order regardless
//! of completion order.

use std::thread;

use crossbeam_channel::unbounded;
use indexmap::IndexMap;
use log::{debug, info};

use plancha_core::{MaterialTable, ThermalError};

use crate::config::{MaterialSpec, ScenarioConfig};
use crate::report::ScenarioReport;

type SweepResult = Result<ScenarioReport, ThermalError>;

fn run_one(
    config: &ScenarioConfig,
    materials: &MaterialTable,
    name: &str,
    with_halved_h: bool,
) -> SweepResult {
    let mut config = config.clone();
    config.material = MaterialSpec::Preset(name.to_string());
    let scenario = config.validate_with(materials)?;
    ScenarioReport::compute(&scenario, with_halved_h)
}

/// Run `config` once for every material in `materials`.
///
/// `config.material` is ignored. `workers` is clamped to
/// `1..=materials.len()`. A failing material does not affect the others.
pub fn run_sweep(
    config: &ScenarioConfig,
    materials: &MaterialTable,
    workers: usize,
    with_halved_h: bool,
) -> IndexMap<String, SweepResult> {
    let workers = workers.clamp(1, materials.len().max(1));
    let (job_tx, job_rx) = unbounded::<String>();
    let (result_tx, result_rx) = unbounded::<(String, SweepResult)>();
    for (name, _) in materials.iter() {
        // Receiver is alive in this scope; send cannot fail.
        let _ = job_tx.send(name.to_string());
    }
    drop(job_tx);

    info!(
        "sweeping {} materials on {workers} worker(s)",
        materials.len()
    );

    let mut finished: IndexMap<String, SweepResult> = thread::scope(|scope| {
        for id in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for name in job_rx.iter() {
                    debug!("worker {id}: running {name}");
                    let result = run_one(config, materials, &name, with_halved_h);
                    if result_tx.send((name, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);
        result_rx.iter().collect()
    });

    materials
        .iter()
        .filter_map(|(name, _)| finished.swap_remove_entry(name))
        .collect()
}
