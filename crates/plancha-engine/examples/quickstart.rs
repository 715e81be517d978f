//! Plancha Quickstart: heat the reference aluminum griddle to 250 °C.
//!
//! Demonstrates:
//!   1. Building a scenario from the defaults (or a JSON file)
//!   2. Validating it and reading the stability analysis
//!   3. Running the 2D simulator with field captures
//!   4. Comparing against the lumped model in a full report
//!
//! Run with:
//!   cargo run --example quickstart [-- scenario.json]

use std::error::Error;
use std::fs;

use plancha_core::{Measured, Unit, KELVIN_OFFSET};
use plancha_engine::{ScenarioConfig, ScenarioReport, Simulator};

// ─── Output parameters ──────────────────────────────────────────

/// Print one series sample per this many recorded samples.
const PRINT_EVERY: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Plancha Quickstart ===\n");

    // 1. Scenario: a file if given, otherwise the aluminum plancha.
    let mut config = match std::env::args().nth(1) {
        Some(path) => ScenarioConfig::from_json(&fs::read_to_string(path)?)?,
        None => ScenarioConfig::default(),
    };
    config.record_every = 3_000;
    config.capture_at = vec![
        Measured::new(5.0, Unit::Minute),
        Measured::new(15.0, Unit::Minute),
    ];

    // 2. Validate.
    let scenario = config.validate()?;
    println!(
        "Grid: {}x{} nodes, dx = {} mm",
        scenario.grid.rows(),
        scenario.grid.cols(),
        scenario.grid.spacing() * 1e3
    );
    println!(
        "Stability: Bi_node = {:.3e}, Fo_max = {:.4}, dt = {:.4} s (max {:.4} s)\n",
        scenario.stability.biot_node,
        scenario.stability.bounds.min(),
        scenario.dt,
        scenario.stability.dt_max
    );

    // 3. Run the 2D model.
    let mut sim = Simulator::from_scenario(&scenario)?;
    let result = sim.run()?;
    let (row, col) = sim.monitor();
    println!("Monitored node ({row}, {col}):");
    for (i, (t, temp)) in result.series().iter().enumerate() {
        if i % PRINT_EVERY == 0 {
            println!("  t = {:>7.1} s   T = {:>6.2} °C", t, temp - KELVIN_OFFSET);
        }
    }
    for capture in sim.captures() {
        let profile = capture.column(col).unwrap_or_default();
        let celsius: Vec<String> = profile
            .iter()
            .map(|t| format!("{:.2}", t - KELVIN_OFFSET))
            .collect();
        println!(
            "  profile at {:.0} s, heated face first: [{}] °C",
            capture.time(),
            celsius.join(", ")
        );
    }
    println!(
        "\n{} node updates in {} µs\n",
        sim.metrics().node_updates,
        sim.metrics().wall_us
    );

    // 4. Full report with the lumped comparison and h/2 rerun.
    let report = ScenarioReport::compute(&scenario, true)?;
    println!("{report}");
    Ok(())
}
