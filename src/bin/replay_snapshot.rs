/// Replay raycast snapshots saved by the visualizer
///
/// Re-runs each snapshot's traversal, prints the recomputed impact table and
/// reports any difference from the recorded impacts.
use std::env;
use std::path::Path;
use std::process::ExitCode;

use tile_raycast::config::Config;
use tile_raycast::snapshot::{impact_table, RaycastSnapshot};
use tile_raycast::{logging, traverse_with};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <snapshot.json>...", args[0]);
        eprintln!("Recomputes saved raycasts and compares them with the recorded impacts");
        return ExitCode::FAILURE;
    }

    if let Err(e) = logging::install(&Config::load().logging) {
        eprintln!("{}", e);
    }

    let mut failed = 0;
    for filename in &args[1..] {
        if !replay(Path::new(filename)) {
            failed += 1;
        }
    }

    if failed > 0 {
        println!("{} of {} snapshots differ", failed, args.len() - 1);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn replay(path: &Path) -> bool {
    let snapshot = match RaycastSnapshot::load_from_file(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("{}", e);
            return false;
        }
    };

    let (grid, ray) = match snapshot.restore() {
        Ok(inputs) => inputs,
        Err(e) => {
            log::error!("{}: {}", path.display(), e);
            return false;
        }
    };

    println!("=== {} ({}) ===", snapshot.name, path.display());
    println!(
        "Ray: origin {} vector {} length {:.3}",
        ray.origin,
        ray.vector,
        ray.length()
    );

    let traversal = traverse_with(&grid, &ray, &snapshot.options);
    println!("Outcome: {:?}", traversal.outcome);
    for report in &traversal.axes {
        println!("  {:?} pass: {} crossings, {:?}", report.axis, report.recorded, report.stop);
    }
    print!("{}", impact_table(&traversal));

    match snapshot.verify() {
        Ok(check) if check.passed() => {
            println!("Matches recorded impacts\n");
            true
        }
        Ok(check) => {
            for mismatch in &check.mismatches {
                println!("  mismatch: {}", mismatch);
            }
            println!();
            false
        }
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}
