use std::path::Path;
use std::process::ExitCode;

use wildfire_trends::report::ANALYSES;
use wildfire_trends::{AnalysisConfig, load_config};

fn main() -> ExitCode {
    env_logger::init();

    // Optional JSON config as the first argument; defaults otherwise.
    let config = match std::env::args_os().nth(1) {
        Some(path) => match load_config(Path::new(&path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Config load error: {e:#}");
                return ExitCode::FAILURE;
            }
        },
        None => AnalysisConfig::default(),
    };

    // A failing analysis does not stop the ones after it.
    let mut failures = 0;
    for analysis in ANALYSES {
        match (analysis.run)(&config) {
            Ok(out) => log::info!("{}: wrote {}", analysis.name, out.display()),
            Err(e) => {
                log::error!("{} failed: {e:#}", analysis.name);
                failures += 1;
            }
        }
    }

    if failures == ANALYSES.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
