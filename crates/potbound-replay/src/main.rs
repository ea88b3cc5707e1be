mod scenario;

use std::io::Write;

use tracing_subscriber::EnvFilter;

use scenario::Scenario;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .and_then(|a| a.strip_prefix("--scenario=").map(String::from))
        .unwrap_or_else(|| "crates/potbound-replay/scenarios/ledge_run.toml".to_string());

    let every = std::env::args()
        .nth(2)
        .and_then(|a| a.strip_prefix("--every=").map(String::from))
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    let scenario = match Scenario::from_file(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario {path}: {e}");
            std::process::exit(1);
        },
    };

    tracing::info!(
        "Replaying {path}: {} frames ({} segments)",
        scenario.total_frames(),
        scenario.segments.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = scenario.replay(|report| {
        if report.frame % every != 0 && report.events.is_empty() {
            return Ok(());
        }
        let line = serde_json::to_string(report).map_err(std::io::Error::other)?;
        writeln!(out, "{line}")
    });

    if let Err(e) = result {
        eprintln!("Replay aborted: {e}");
        std::process::exit(1);
    }
}
