use eth_dashboard::{render::render_text, Dashboard, DashboardConfig};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = DashboardConfig::from_env()?;
    let label = config.asset_id.to_uppercase();
    let holding = config.holding;
    let color = std::io::stdout().is_terminal();

    let dashboard = Dashboard::new(config)?;
    let mut updates = dashboard.subscribe();
    dashboard.start();

    println!("{}", render_text(&updates.borrow_and_update(), &holding, &label, color));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("{}", render_text(&state, &holding, &label, color));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    dashboard.stop();
    let metrics = dashboard.metrics().await;
    tracing::info!(
        attempts = metrics.total_attempts,
        failed = metrics.failed_attempts,
        latency_p50_ms = metrics.latency_p50_ms,
        "Dashboard stopped"
    );

    Ok(())
}
