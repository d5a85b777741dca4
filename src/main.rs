mod config;
mod orchestrator;
mod packet;
mod prober;
mod stats;
mod util;

use std::time::Duration;

use config::{ProbeConfig, read_host_file};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    let config = ProbeConfig::load().await?;
    let log_level = config.get_tracing_level()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("pingpick={}", log_level.as_str().to_lowercase()).parse()?),
        )
        .init();

    let host_file = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!(
                "Raw ICMP sockets require elevated privileges.\n\
                 Usage:\n  pingpick <host-list-file>\n\
                 for example: pingpick hosts.txt"
            );
            std::process::exit(1);
        }
    };

    let hosts = read_host_file(&host_file).await?;
    let timeout = Duration::from_millis(config.timeout_ms);

    let survey = orchestrator::run(hosts, config.echo_count, timeout).await;

    for stats in &survey.results {
        println!("{}", stats);
    }

    match survey.recommend(config.threshold_ms) {
        Some(best) => println!(
            "Recommended host: {} (rtt min/avg/max = {}/{:.1}/{} ms)",
            best.host, best.min, best.avg, best.max
        ),
        None => println!("no recommendation"),
    }

    Ok(())
}
