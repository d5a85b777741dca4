use std::time::Duration;

use tracing::error;

use crate::prober::probe_host;
use crate::stats::HostStats;

/// Outcome of one probing pass over the whole host list. Hosts whose prober
/// failed (resolution, socket) are absent from `results`.
#[derive(Debug)]
pub struct Survey {
    pub results: Vec<HostStats>,
}

impl Survey {
    /// Applies the recommendation policy: a host is eligible iff
    /// `1 <= avg <= threshold_ms` (the lower bound excludes zero-sample
    /// sessions, whose avg is 0). The strictly smallest average wins;
    /// first-seen wins ties.
    pub fn recommend(&self, threshold_ms: f64) -> Option<&HostStats> {
        let mut best: Option<&HostStats> = None;
        for stats in &self.results {
            if stats.avg < 1.0 || stats.avg > threshold_ms {
                continue;
            }
            match best {
                Some(b) if b.avg <= stats.avg => {}
                _ => best = Some(stats),
            }
        }
        best
    }
}

/// Runs one prober per host concurrently and waits for all of them. One
/// host's failure never aborts the pass; its error is logged and the host is
/// left out of the survey.
pub async fn run(hosts: Vec<String>, echo_count: u32, timeout: Duration) -> Survey {
    let tasks: Vec<_> = hosts
        .into_iter()
        .map(|host| {
            let handle = tokio::spawn(probe_host(host.clone(), echo_count, timeout));
            (host, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (host, handle) in tasks {
        match handle.await {
            Ok(Ok(stats)) => results.push(stats),
            Ok(Err(e)) => error!("probe of {} failed: {:#}", host, e),
            Err(e) => error!("probe task for {} panicked: {}", host, e),
        }
    }

    Survey { results }
}
