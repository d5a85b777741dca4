use std::fmt;

/// Accumulates the outcome of one host's probing session. Samples are RTTs
/// in whole milliseconds, kept in send order; a lost echo contributes to
/// `sent` but records no sample.
#[derive(Debug)]
pub struct SampleRecorder {
    host: String,
    sent: u32,
    samples: Vec<u64>,
}

impl SampleRecorder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            sent: 0,
            samples: Vec::new(),
        }
    }

    /// Counts one echo attempt, whether or not a reply ever arrives.
    pub fn record_attempt(&mut self) {
        self.sent += 1;
    }

    pub fn record_sample(&mut self, rtt_ms: u64) {
        self.samples.push(rtt_ms);
    }

    /// Derives the aggregate view once, at the end of the session. All
    /// derived values come from the sample list, so they can never go stale.
    pub fn finalize(self) -> HostStats {
        let sent = self.sent;
        let received = self.samples.len() as u32;
        debug_assert!(
            received <= sent,
            "more samples recorded than attempts: {} > {}",
            received,
            sent
        );
        let lost = sent.saturating_sub(received);
        let loss_rate = if sent == 0 {
            0.0
        } else {
            lost as f64 / sent as f64 * 100.0
        };
        let min = self.samples.iter().copied().min().unwrap_or(0);
        let max = self.samples.iter().copied().max().unwrap_or(0);
        let avg = if received == 0 {
            0.0
        } else {
            self.samples.iter().sum::<u64>() as f64 / received as f64
        };
        HostStats {
            host: self.host,
            sent,
            received,
            lost,
            loss_rate,
            min,
            max,
            avg,
        }
    }
}

/// Immutable per-host aggregate handed to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct HostStats {
    pub host: String,
    pub sent: u32,
    pub received: u32,
    pub lost: u32,
    /// Percentage in [0, 100]; 0 when nothing was sent.
    pub loss_rate: f64,
    /// Milliseconds; 0 when no reply was received.
    pub min: u64,
    pub max: u64,
    pub avg: f64,
}

impl fmt::Display for HostStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} packets transmitted, {} received, {:.1}% packet loss, rtt min/avg/max = {}/{:.1}/{} ms",
            self.host, self.sent, self.received, self.loss_rate, self.min, self.avg, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(host: &str, attempts: u32, samples: &[u64]) -> HostStats {
        let mut rec = SampleRecorder::new(host);
        for _ in 0..attempts {
            rec.record_attempt();
        }
        for &s in samples {
            rec.record_sample(s);
        }
        rec.finalize()
    }

    #[test]
    fn all_echoes_succeed() {
        let stats = session("a", 4, &[10, 20, 15, 25]);
        assert_eq!(stats.sent, 4);
        assert_eq!(stats.received, 4);
        assert_eq!(stats.lost, 0);
        assert_eq!(stats.loss_rate, 0.0);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 25);
        assert_eq!(stats.avg, 17.5);
    }

    #[test]
    fn half_the_echoes_time_out() {
        let stats = session("a", 4, &[12, 18]);
        assert_eq!(stats.received, 2);
        assert_eq!(stats.lost, 2);
        assert_eq!(stats.loss_rate, 50.0);
        assert_eq!(stats.min, 12);
        assert_eq!(stats.max, 18);
        assert_eq!(stats.avg, 15.0);
    }

    #[test]
    fn zero_attempts_reports_zero_loss() {
        let stats = session("a", 0, &[]);
        assert_eq!(stats.sent, 0);
        assert_eq!(stats.loss_rate, 0.0);
        assert_eq!(stats.avg, 0.0);
    }

    #[test]
    fn all_echoes_lost() {
        let stats = session("a", 5, &[]);
        assert_eq!(stats.received, 0);
        assert_eq!(stats.loss_rate, 100.0);
        assert_eq!((stats.min, stats.max), (0, 0));
        assert_eq!(stats.avg, 0.0);
    }

    #[test]
    fn aggregate_invariants_hold() {
        for (attempts, samples) in [
            (10u32, vec![1u64, 2, 3]),
            (3, vec![7, 7, 7]),
            (1, vec![]),
            (6, vec![100, 1, 50, 2]),
        ] {
            let stats = session("a", attempts, &samples);
            assert!(stats.received <= stats.sent);
            assert_eq!(stats.lost, stats.sent - stats.received);
            assert!((0.0..=100.0).contains(&stats.loss_rate));
            if stats.received > 0 {
                assert!(stats.min as f64 <= stats.avg);
                assert!(stats.avg <= stats.max as f64);
            }
        }
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "more samples recorded"))]
    fn sample_without_attempt_trips_the_invariant() {
        // Only the prober drives the recorder, and it always records the
        // attempt first; a sample with no attempt is a caller bug. Release
        // builds clamp `lost` to zero instead of underflowing.
        let mut rec = SampleRecorder::new("a");
        rec.record_sample(5);
        let stats = rec.finalize();
        assert_eq!(stats.lost, 0);
    }

    #[test]
    fn summary_line_format() {
        let stats = session("host.example", 4, &[12, 18]);
        assert_eq!(
            stats.to_string(),
            "host.example: 4 packets transmitted, 2 received, 50.0% packet loss, rtt min/avg/max = 12/15.0/18 ms"
        );
    }
}
