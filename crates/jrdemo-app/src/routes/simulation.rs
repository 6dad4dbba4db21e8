//! `/simulation` latency and error policy.

use std::time::Duration;

use rand::Rng;

use crate::config::SimulationSection;

/// Error message surfaced by a simulated failure.
pub const SIMULATED_ERROR: &str = "Simulated error based on configured error rate.";

#[derive(Debug, Clone, Copy)]
pub struct SimulationPolicy {
    error_rate: f64,
    latency_min_ms: f64,
    latency_max_ms: f64,
}

/// One sampled outcome: how long to wait, then whether to fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOutcome {
    pub latency_ms: f64,
    pub fail: bool,
}

impl SimulationOutcome {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.latency_ms / 1000.0)
    }
}

impl SimulationPolicy {
    pub fn new(cfg: &SimulationSection) -> Self {
        Self {
            error_rate: cfg.error_rate,
            latency_min_ms: cfg.latency_min_ms as f64,
            latency_max_ms: cfg.latency_max_ms as f64,
        }
    }

    /// Delay is uniform over `[min, max]`; failure is drawn independently.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationOutcome {
        let latency_ms = if self.latency_max_ms > self.latency_min_ms {
            rng.gen_range(self.latency_min_ms..=self.latency_max_ms)
        } else {
            self.latency_min_ms
        };
        let fail = rng.gen::<f64>() < self.error_rate;
        SimulationOutcome { latency_ms, fail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy(error_rate: f64, min: u64, max: u64) -> SimulationPolicy {
        SimulationPolicy::new(&SimulationSection {
            error_rate,
            latency_min_ms: min,
            latency_max_ms: max,
        })
    }

    #[test]
    fn latency_stays_within_range() {
        let p = policy(0.1, 100, 1000);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let o = p.sample(&mut rng);
            assert!((100.0..=1000.0).contains(&o.latency_ms), "{}", o.latency_ms);
        }
    }

    #[test]
    fn failure_fraction_converges_to_error_rate() {
        let p = policy(0.1, 0, 0);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 100_000;
        let failures = (0..n).filter(|_| p.sample(&mut rng).fail).count();
        let rate = failures as f64 / n as f64;
        assert!((rate - 0.1).abs() < 0.01, "observed {rate}");
    }

    #[test]
    fn extreme_rates_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..1000).all(|_| !policy(0.0, 5, 5).sample(&mut rng).fail));
        assert!((0..1000).all(|_| policy(1.0, 5, 5).sample(&mut rng).fail));
    }

    #[test]
    fn fixed_range_yields_fixed_delay() {
        let mut rng = StdRng::seed_from_u64(3);
        let o = policy(0.5, 250, 250).sample(&mut rng);
        assert_eq!(o.delay(), Duration::from_millis(250));
    }
}
