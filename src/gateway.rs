//! Simulated payment gateway. No money moves; the outcome is a weighted coin flip.

use std::time::Duration;

use rand::Rng;

use crate::status::PaymentStatus;

pub const DEFAULT_SUCCESS_RATE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved,
    Declined,
}

impl ChargeOutcome {
    pub fn status(self) -> PaymentStatus {
        match self {
            ChargeOutcome::Approved => PaymentStatus::Paid,
            ChargeOutcome::Declined => PaymentStatus::Failed,
        }
    }
}

pub trait PaymentGateway {
    /// Decide the outcome of a charge. Callers supply the RNG so tests can seed it.
    fn decide<R: Rng + ?Sized>(&self, amount: i64, rng: &mut R) -> ChargeOutcome;

    /// Simulated processing latency.
    fn latency(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    pub success_rate: f64,
    pub delay: Duration,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self {
            success_rate: DEFAULT_SUCCESS_RATE,
            delay: Duration::ZERO,
        }
    }
}

impl SimulatedGateway {
    pub fn new(success_rate: f64, delay: Duration) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            delay,
        }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn decide<R: Rng + ?Sized>(&self, amount: i64, rng: &mut R) -> ChargeOutcome {
        if amount <= 0 {
            return ChargeOutcome::Declined;
        }
        if rng.gen_bool(self.success_rate) {
            ChargeOutcome::Approved
        } else {
            ChargeOutcome::Declined
        }
    }

    fn latency(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn seeded_outcomes_repeat() {
        let gateway = SimulatedGateway::default();
        let first: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| gateway.decide(1000, &mut rng)).collect()
        };
        let second: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| gateway.decide(1000, &mut rng)).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn success_rate_is_roughly_ninety_percent() {
        let gateway = SimulatedGateway::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let approved = (0..10_000)
            .filter(|_| gateway.decide(500, &mut rng) == ChargeOutcome::Approved)
            .count();
        assert!((8_700..=9_300).contains(&approved), "approved = {approved}");
    }

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let always = SimulatedGateway::new(1.0, Duration::ZERO);
        let never = SimulatedGateway::new(0.0, Duration::ZERO);
        assert_eq!(always.decide(1, &mut rng), ChargeOutcome::Approved);
        assert_eq!(never.decide(1, &mut rng), ChargeOutcome::Declined);
        assert_eq!(always.decide(0, &mut rng), ChargeOutcome::Declined);
        assert_eq!(ChargeOutcome::Approved.status(), PaymentStatus::Paid);
    }
}
