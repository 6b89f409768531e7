//! Multi-armed bandit arm selection strategies

use mdp_core::{PlanError, Result};
use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Pull counts and running mean reward per arm
#[derive(Debug, Clone, PartialEq)]
struct ArmStats {
    pulls: Vec<u64>,
    estimates: Vec<f64>,
}

impl ArmStats {
    fn new(n_arms: usize) -> Self {
        Self {
            pulls: vec![0; n_arms],
            estimates: vec![0.0; n_arms],
        }
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.pulls[arm] += 1;
        let n = self.pulls[arm] as f64;
        self.estimates[arm] += (reward - self.estimates[arm]) / n;
    }
}

/// Trait for bandit arm selection strategies
pub trait ArmSelector {
    /// Strategy name
    fn name(&self) -> &str;

    /// Choose the next arm to pull
    fn select_arm<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize;

    /// Record the reward observed for `arm`
    fn update(&mut self, arm: usize, reward: f64);

    fn pulls(&self) -> &[u64];

    fn estimates(&self) -> &[f64];

    fn n_arms(&self) -> usize {
        self.pulls().len()
    }
}

/// Pure exploration - every pull picks an arm uniformly at random
#[derive(Debug, Clone)]
pub struct ExplorationOnly {
    stats: ArmStats,
}

impl ExplorationOnly {
    pub fn new(n_arms: usize) -> Self {
        Self {
            stats: ArmStats::new(n_arms),
        }
    }
}

impl ArmSelector for ExplorationOnly {
    fn name(&self) -> &str {
        "exploration_only"
    }

    fn select_arm<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        rng.gen_range(0..self.stats.pulls.len())
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.stats.update(arm, reward);
    }

    fn pulls(&self) -> &[u64] {
        &self.stats.pulls
    }

    fn estimates(&self) -> &[f64] {
        &self.stats.estimates
    }
}

/// Upper Confidence Bound (UCB1 with exploration weight `c`)
#[derive(Debug, Clone)]
pub struct Ucb {
    stats: ArmStats,
    c: f64,
}

impl Ucb {
    pub const DEFAULT_C: f64 = 2.0;

    pub fn new(n_arms: usize, c: f64) -> Self {
        Self {
            stats: ArmStats::new(n_arms),
            c,
        }
    }
}

impl ArmSelector for Ucb {
    fn name(&self) -> &str {
        "ucb"
    }

    fn select_arm<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> usize {
        if let Some(untried) = self.stats.pulls.iter().position(|&p| p == 0) {
            return untried;
        }

        let total = self.stats.pulls.iter().sum::<u64>() as f64;
        let mut best = (0, f64::NEG_INFINITY);
        let arms = self.stats.pulls.iter().zip(&self.stats.estimates);
        for (arm, (&pulls, &estimate)) in arms.enumerate() {
            let bound = estimate + self.c * (total.ln() / pulls as f64).sqrt();
            if bound > best.1 {
                best = (arm, bound);
            }
        }
        best.0
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.stats.update(arm, reward);
    }

    fn pulls(&self) -> &[u64] {
        &self.stats.pulls
    }

    fn estimates(&self) -> &[f64] {
        &self.stats.estimates
    }
}

/// Result of a bandit experiment
#[derive(Debug, Clone, Serialize)]
pub struct BanditReport {
    pub strategy: String,
    pub total_reward: f64,
    pub pulls: Vec<u64>,
    pub estimates: Vec<f64>,
    /// Expected reward lost against always pulling the best arm
    pub regret: f64,
}

/// Pull Bernoulli arms with success probabilities `arms` for `pulls` rounds
pub fn run_bandit<S, R>(
    selector: &mut S,
    arms: &[f64],
    pulls: u64,
    rng: &mut R,
) -> Result<BanditReport>
where
    S: ArmSelector,
    R: Rng + ?Sized,
{
    if arms.is_empty() || arms.len() != selector.n_arms() {
        return Err(PlanError::Config(format!(
            "selector has {} arms but {} probabilities were given",
            selector.n_arms(),
            arms.len()
        )));
    }
    let dists = arms
        .iter()
        .map(|&p| {
            Bernoulli::new(p)
                .map_err(|e| PlanError::Config(format!("arm probability {p}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let best = arms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut total_reward = 0.0;
    let mut regret = 0.0;

    for _ in 0..pulls {
        let arm = selector.select_arm(rng);
        let reward = if dists[arm].sample(rng) { 1.0 } else { 0.0 };
        selector.update(arm, reward);
        total_reward += reward;
        regret += best - arms[arm];
    }

    debug!(
        strategy = selector.name(),
        total_reward,
        regret,
        "Bandit run complete"
    );

    Ok(BanditReport {
        strategy: selector.name().to_string(),
        total_reward,
        pulls: selector.pulls().to_vec(),
        estimates: selector.estimates().to_vec(),
        regret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_estimates_are_running_means() {
        let mut ucb = Ucb::new(2, 2.0);
        ucb.update(1, 1.0);
        ucb.update(1, 0.0);
        ucb.update(1, 1.0);
        assert_eq!(ucb.pulls(), &[0, 3]);
        assert!((ucb.estimates()[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_pulls_untried_arms_first() {
        let rng = &mut StdRng::seed_from_u64(0);
        let mut ucb = Ucb::new(3, 2.0);
        for expected in 0..3 {
            let arm = ucb.select_arm(rng);
            assert_eq!(arm, expected);
            ucb.update(arm, 0.0);
        }
    }

    #[test]
    fn test_ucb_prefers_higher_bound() {
        let rng = &mut StdRng::seed_from_u64(0);
        let mut ucb = Ucb::new(2, 0.0);
        ucb.update(0, 0.2);
        ucb.update(1, 0.9);
        assert_eq!(ucb.select_arm(rng), 1);
    }

    #[test]
    fn test_ucb_exploration_bonus_favors_rare_arm() {
        let rng = &mut StdRng::seed_from_u64(0);
        let mut ucb = Ucb::new(2, 2.0);
        ucb.update(0, 0.6);
        for _ in 0..50 {
            ucb.update(1, 0.7);
        }
        assert_eq!(ucb.select_arm(rng), 0);
    }

    #[test]
    fn test_exploration_only_covers_all_arms() {
        let rng = &mut StdRng::seed_from_u64(3);
        let mut explore = ExplorationOnly::new(4);
        let report = run_bandit(&mut explore, &[0.1, 0.2, 0.3, 0.4], 400, rng).unwrap();
        assert!(report.pulls.iter().all(|&p| p > 50));
        assert_eq!(report.pulls.iter().sum::<u64>(), 400);
    }

    #[test]
    fn test_ucb_has_less_regret_than_exploration() {
        let arms = [0.1, 0.5, 0.9];
        let mut ucb = Ucb::new(3, 2.0);
        let mut explore = ExplorationOnly::new(3);
        let ucb_report = run_bandit(&mut ucb, &arms, 2_000, &mut StdRng::seed_from_u64(1)).unwrap();
        let explore_report =
            run_bandit(&mut explore, &arms, 2_000, &mut StdRng::seed_from_u64(1)).unwrap();

        assert!(ucb_report.regret < explore_report.regret);
        let best_arm = ucb_report
            .pulls
            .iter()
            .enumerate()
            .max_by_key(|&(_, p)| *p)
            .map(|(i, _)| i);
        assert_eq!(best_arm, Some(2));
    }

    #[test]
    fn test_run_bandit_rejects_bad_arms() {
        let rng = &mut StdRng::seed_from_u64(0);
        let mut ucb = Ucb::new(2, 2.0);
        assert!(run_bandit(&mut ucb, &[0.5], 10, rng).is_err());
        assert!(run_bandit(&mut ucb, &[0.5, 1.5], 10, rng).is_err());
    }
}
