//! Episode runner - drives a planner through simulated episodes

use mdp_core::{sample, MdpModel, Result};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::planner::Planner;

/// Outcome of one simulated episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub steps: u64,
    pub total_reward: f64,
    pub reached_terminal: bool,
}

/// Aggregated evaluation statistics
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStats {
    pub planner: String,
    pub episodes: Vec<EpisodeReport>,
    pub mean_steps: f64,
    pub mean_reward: f64,
    pub success_rate: f64,
}

impl EvaluationStats {
    fn from_reports(planner: &str, episodes: Vec<EpisodeReport>) -> Self {
        let n = episodes.len();
        let (mean_steps, mean_reward, success_rate) = if n > 0 {
            let n = n as f64;
            (
                episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
                episodes.iter().map(|e| e.total_reward).sum::<f64>() / n,
                episodes.iter().filter(|e| e.reached_terminal).count() as f64 / n,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        Self {
            planner: planner.to_string(),
            episodes,
            mean_steps,
            mean_reward,
            success_rate,
        }
    }
}

/// Run one episode from the model's initial state until terminal or
/// `max_steps`, asking `planner` for every action
pub fn run_episode<M, P, R>(
    model: &M,
    planner: &mut P,
    rng: &mut R,
    max_steps: u64,
) -> Result<EpisodeReport>
where
    M: MdpModel,
    P: Planner<State = M::State, Action = M::Action>,
    R: Rng + ?Sized,
{
    let mut state = model.initial_state();
    let mut steps = 0;
    let mut total_reward = 0.0;

    while !model.is_terminal(&state) && steps < max_steps {
        let action = planner.plan(&state)?;
        let (next, reward) = sample(model, &state, &action, rng)?;
        total_reward += reward;
        state = next;
        steps += 1;
    }

    Ok(EpisodeReport {
        episode: 0,
        steps,
        total_reward,
        reached_terminal: model.is_terminal(&state),
    })
}

/// Run `episodes` episodes and aggregate their reports
pub fn evaluate<M, P, R>(
    model: &M,
    planner: &mut P,
    rng: &mut R,
    episodes: usize,
    max_steps: u64,
) -> Result<EvaluationStats>
where
    M: MdpModel,
    P: Planner<State = M::State, Action = M::Action>,
    R: Rng + ?Sized,
{
    let mut reports = Vec::with_capacity(episodes);
    for i in 0..episodes {
        let mut report = run_episode(model, planner, rng, max_steps)?;
        report.episode = i + 1;
        debug!(
            planner = planner.name(),
            episode = report.episode,
            steps = report.steps,
            total_reward = report.total_reward,
            "Evaluation episode complete"
        );
        reports.push(report);
    }

    let stats = EvaluationStats::from_reports(planner.name(), reports);
    info!(
        planner = %stats.planner,
        mean_steps = stats.mean_steps,
        mean_reward = stats.mean_reward,
        success_rate = stats.success_rate,
        "Evaluation finished"
    );
    Ok(stats)
}
