//! CLI command modules

pub mod bandit;
pub mod config;
pub mod mcts;
pub mod rtdp;

use mdp_planners::EvaluationStats;

/// Print one line per evaluation episode followed by the summary
pub fn print_evaluation(stats: &EvaluationStats) {
    println!("Evaluation ({})", stats.planner);
    println!("=================\n");
    for report in &stats.episodes {
        println!(
            "Episode {}: Steps to goal = {}, Total reward = {}",
            report.episode, report.steps, report.total_reward
        );
    }
    println!();
    println!("Mean steps:   {:.2}", stats.mean_steps);
    println!("Mean reward:  {:.2}", stats.mean_reward);
    println!("Success rate: {:.0}%", stats.success_rate * 100.0);
}
