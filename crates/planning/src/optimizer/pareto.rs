use super::objectives::OptimizationSolution;

/// Keep the solutions no other solution dominates, in their original order.
///
/// Pairwise O(n²); identical objective vectors never dominate each other, so
/// duplicates survive together.
pub fn pareto_front(solutions: &[OptimizationSolution]) -> Vec<OptimizationSolution> {
    solutions
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !solutions
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && other.objectives.dominates(&candidate.objectives))
        })
        .map(|(_, s)| s.clone())
        .collect()
}
