use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::objectives::{Objective, OptimizationSolution};

/// Pairwise relationships between objectives across the Pareto set. Keys
/// look like `sustainability_vs_density`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeOffAnalysis {
    /// Pearson correlation; `None` when either objective is constant.
    pub correlations: BTreeMap<String, Option<f64>>,
    /// Mean of Δi/Δj over solution pairs where objective j differs.
    pub trade_off_ratios: BTreeMap<String, f64>,
    pub solution_count: usize,
}

impl TradeOffAnalysis {
    pub fn is_empty(&self) -> bool {
        self.correlations.is_empty() && self.trade_off_ratios.is_empty()
    }
}

/// The six unordered objective pairs.
pub fn objective_pairs() -> Vec<(Objective, Objective)> {
    let mut pairs = Vec::with_capacity(6);
    for (i, a) in Objective::ALL.iter().enumerate() {
        for b in &Objective::ALL[i + 1..] {
            pairs.push((*a, *b));
        }
    }
    pairs
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn mean_marginal_ratio(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..xs.len() {
        for j in (i + 1)..xs.len() {
            let dy = ys[j] - ys[i];
            if dy != 0.0 {
                total += (xs[j] - xs[i]) / dy;
                count += 1;
            }
        }
    }
    (count > 0).then(|| total / count as f64)
}

/// Empty when the Pareto set has fewer than two solutions.
pub fn trade_offs(pareto: &[OptimizationSolution]) -> TradeOffAnalysis {
    if pareto.len() < 2 {
        return TradeOffAnalysis::default();
    }
    let column = |objective: Objective| -> Vec<f64> {
        pareto.iter().map(|s| s.objectives.get(objective)).collect()
    };

    let mut analysis = TradeOffAnalysis {
        solution_count: pareto.len(),
        ..Default::default()
    };
    for (a, b) in objective_pairs() {
        let key = format!("{}_vs_{}", a.key(), b.key());
        let (xs, ys) = (column(a), column(b));
        analysis.correlations.insert(key.clone(), pearson(&xs, &ys));
        if let Some(ratio) = mean_marginal_ratio(&xs, &ys) {
            analysis.trade_off_ratios.insert(key, ratio);
        }
    }
    analysis
}
