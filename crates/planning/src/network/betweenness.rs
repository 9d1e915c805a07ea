use std::collections::VecDeque;

use super::graph::NetworkGraph;

/// Unweighted betweenness centrality (Brandes), normalized by
/// `1 / ((n - 1)(n - 2))` over ordered source/target pairs.
///
/// Graphs with two or fewer nodes have no intermediate nodes and return
/// zeros.
pub fn betweenness_centrality(graph: &NetworkGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];
    if n <= 2 {
        return centrality;
    }

    let mut stack: Vec<u32> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<u32>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut distance = vec![-1i64; n];
    let mut delta = vec![0.0f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for source in 0..n as u32 {
        stack.clear();
        for p in &mut predecessors {
            p.clear();
        }
        sigma.fill(0.0);
        distance.fill(-1);
        delta.fill(0.0);

        sigma[source as usize] = 1.0;
        distance[source as usize] = 0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = distance[v as usize];
            for &w in graph.neighbors(v) {
                let wi = w as usize;
                if distance[wi] < 0 {
                    distance[wi] = dv + 1;
                    queue.push_back(w);
                }
                if distance[wi] == dv + 1 {
                    sigma[wi] += sigma[v as usize];
                    predecessors[wi].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            let wi = w as usize;
            for &v in &predecessors[wi] {
                let vi = v as usize;
                delta[vi] += sigma[vi] / sigma[wi] * (1.0 + delta[wi]);
            }
            if w != source {
                centrality[wi] += delta[wi];
            }
        }
    }

    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for c in &mut centrality {
        *c *= scale;
    }
    centrality
}
