// SPDX-License-Identifier: Apache-2.0

use crate::network::Network;
use crate::signal::NodeId;

/// Returns a postorder over the nodes reachable from the primary outputs
/// (dedup by node): every node appears after all of its fanins.
///
/// Creation order is not necessarily topological once `substitute_node` has
/// redirected references to a node created later, so consumers that need
/// fanins evaluated first use this instead of plain node iteration.
pub fn topo_order<N: Network>(ntk: &N) -> Vec<NodeId> {
    let roots: Vec<NodeId> = ntk.pos().map(|s| ntk.get_node(s)).collect();
    postorder_from(ntk, &roots)
}

/// Postorder over the transitive fanin of `roots`.
pub fn postorder_from<N: Network>(ntk: &N, roots: &[NodeId]) -> Vec<NodeId> {
    let mut visited = vec![false; ntk.size()];
    let mut postorder = Vec::new();
    let mut worklist: Vec<NodeId> = roots.iter().rev().copied().collect();
    while let Some(current) = worklist.pop() {
        if visited[current.id] {
            continue;
        }
        let mut all_deps_visited = true;
        for dep in ntk.fanins(current) {
            let dep = ntk.get_node(dep);
            if !visited[dep.id] {
                worklist.push(current); // Revisit after dependencies
                worklist.push(dep);
                all_deps_visited = false;
                break;
            }
        }
        if all_deps_visited {
            visited[current.id] = true;
            postorder.push(current);
        }
    }
    postorder
}

/// Length of the longest path from any primary input or constant to a
/// primary output, counted in gates.
pub fn depth<N: Network>(ntk: &N) -> usize {
    let mut levels = vec![0usize; ntk.size()];
    let mut max_level = 0;
    for n in topo_order(ntk) {
        if !ntk.is_gate(n) {
            continue;
        }
        let level = ntk
            .fanins(n)
            .into_iter()
            .map(|s| levels[ntk.get_node(s).id])
            .max()
            .unwrap_or(0)
            + 1;
        levels[n.id] = level;
        max_level = max_level.max(level);
    }
    max_level
}
