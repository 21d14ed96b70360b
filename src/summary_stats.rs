// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::algorithms::inverter_optimization::count_complemented_edges;
use crate::network::Network;
use crate::topo::{depth, topo_order};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub num_pis: usize,
    pub num_pos: usize,
    /// Gates ever created, including ones released by substitution.
    pub num_gates: usize,
    /// Gates in the transitive fanin of some primary output.
    pub live_gates: usize,
    pub depth: usize,
    pub complemented_edges: usize,
    /// `{fanout size: count}` over primary inputs and gates.
    pub fanout_histogram: BTreeMap<usize, usize>,
}

pub fn get_summary_stats<N: Network>(ntk: &N) -> SummaryStats {
    let live_gates = topo_order(ntk)
        .into_iter()
        .filter(|n| ntk.is_gate(*n))
        .count();
    let mut fanout_histogram = BTreeMap::new();
    for n in ntk.nodes().filter(|n| !ntk.is_constant(*n)) {
        *fanout_histogram.entry(ntk.fanout_size(n)).or_insert(0) += 1;
    }
    SummaryStats {
        num_pis: ntk.num_pis(),
        num_pos: ntk.num_pos(),
        num_gates: ntk.num_gates(),
        live_gates,
        depth: depth(ntk),
        complemented_edges: count_complemented_edges(ntk),
        fanout_histogram,
    }
}
