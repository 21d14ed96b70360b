// SPDX-License-Identifier: Apache-2.0

//! Random network generation and exhaustive checks shared by the gatenet
//! integration tests.

use gatenet::simulation::simulate_truth_tables;
use gatenet::{Network, TruthTable};

pub mod network_recipe;
pub mod random_network;

pub use network_recipe::NetworkRecipe;
pub use random_network::{random_network, RandomNetworkShape};

/// Output functions of `ntk` over all of its primary inputs.
pub fn output_functions<N: Network>(ntk: &N) -> Vec<TruthTable> {
    simulate_truth_tables(ntk).expect("truth-table simulation of a well-formed network")
}

/// Panics unless `a` and `b` compute identical functions on every output,
/// checked by simulating all input assignments.
pub fn assert_equivalent_exhaustive<A: Network, B: Network>(a: &A, b: &B) {
    assert_eq!(a.num_pis(), b.num_pis(), "primary input counts differ");
    assert_eq!(a.num_pos(), b.num_pos(), "primary output counts differ");
    let lhs = output_functions(a);
    let rhs = output_functions(b);
    for (i, (l, r)) in lhs.iter().zip(rhs.iter()).enumerate() {
        assert_eq!(l, r, "output {} differs: {} vs {}", i, l, r);
    }
}

/// Recounts references to every node from live gates and primary outputs
/// and checks them against `fanout_size`.
pub fn assert_fanout_counts_consistent<N: Network>(ntk: &N) {
    let mut expected = vec![0usize; ntk.size()];
    for n in ntk.gates() {
        for s in ntk.fanins(n) {
            expected[ntk.get_node(s).id] += 1;
        }
    }
    for s in ntk.pos() {
        expected[ntk.get_node(s).id] += 1;
    }
    for n in ntk.nodes() {
        assert_eq!(
            ntk.fanout_size(n),
            expected[n.id],
            "fanout count of {} is stale",
            n
        );
    }
}

/// Panics unless hash-consing the fanins of every live gate finds that same
/// gate again: no live gate folds to a simpler signal, duplicates another
/// live gate, or is missing from the structural hash table.
pub fn assert_gates_hash_consed<N: Network>(ntk: &N) {
    let size = ntk.size();
    for g in ntk.gates().collect::<Vec<_>>() {
        let fanins = ntk.fanins(g);
        let found = ntk
            .clone_node(ntk, g, &fanins)
            .expect("cloning a live gate onto its own fanins");
        assert_eq!(
            ntk.get_node(found),
            g,
            "live gate {} is redundant with {}",
            g,
            ntk.get_node(found)
        );
        assert_eq!(ntk.size(), size, "live gate {} was not hash-consed", g);
    }
}
