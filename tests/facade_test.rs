// SPDX-License-Identifier: Apache-2.0

//! Iteration, scratch state, cross-network cloning, and simulation through
//! the common `Network` contract.

use std::ops::ControlFlow;

use gatenet::simulation::{simulate, simulate_nodes, PatternSimulator, WordSimulator};
use gatenet::{AigNetwork, KlutNetwork, MigNetwork, Network, NodeId};
use gatenet_test_helpers::{assert_equivalent_exhaustive, random_network, RandomNetworkShape};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use test_case::test_case;

fn small<N: Network + Default>() -> N {
    let ntk = N::default();
    let a = ntk.create_pi();
    let b = ntk.create_pi();
    let c = ntk.create_pi();
    let f = ntk.create_and(a, b);
    let g = ntk.create_xor(f, c);
    ntk.create_po(g);
    ntk.create_po(f);
    ntk
}

fn check_iteration<N: Network + Default>() {
    let ntk = small::<N>();
    let mut pis = Vec::new();
    ntk.foreach_pi(|n, i| {
        pis.push((n, i));
        ControlFlow::Continue(())
    });
    assert_eq!(pis.len(), 3);
    for (n, i) in pis {
        assert_eq!(ntk.pi_at(i), n);
        assert_eq!(ntk.pi_index(n), Some(i));
    }

    let mut visited = 0;
    ntk.foreach_node(|_| {
        visited += 1;
        if visited == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert_eq!(visited, 2);

    let mut outputs = Vec::new();
    ntk.foreach_po(|s, i| {
        outputs.push((s, i));
        ControlFlow::Continue(())
    });
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[1].0, ntk.po_at(1));

    let gates: Vec<NodeId> = ntk.gates().collect();
    assert_eq!(gates.len(), ntk.num_gates());
    for g in gates {
        let mut slots = 0;
        ntk.foreach_fanin(g, |_, i| {
            assert_eq!(i, slots);
            slots += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(slots, ntk.fanin_size(g));
    }
}

#[test]
fn test_iteration_all_families() {
    check_iteration::<AigNetwork>();
    check_iteration::<MigNetwork>();
    check_iteration::<KlutNetwork>();
}

#[test]
fn test_scratch_state() {
    let ntk = small::<MigNetwork>();
    let n = ntk.pi_at(0);
    assert_eq!(ntk.incr_value(n), 0);
    assert_eq!(ntk.incr_value(n), 1);
    assert_eq!(ntk.value(n), 2);
    assert_eq!(ntk.decr_value(n), 1);
    ntk.set_value(n, 9);
    ntk.clear_values();
    assert_eq!(ntk.value(n), 0);

    ntk.set_visited(n, 3);
    assert_eq!(ntk.visited(n), 3);
    ntk.clear_visited();
    assert_eq!(ntk.visited(n), 0);
}

/// Rebuilds `source` gate by gate in a fresh network with `clone_node`.
fn copy_by_cloning<N: Network + Default>(source: &N) -> N {
    let target = N::default();
    let mut map: Vec<Option<N::Signal>> = vec![None; source.size()];
    map[source.get_node(source.get_constant(false)).id] = Some(target.get_constant(false));
    if N::default().size() > 1 {
        // Families with a distinct constant-true node.
        map[source.get_node(source.get_constant(true)).id] = Some(target.get_constant(true));
    }
    for pi in source.pis().collect::<Vec<_>>() {
        map[pi.id] = Some(target.create_pi());
    }
    for n in gatenet::topo::topo_order(source) {
        if !source.is_gate(n) {
            continue;
        }
        let children: Vec<N::Signal> = source
            .fanins(n)
            .into_iter()
            .map(|s| {
                let mapped = map[source.get_node(s).id].expect("fanin cloned before its gate");
                if source.is_complemented(s) {
                    target.create_not(mapped)
                } else {
                    mapped
                }
            })
            .collect();
        map[n.id] = Some(target.clone_node(source, n, &children).unwrap());
    }
    for po in source.pos().collect::<Vec<_>>() {
        let mapped = map[source.get_node(po).id].expect("output driver cloned");
        let s = if source.is_complemented(po) {
            target.create_not(mapped)
        } else {
            mapped
        };
        target.create_po(s);
    }
    target
}

#[test_case(1 ; "seed 1")]
#[test_case(2 ; "seed 2")]
fn test_clone_node_copies_function(seed: u64) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let shape = RandomNetworkShape::default();

    let aig = AigNetwork::new();
    random_network(&aig, &mut rng, &shape);
    assert_equivalent_exhaustive(&aig, &copy_by_cloning(&aig));

    let mig = MigNetwork::new();
    random_network(&mig, &mut rng, &shape);
    assert_equivalent_exhaustive(&mig, &copy_by_cloning(&mig));

    let klut = KlutNetwork::new();
    random_network(&klut, &mut rng, &shape);
    assert_equivalent_exhaustive(&klut, &copy_by_cloning(&klut));
}

#[test]
fn test_word_simulation_matches_patterns() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let mig = MigNetwork::new();
    random_network(&mig, &mut rng, &RandomNetworkShape::default());
    // Lane `k` of input `i` is bit `i` of `k`, covering all 16 assignments.
    let words: Vec<u64> = (0..mig.num_pis())
        .map(|i| (0..64).fold(0u64, |w, k| w | ((((k >> i) & 1) as u64) << k)))
        .collect();
    let packed = simulate(&mig, &WordSimulator::new(&words)).unwrap();
    for k in 0..16usize {
        let pattern: Vec<bool> = (0..mig.num_pis()).map(|i| (k >> i) & 1 == 1).collect();
        let single = simulate(&mig, &PatternSimulator::new(&pattern)).unwrap();
        for (o, value) in single.iter().enumerate() {
            assert_eq!((packed[o] >> k) & 1 == 1, *value, "lane {} output {}", k, o);
        }
    }

    let nodes = simulate_nodes(&mig, &WordSimulator::new(&words)).unwrap();
    for pi in mig.pis() {
        assert_eq!(nodes[pi.id], Some(words[mig.pi_index(pi).unwrap()]));
    }
}
