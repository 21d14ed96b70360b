// SPDX-License-Identifier: Apache-2.0

//! Structural contracts every network family honors: hash-consing, fanout
//! accounting, and substitution.

use gatenet::topo::postorder_from;
use gatenet::{AigNetwork, KlutNetwork, MigNetwork, Network, NetworkError, NodeId, TruthTable};
use gatenet_test_helpers::{
    assert_fanout_counts_consistent, assert_gates_hash_consed, random_network, RandomNetworkShape,
};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Child slots of live gates plus primary outputs that reference `n`.
fn count_references<N: Network>(ntk: &N, n: NodeId) -> usize {
    let slots: usize = ntk
        .gates()
        .map(|g| ntk.fanins(g).into_iter().filter(|s| ntk.get_node(*s) == n).count())
        .sum();
    slots + ntk.pos().filter(|s| ntk.get_node(*s) == n).count()
}

fn check_hash_consing<N: Network>(ntk: N) {
    let a = ntk.create_pi();
    let b = ntk.create_pi();
    let c = ntk.create_pi();
    let and1 = ntk.create_and(a, b);
    let size = ntk.size();
    assert_eq!(ntk.create_and(a, b), and1);
    assert_eq!(ntk.size(), size);

    let maj1 = ntk.create_maj(a, b, c);
    let size = ntk.size();
    assert_eq!(ntk.create_maj(a, b, c), maj1);
    assert_eq!(ntk.size(), size);
}

#[test]
fn test_hash_consing_all_families() {
    check_hash_consing(AigNetwork::new());
    check_hash_consing(MigNetwork::new());
    check_hash_consing(KlutNetwork::new());
}

/// Commutative constructors collapse every operand ordering onto one node.
fn check_operand_orderings_share_nodes<N: Network>(ntk: N) {
    let a = ntk.create_pi();
    let b = ntk.create_pi();
    let c = ntk.create_pi();
    let and = ntk.create_and(a, b);
    let or = ntk.create_or(b, c);
    let xor = ntk.create_xor(a, c);
    let maj = ntk.create_maj(a, b, c);
    let size = ntk.size();

    assert_eq!(ntk.create_and(b, a), and);
    assert_eq!(ntk.create_or(c, b), or);
    assert_eq!(ntk.create_xor(c, a), xor);
    for (x, y, z) in [(a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)] {
        assert_eq!(ntk.create_maj(x, y, z), maj);
    }
    assert_eq!(ntk.size(), size);
    assert_gates_hash_consed(&ntk);
}

#[test]
fn test_operand_orderings_share_nodes_all_families() {
    check_operand_orderings_share_nodes(AigNetwork::new());
    check_operand_orderings_share_nodes(MigNetwork::new());
    check_operand_orderings_share_nodes(KlutNetwork::new());
}

#[test]
fn test_permutation_equivalent_orderings_share_nodes() {
    let aig = AigNetwork::new();
    let a = aig.create_pi();
    let b = aig.create_pi();
    assert_eq!(aig.create_and(a, !b), aig.create_and(!b, a));

    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let m = mig.create_maj(a, !b, c);
    let size = mig.size();
    for (x, y, z) in [(c, a, !b), (!b, c, a), (a, c, !b)] {
        assert_eq!(mig.create_maj(x, y, z), m);
    }
    assert_eq!(mig.size(), size);

    let klut = KlutNetwork::new();
    let a = klut.create_pi();
    let b = klut.create_pi();
    let c = klut.create_pi();
    let and = klut.create_and(a, b);
    let maj = klut.create_maj(a, b, c);
    let size = klut.size();
    assert_eq!(klut.create_and(b, a), and);
    assert_eq!(klut.create_maj(c, a, b), maj);
    assert_eq!(klut.size(), size);
}

#[test]
fn test_klut_distinguishes_functions_over_same_children() {
    let klut = KlutNetwork::new();
    let a = klut.create_pi();
    let b = klut.create_pi();
    let and = klut.create_node(&[a, b], &TruthTable::from_word(2, 0x8)).unwrap();
    let or = klut.create_node(&[a, b], &TruthTable::from_word(2, 0xe)).unwrap();
    assert_ne!(and, or);
    assert_eq!(klut.create_and(a, b), and);
    assert!(matches!(
        klut.create_node(&[a], &TruthTable::from_word(2, 0x8)),
        Err(NetworkError::ArityMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

/// Substitutes random gates by earlier, non-fanin nodes and checks the
/// substitution contract after every step. `complement` picks complemented
/// replacements too; it must be off for families where complementing creates
/// a node.
fn check_random_substitutions<N: Network>(make: impl Fn() -> N, seed: u64, complement: bool) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    for _ in 0..16 {
        let ntk = make();
        random_network(&ntk, &mut rng, &RandomNetworkShape::default());
        assert_fanout_counts_consistent(&ntk);
        assert_gates_hash_consed(&ntk);
        for _ in 0..4 {
            let gates: Vec<NodeId> = ntk.gates().collect();
            if gates.is_empty() {
                break;
            }
            let old = gates[rng.gen_range(0..gates.len())];
            let fanin_cone = postorder_from(&ntk, &[old]);
            let candidates: Vec<NodeId> = ntk
                .nodes()
                .filter(|n| n.id < old.id && !fanin_cone.contains(n))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let new_node = candidates[rng.gen_range(0..candidates.len())];
            let mut new = ntk.make_signal(new_node);
            if complement && rng.gen_bool(0.5) {
                new = ntk.create_not(new);
            }

            assert_eq!(ntk.fanout_size(old), count_references(&ntk, old));
            ntk.substitute_node(old, new).unwrap();

            assert_eq!(ntk.fanout_size(old), 0);
            assert_eq!(count_references(&ntk, old), 0);
            assert!(ntk.is_dead(old));
            assert_fanout_counts_consistent(&ntk);
            assert_gates_hash_consed(&ntk);
        }
    }
}

#[test]
fn test_random_substitutions_aig() {
    check_random_substitutions(AigNetwork::new, 1, true);
}

#[test]
fn test_random_substitutions_mig() {
    check_random_substitutions(MigNetwork::new, 2, true);
}

#[test]
fn test_random_substitutions_klut() {
    check_random_substitutions(KlutNetwork::new, 3, false);
}

#[test]
fn test_substitution_errors() {
    let aig = AigNetwork::new();
    let a = aig.create_pi();
    let b = aig.create_pi();
    let f = aig.create_and(a, b);
    aig.create_po(f);
    assert!(matches!(
        aig.substitute_node(f.node, f),
        Err(NetworkError::SelfSubstitution(_))
    ));
    assert!(matches!(
        aig.substitute_node(NodeId::new(100), a),
        Err(NetworkError::NodeOutOfRange { .. })
    ));
    assert!(matches!(
        aig.substitute_node(aig.get_node(aig.get_constant(false)), a),
        Err(NetworkError::NotAGate(_))
    ));
}

#[test]
fn test_substituted_output_keeps_polarity() {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let f = mig.create_maj(a, b, c);
    mig.create_po(!f);
    mig.substitute_node(f.node, !a).unwrap();
    assert_eq!(mig.po_at(0), a);
}

/// Without any merging parents, the new node gains exactly the redirected
/// references.
fn check_substitution_redirects_references<N: Network>(ntk: N) {
    let a = ntk.create_pi();
    let b = ntk.create_pi();
    let c = ntk.create_pi();
    let old = ntk.create_and(a, b);
    let new = ntk.create_xor(b, c);
    let p = ntk.create_and(old, c);
    let q = ntk.create_or(old, a);
    ntk.create_po(old);
    ntk.create_po(p);
    ntk.create_po(q);

    let old_node = ntk.get_node(old);
    let new_node = ntk.get_node(new);
    let redirected = count_references(&ntk, old_node);
    let new_fanout = ntk.fanout_size(new_node);
    ntk.substitute_node(old_node, new).unwrap();

    assert_eq!(redirected, 3);
    assert_eq!(ntk.fanout_size(new_node), new_fanout + redirected);
    assert_eq!(ntk.po_at(0), new);
    assert_fanout_counts_consistent(&ntk);
    assert_gates_hash_consed(&ntk);
}

#[test]
fn test_substitution_redirects_references_all_families() {
    check_substitution_redirects_references(AigNetwork::new());
    check_substitution_redirects_references(MigNetwork::new());
    check_substitution_redirects_references(KlutNetwork::new());
}

/// A parent that becomes structurally identical to another live gate is
/// merged into it, and the merge cascades to the parents above it.
fn check_substitution_merges_duplicates<N: Network>(ntk: N) {
    let _ = env_logger::builder().is_test(true).try_init();
    let a = ntk.create_pi();
    let b = ntk.create_pi();
    let c = ntk.create_pi();
    let d = ntk.create_pi();
    let old = ntk.create_and(a, b);
    let new = ntk.create_or(a, b);
    let p1 = ntk.create_and(old, c);
    let q1 = ntk.create_and(new, c);
    let p2 = ntk.create_and(p1, d);
    let q2 = ntk.create_and(q1, d);
    ntk.create_po(p2);
    ntk.create_po(q2);
    ntk.create_po(p1);
    let live_before = ntk.gates().count();

    ntk.substitute_node(ntk.get_node(old), new).unwrap();

    assert!(ntk.is_dead(ntk.get_node(p1)));
    assert!(ntk.is_dead(ntk.get_node(p2)));
    assert_eq!(ntk.po_at(0), q2);
    assert_eq!(ntk.po_at(1), q2);
    assert_eq!(ntk.po_at(2), q1);
    assert_eq!(ntk.gates().count(), live_before - 3);
    assert_fanout_counts_consistent(&ntk);
    assert_gates_hash_consed(&ntk);
}

#[test]
fn test_substitution_merges_duplicates_all_families() {
    check_substitution_merges_duplicates(AigNetwork::new());
    check_substitution_merges_duplicates(MigNetwork::new());
    check_substitution_merges_duplicates(KlutNetwork::new());
}

#[test]
fn test_substitution_folds_trivial_parents() {
    let aig = AigNetwork::new();
    let a = aig.create_pi();
    let b = aig.create_pi();
    let c = aig.create_pi();
    let old = aig.create_and(a, b);
    let new = aig.create_and(b, c);
    let p = aig.create_and(old, new);
    let r = aig.create_and(!old, new);
    aig.create_po(p);
    aig.create_po(!r);
    aig.substitute_node(old.node, new).unwrap();
    assert!(aig.is_dead(p.node));
    assert!(aig.is_dead(r.node));
    assert_eq!(aig.po_at(0), new);
    assert_eq!(aig.po_at(1), aig.get_constant(true));
    assert_fanout_counts_consistent(&aig);
    assert_gates_hash_consed(&aig);

    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let old = mig.create_and(a, b);
    let new = mig.create_or(a, b);
    let p = mig.create_maj(old, !new, c);
    mig.create_po(p);
    mig.substitute_node(old.node, new).unwrap();
    assert!(mig.is_dead(p.node));
    assert_eq!(mig.po_at(0), c);
    assert_fanout_counts_consistent(&mig);
    assert_gates_hash_consed(&mig);
}
