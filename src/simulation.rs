// SPDX-License-Identifier: Apache-2.0

//! Simulation of networks over booleans, 64-bit pattern words, and truth
//! tables.

use crate::network::Network;
use crate::network_error::NetworkError;
use crate::signal::NodeId;
use crate::topo::topo_order;
use crate::truth_table::TruthTable;

/// A value that gates can be evaluated over. Each value holds `bit_count()`
/// independent simulation lanes.
pub trait SimValue: Clone + PartialEq + std::fmt::Debug {
    fn complement(&self) -> Self;
    fn and(&self, other: &Self) -> Self;
    fn or(&self, other: &Self) -> Self;
    fn xor(&self, other: &Self) -> Self;

    fn maj(a: &Self, b: &Self, c: &Self) -> Self {
        a.and(b).or(&a.and(c)).or(&b.and(c))
    }

    fn bit_count(&self) -> usize;
    fn bit(&self, index: usize) -> bool;
    fn set_bit(&mut self, index: usize, value: bool);
    /// All-zero value with the same number of lanes.
    fn zero_like(&self) -> Self;

    fn complement_if(&self, cond: bool) -> Self {
        if cond {
            self.complement()
        } else {
            self.clone()
        }
    }
}

impl SimValue for bool {
    fn complement(&self) -> Self {
        !*self
    }

    fn and(&self, other: &Self) -> Self {
        *self && *other
    }

    fn or(&self, other: &Self) -> Self {
        *self || *other
    }

    fn xor(&self, other: &Self) -> Self {
        *self ^ *other
    }

    fn bit_count(&self) -> usize {
        1
    }

    fn bit(&self, _index: usize) -> bool {
        *self
    }

    fn set_bit(&mut self, _index: usize, value: bool) {
        *self = value;
    }

    fn zero_like(&self) -> Self {
        false
    }
}

impl SimValue for u64 {
    fn complement(&self) -> Self {
        !*self
    }

    fn and(&self, other: &Self) -> Self {
        *self & *other
    }

    fn or(&self, other: &Self) -> Self {
        *self | *other
    }

    fn xor(&self, other: &Self) -> Self {
        *self ^ *other
    }

    fn bit_count(&self) -> usize {
        64
    }

    fn bit(&self, index: usize) -> bool {
        (*self >> index) & 1 == 1
    }

    fn set_bit(&mut self, index: usize, value: bool) {
        if value {
            *self |= 1u64 << index;
        } else {
            *self &= !(1u64 << index);
        }
    }

    fn zero_like(&self) -> Self {
        0
    }
}

impl SimValue for TruthTable {
    fn complement(&self) -> Self {
        !self
    }

    fn and(&self, other: &Self) -> Self {
        self & other
    }

    fn or(&self, other: &Self) -> Self {
        self | other
    }

    fn xor(&self, other: &Self) -> Self {
        self ^ other
    }

    fn bit_count(&self) -> usize {
        self.num_bits()
    }

    fn bit(&self, index: usize) -> bool {
        self.get_bit(index)
    }

    fn set_bit(&mut self, index: usize, value: bool) {
        TruthTable::set_bit(self, index, value)
    }

    fn zero_like(&self) -> Self {
        self.construct()
    }
}

/// Supplies the values of constants and primary inputs.
pub trait Simulator<V: SimValue> {
    /// Number of primary inputs the simulator supplies values for.
    fn num_pis(&self) -> usize;
    fn compute_constant(&self, value: bool) -> V;
    fn compute_pi(&self, index: usize) -> V;
}

/// Simulates one input assignment.
pub struct PatternSimulator<'a> {
    pattern: &'a [bool],
}

impl<'a> PatternSimulator<'a> {
    pub fn new(pattern: &'a [bool]) -> Self {
        PatternSimulator { pattern }
    }
}

impl Simulator<bool> for PatternSimulator<'_> {
    fn num_pis(&self) -> usize {
        self.pattern.len()
    }

    fn compute_constant(&self, value: bool) -> bool {
        value
    }

    fn compute_pi(&self, index: usize) -> bool {
        self.pattern[index]
    }
}

/// Simulates 64 assignments at once, one word per primary input.
pub struct WordSimulator<'a> {
    words: &'a [u64],
}

impl<'a> WordSimulator<'a> {
    pub fn new(words: &'a [u64]) -> Self {
        WordSimulator { words }
    }
}

impl Simulator<u64> for WordSimulator<'_> {
    fn num_pis(&self) -> usize {
        self.words.len()
    }

    fn compute_constant(&self, value: bool) -> u64 {
        if value {
            u64::MAX
        } else {
            0
        }
    }

    fn compute_pi(&self, index: usize) -> u64 {
        self.words[index]
    }
}

/// Computes complete truth tables; primary input `i` is variable `i`.
pub struct TruthTableSimulator {
    num_vars: usize,
}

impl TruthTableSimulator {
    pub fn new(num_vars: usize) -> Self {
        TruthTableSimulator { num_vars }
    }
}

impl Simulator<TruthTable> for TruthTableSimulator {
    fn num_pis(&self) -> usize {
        self.num_vars
    }

    fn compute_constant(&self, value: bool) -> TruthTable {
        let zero = TruthTable::new(self.num_vars);
        if value {
            !zero
        } else {
            zero
        }
    }

    fn compute_pi(&self, index: usize) -> TruthTable {
        TruthTable::nth_var(self.num_vars, index)
    }
}

/// Values of every node in the transitive fanin of the primary outputs,
/// indexed by node id. Nodes outside those cones are `None`.
pub fn simulate_nodes<V, N, S>(ntk: &N, sim: &S) -> Result<Vec<Option<V>>, NetworkError>
where
    V: SimValue,
    N: Network,
    S: Simulator<V>,
{
    if sim.num_pis() != ntk.num_pis() {
        return Err(NetworkError::InputCountMismatch {
            expected: ntk.num_pis(),
            actual: sim.num_pis(),
        });
    }
    let mut values: Vec<Option<V>> = vec![None; ntk.size()];
    for n in topo_order(ntk) {
        let value = if ntk.is_constant(n) {
            sim.compute_constant(ntk.constant_value(n))
        } else if let Some(index) = ntk.pi_index(n) {
            sim.compute_pi(index)
        } else {
            let fanin_values: Vec<V> = ntk
                .fanins(n)
                .into_iter()
                .map(|s| node_value(&values, ntk.get_node(s)))
                .collect::<Result<_, _>>()?;
            ntk.compute(n, &fanin_values)?
        };
        values[n.id] = Some(value);
    }
    Ok(values)
}

fn node_value<V: Clone>(values: &[Option<V>], n: NodeId) -> Result<V, NetworkError> {
    values[n.id].clone().ok_or(NetworkError::NodeOutOfRange {
        node: n,
        size: values.len(),
    })
}

/// Values of the primary outputs, with output complements applied.
pub fn simulate<V, N, S>(ntk: &N, sim: &S) -> Result<Vec<V>, NetworkError>
where
    V: SimValue,
    N: Network,
    S: Simulator<V>,
{
    let values = simulate_nodes(ntk, sim)?;
    ntk.pos()
        .map(|po| -> Result<V, NetworkError> {
            let value = node_value(&values, ntk.get_node(po))?;
            Ok(value.complement_if(ntk.is_complemented(po)))
        })
        .collect()
}

/// Truth tables of all primary outputs over all primary inputs.
pub fn simulate_truth_tables<N: Network>(ntk: &N) -> Result<Vec<TruthTable>, NetworkError> {
    simulate(ntk, &TruthTableSimulator::new(ntk.num_pis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::aig::AigNetwork;

    #[test]
    fn test_word_set_bit() {
        let mut w = 0u64;
        w.set_bit(3, true);
        assert_eq!(w, 8);
        assert!(w.bit(3));
        w.set_bit(3, false);
        assert_eq!(w, 0);
    }

    #[test]
    fn test_default_maj_over_words() {
        let a = 0b1100u64;
        let b = 0b1010u64;
        let c = 0b0110u64;
        assert_eq!(u64::maj(&a, &b, &c), 0b1110);
    }

    #[test]
    fn test_truth_table_simulator_constants() {
        let sim = TruthTableSimulator::new(2);
        assert_eq!(sim.compute_constant(true).to_word(), 0xf);
        assert!(sim.compute_constant(false).is_const0());
        assert_eq!(sim.compute_pi(1).to_word(), 0b1100);
    }

    #[test]
    fn test_pattern_length_must_match_inputs() {
        let aig = AigNetwork::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        aig.create_po(aig.create_and(a, b));
        assert!(matches!(
            simulate(&aig, &PatternSimulator::new(&[true])),
            Err(NetworkError::InputCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            simulate_nodes(&aig, &WordSimulator::new(&[1, 2, 3])),
            Err(NetworkError::InputCountMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert_eq!(simulate(&aig, &PatternSimulator::new(&[true, true])).unwrap(), vec![true]);
    }
}
