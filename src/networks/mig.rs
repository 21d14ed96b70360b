// SPDX-License-Identifier: Apache-2.0

//! Majority-inverter graphs: three-input majority gates with complemented
//! edges.
//!
//! Majority is self-dual, `maj(!a, !b, !c) == !maj(a, b, c)`, so gates are
//! stored with at most one complemented child and the complement is pushed to
//! the output signal. AND and OR are majority gates with a constant child.

use crate::function_cache::FunctionCache;
use crate::network::{GateKind, Network, SelfDualNetwork};
use crate::network_error::NetworkError;
use crate::networks::{check_clone_source, check_fanin_values, StorageHandle};
use crate::signal::{NodeId, Signal};
use crate::simulation::SimValue;
use crate::storage::{Canonical, Storage, StrashKey};
use crate::truth_table::TruthTable;

const CONSTANT: NodeId = NodeId::new(0);

#[derive(Debug, Clone)]
pub struct MigNetwork {
    storage: StorageHandle,
}

impl Default for MigNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MigNetwork {
    pub fn new() -> Self {
        MigNetwork {
            storage: StorageHandle::new(Storage::new(&[0], FunctionCache::new())),
        }
    }

    pub fn shares_storage_with(&self, other: &MigNetwork) -> bool {
        self.storage.ptr_eq(&other.storage)
    }
}

/// Result of normalizing three majority inputs.
enum MajForm {
    /// The majority collapses to one of its inputs.
    Trivial(Signal),
    Gate { children: [Signal; 3], complemented: bool },
}

fn normalize_maj(a: Signal, b: Signal, c: Signal) -> MajForm {
    let mut children = [a, b, c];
    children.sort();
    let [x, y, z] = children;
    if x.node == y.node {
        return MajForm::Trivial(if x.complemented == y.complemented { x } else { z });
    }
    if y.node == z.node {
        return MajForm::Trivial(if y.complemented == z.complemented { y } else { x });
    }
    let complemented = children.iter().filter(|s| s.complemented).count() >= 2;
    if complemented {
        for child in children.iter_mut() {
            *child = child.complement();
        }
    }
    MajForm::Gate {
        children,
        complemented,
    }
}

fn canonicalize_maj(children: &[Signal], _function: u32, _functions: &FunctionCache) -> Canonical {
    match normalize_maj(children[0], children[1], children[2]) {
        MajForm::Trivial(s) => Canonical::Trivial(s),
        MajForm::Gate {
            children,
            complemented,
        } => Canonical::Gate(
            StrashKey {
                function: 0,
                children: children.to_vec(),
            },
            complemented,
        ),
    }
}

impl Network for MigNetwork {
    type Signal = Signal;

    fn get_node(&self, s: Signal) -> NodeId {
        s.node
    }

    fn is_complemented(&self, s: Signal) -> bool {
        s.complemented
    }

    fn make_signal(&self, n: NodeId) -> Signal {
        Signal::from(n)
    }

    fn get_constant(&self, value: bool) -> Signal {
        Signal::new(CONSTANT, value)
    }

    fn is_constant(&self, n: NodeId) -> bool {
        n == CONSTANT
    }

    fn constant_value(&self, _n: NodeId) -> bool {
        false
    }

    fn is_pi(&self, n: NodeId) -> bool {
        self.storage.is_pi(n)
    }

    fn pi_index(&self, n: NodeId) -> Option<usize> {
        self.storage.pi_index(n)
    }

    fn is_dead(&self, n: NodeId) -> bool {
        self.storage.is_dead(n)
    }

    fn create_pi(&self) -> Signal {
        Signal::from(self.storage.add_pi(0))
    }

    fn create_po(&self, s: Signal) -> usize {
        self.storage.add_po(s)
    }

    fn create_not(&self, a: Signal) -> Signal {
        !a
    }

    fn create_and(&self, a: Signal, b: Signal) -> Signal {
        self.create_maj(self.get_constant(false), a, b)
    }

    fn create_or(&self, a: Signal, b: Signal) -> Signal {
        self.create_maj(self.get_constant(true), a, b)
    }

    fn create_xor(&self, a: Signal, b: Signal) -> Signal {
        let lhs = self.create_and(a, !b);
        let rhs = self.create_and(!a, b);
        self.create_or(lhs, rhs)
    }

    fn create_maj(&self, a: Signal, b: Signal, c: Signal) -> Signal {
        match normalize_maj(a, b, c) {
            MajForm::Trivial(s) => s,
            MajForm::Gate {
                children,
                complemented,
            } => {
                let s = self.storage.borrow_mut().find_or_add(StrashKey {
                    function: 0,
                    children: children.to_vec(),
                });
                s.complement_if(complemented)
            }
        }
    }

    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[Signal],
    ) -> Result<Signal, NetworkError> {
        check_clone_source(&other.storage, source, children.len())?;
        Ok(self.create_maj(children[0], children[1], children[2]))
    }

    fn substitute_node(&self, old: NodeId, new: Signal) -> Result<(), NetworkError> {
        self.storage
            .borrow_mut()
            .substitute(old, new, canonicalize_maj)
    }

    fn size(&self) -> usize {
        self.storage.size()
    }

    fn num_pis(&self) -> usize {
        self.storage.num_pis()
    }

    fn num_pos(&self) -> usize {
        self.storage.num_pos()
    }

    fn num_gates(&self) -> usize {
        self.storage.num_gates()
    }

    fn fanin_size(&self, n: NodeId) -> usize {
        self.storage.fanin_size(n)
    }

    fn fanout_size(&self, n: NodeId) -> usize {
        self.storage.fanout_size(n)
    }

    fn pi_at(&self, index: usize) -> NodeId {
        self.storage.pi_at(index)
    }

    fn po_at(&self, index: usize) -> Signal {
        self.storage.po_at(index)
    }

    fn fanins(&self, n: NodeId) -> Vec<Signal> {
        self.storage.children(n)
    }

    fn gate_kind(&self, n: NodeId) -> GateKind {
        if self.is_constant(n) {
            GateKind::Constant
        } else if self.is_pi(n) {
            GateKind::Input
        } else {
            GateKind::Maj
        }
    }

    fn node_function(&self, n: NodeId) -> TruthTable {
        match self.gate_kind(n) {
            GateKind::Constant => TruthTable::new(0),
            GateKind::Input => TruthTable::nth_var(1, 0),
            _ => TruthTable::from_word(3, 0xe8),
        }
    }

    fn compute<V: SimValue>(&self, n: NodeId, fanin_values: &[V]) -> Result<V, NetworkError> {
        check_fanin_values(&self.storage, n, fanin_values)?;
        let children = self.storage.children(n);
        let a = fanin_values[0].complement_if(children[0].complemented);
        let b = fanin_values[1].complement_if(children[1].complemented);
        let c = fanin_values[2].complement_if(children[2].complemented);
        Ok(V::maj(&a, &b, &c))
    }

    fn clear_values(&self) {
        self.storage.clear_values()
    }

    fn value(&self, n: NodeId) -> u32 {
        self.storage.value(n)
    }

    fn set_value(&self, n: NodeId, value: u32) {
        self.storage.set_value(n, value)
    }

    fn incr_value(&self, n: NodeId) -> u32 {
        self.storage.incr_value(n)
    }

    fn decr_value(&self, n: NodeId) -> u32 {
        self.storage.decr_value(n)
    }

    fn clear_visited(&self) {
        self.storage.clear_visited()
    }

    fn visited(&self, n: NodeId) -> u32 {
        self.storage.visited(n)
    }

    fn set_visited(&self, n: NodeId, visited: u32) {
        self.storage.set_visited(n, visited)
    }

    fn deep_clone(&self) -> Self {
        MigNetwork {
            storage: self.storage.deep_clone(),
        }
    }
}

impl SelfDualNetwork for MigNetwork {
    fn invert_gate(&self, n: NodeId) -> Result<(), NetworkError> {
        self.storage
            .borrow_mut()
            .complement_gate(n, canonicalize_maj)
    }
}
