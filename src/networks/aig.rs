// SPDX-License-Identifier: Apache-2.0

//! And-inverter graphs: two-input AND gates with complemented edges.

use crate::function_cache::FunctionCache;
use crate::network::{GateKind, Network};
use crate::network_error::NetworkError;
use crate::networks::{check_clone_source, check_fanin_values, StorageHandle};
use crate::signal::{NodeId, Signal};
use crate::simulation::SimValue;
use crate::storage::{Canonical, Storage, StrashKey};
use crate::truth_table::TruthTable;

const CONSTANT: NodeId = NodeId::new(0);

#[derive(Debug, Clone)]
pub struct AigNetwork {
    storage: StorageHandle,
}

impl Default for AigNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl AigNetwork {
    pub fn new() -> Self {
        AigNetwork {
            storage: StorageHandle::new(Storage::new(&[0], FunctionCache::new())),
        }
    }

    pub fn shares_storage_with(&self, other: &AigNetwork) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    pub fn create_nand(&self, a: Signal, b: Signal) -> Signal {
        !self.create_and(a, b)
    }
}

/// Orders the operands by node and folds pairs that reduce to a constant or
/// to one of the operands.
fn canonicalize_and(children: &[Signal], _function: u32, _functions: &FunctionCache) -> Canonical {
    let (a, b) = if children[0].node > children[1].node {
        (children[1], children[0])
    } else {
        (children[0], children[1])
    };
    if a.node == b.node {
        return Canonical::Trivial(if a.complemented == b.complemented {
            a
        } else {
            Signal::new(CONSTANT, false)
        });
    }
    if a.node == CONSTANT {
        return Canonical::Trivial(if a.complemented {
            b
        } else {
            Signal::new(CONSTANT, false)
        });
    }
    Canonical::Gate(
        StrashKey {
            function: 0,
            children: vec![a, b],
        },
        false,
    )
}

impl Network for AigNetwork {
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
        let mut storage = self.storage.borrow_mut();
        match canonicalize_and(&[a, b], 0, &storage.functions) {
            Canonical::Trivial(s) => s,
            Canonical::Gate(key, _) => storage.find_or_add(key),
        }
    }

    fn create_or(&self, a: Signal, b: Signal) -> Signal {
        !self.create_and(!a, !b)
    }

    fn create_xor(&self, a: Signal, b: Signal) -> Signal {
        let lhs = self.create_and(a, !b);
        let rhs = self.create_and(!a, b);
        self.create_or(lhs, rhs)
    }

    fn create_maj(&self, a: Signal, b: Signal, c: Signal) -> Signal {
        let mut operands = [a, b, c];
        operands.sort();
        let [a, b, c] = operands;
        let ab = self.create_and(a, b);
        let a_or_b = self.create_or(a, b);
        let c_and = self.create_and(c, a_or_b);
        self.create_or(ab, c_and)
    }

    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[Signal],
    ) -> Result<Signal, NetworkError> {
        check_clone_source(&other.storage, source, children.len())?;
        Ok(self.create_and(children[0], children[1]))
    }

    fn substitute_node(&self, old: NodeId, new: Signal) -> Result<(), NetworkError> {
        self.storage
            .borrow_mut()
            .substitute(old, new, canonicalize_and)
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
            GateKind::And
        }
    }

    fn node_function(&self, n: NodeId) -> TruthTable {
        match self.gate_kind(n) {
            GateKind::Constant => TruthTable::new(0),
            GateKind::Input => TruthTable::nth_var(1, 0),
            _ => TruthTable::from_word(2, 0x8),
        }
    }

    fn compute<V: SimValue>(&self, n: NodeId, fanin_values: &[V]) -> Result<V, NetworkError> {
        check_fanin_values(&self.storage, n, fanin_values)?;
        let children = self.storage.children(n);
        let a = fanin_values[0].complement_if(children[0].complemented);
        let b = fanin_values[1].complement_if(children[1].complemented);
        Ok(a.and(&b))
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
        AigNetwork {
            storage: self.storage.deep_clone(),
        }
    }
}
