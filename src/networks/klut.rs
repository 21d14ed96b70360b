// SPDX-License-Identifier: Apache-2.0

//! Networks of k-input lookup tables.
//!
//! Every gate refers to a truth table in the store's function cache. There are
//! no complemented edges: node 0 is constant false and node 1 is a distinct
//! constant-true node.

use crate::function_cache::FunctionCache;
use crate::network::{GateKind, Network};
use crate::network_error::NetworkError;
use crate::networks::{check_clone_source, check_fanin_values, StorageHandle};
use crate::signal::{NodeId, Signal};
use crate::simulation::SimValue;
use crate::storage::{Canonical, Storage, StrashKey};
use crate::truth_table::TruthTable;

/// Function literals seeded into every cache.
const LITERAL_CONST0: u32 = 0;
const LITERAL_CONST1: u32 = 1;
const LITERAL_IDENTITY: u32 = 2;
const LITERAL_NOT: u32 = 3;
const LITERAL_AND: u32 = 4;

/// Widest table a single node may carry.
pub const MAX_FANIN: usize = 16;

#[derive(Debug, Clone)]
pub struct KlutNetwork {
    storage: StorageHandle,
}

impl Default for KlutNetwork {
    fn default() -> Self {
        Self::new()
    }
}

fn seeded_function_cache() -> FunctionCache {
    let mut functions = FunctionCache::new();
    let const0 = functions.insert(&TruthTable::new(0));
    let identity = functions.insert(&TruthTable::nth_var(1, 0));
    let not = functions.insert(&!TruthTable::nth_var(1, 0));
    let and = functions.insert(&TruthTable::from_word(2, 0x8));
    debug_assert_eq!(
        [const0, identity, not, and],
        [LITERAL_CONST0, LITERAL_IDENTITY, LITERAL_NOT, LITERAL_AND]
    );
    functions
}

impl KlutNetwork {
    pub fn new() -> Self {
        KlutNetwork {
            storage: StorageHandle::new(Storage::new(
                &[LITERAL_CONST0, LITERAL_CONST1],
                seeded_function_cache(),
            )),
        }
    }

    pub fn shares_storage_with(&self, other: &KlutNetwork) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    /// Creates (or finds) a node computing `function` over `children`, where
    /// child `j` is variable `j` of the table. A zero-input function yields
    /// the matching constant.
    pub fn create_node(
        &self,
        children: &[NodeId],
        function: &TruthTable,
    ) -> Result<NodeId, NetworkError> {
        if function.num_vars() != children.len() {
            return Err(NetworkError::ArityMismatch {
                expected: function.num_vars(),
                actual: children.len(),
            });
        }
        if children.len() > MAX_FANIN {
            return Err(NetworkError::ArityMismatch {
                expected: MAX_FANIN,
                actual: children.len(),
            });
        }
        if children.is_empty() {
            return Ok(self.get_constant(!function.is_const0()));
        }
        {
            let storage = self.storage.borrow();
            for child in children {
                storage.check_node(*child)?;
                if storage.node(*child).dead {
                    return Err(NetworkError::DeadNode(*child));
                }
            }
        }
        let literal = self.storage.borrow_mut().functions.insert(function);
        Ok(self.create_node_with_literal(children, literal))
    }

    fn create_node_with_literal(&self, children: &[NodeId], literal: u32) -> NodeId {
        let mut storage = self.storage.borrow_mut();
        let children: Vec<Signal> = children.iter().map(Signal::from).collect();
        let key = lut_key(&children, literal, &storage.functions);
        storage.find_or_add(key).node
    }

    fn create_fixed(&self, children: &[NodeId], num_vars: usize, word: u64) -> NodeId {
        let literal = self
            .storage
            .borrow_mut()
            .functions
            .insert(&TruthTable::from_word(num_vars, word));
        self.create_node_with_literal(children, literal)
    }

    /// Three-input parity.
    pub fn create_xor3(&self, a: NodeId, b: NodeId, c: NodeId) -> NodeId {
        self.create_fixed(&[a, b, c], 3, 0x96)
    }

    /// Number of distinct functions in the cache, counting a function and its
    /// complement once.
    pub fn num_functions(&self) -> usize {
        self.storage.borrow().functions.len()
    }
}

/// Children of symmetric functions are sorted so that every ordering of the
/// same inputs hashes alike; other tables keep their variable order.
fn lut_key(children: &[Signal], function: u32, functions: &FunctionCache) -> StrashKey {
    let mut children = children.to_vec();
    if functions.is_symmetric(function) {
        children.sort();
    }
    StrashKey { function, children }
}

fn canonicalize_lut(children: &[Signal], function: u32, functions: &FunctionCache) -> Canonical {
    Canonical::Gate(lut_key(children, function, functions), false)
}

fn classify(table: &TruthTable) -> GateKind {
    match (table.num_vars(), table.to_word()) {
        (2, 0x8) => GateKind::And,
        (2, 0x6) => GateKind::Xor,
        (3, 0x96) => GateKind::Xor3,
        (3, 0xe8) => GateKind::Maj,
        _ => GateKind::Lut,
    }
}

impl Network for KlutNetwork {
    type Signal = NodeId;

    fn get_node(&self, s: NodeId) -> NodeId {
        s
    }

    fn is_complemented(&self, _s: NodeId) -> bool {
        false
    }

    fn make_signal(&self, n: NodeId) -> NodeId {
        n
    }

    fn get_constant(&self, value: bool) -> NodeId {
        NodeId::new(value as usize)
    }

    fn is_constant(&self, n: NodeId) -> bool {
        n.id <= 1
    }

    fn constant_value(&self, n: NodeId) -> bool {
        n.id == 1
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

    fn create_pi(&self) -> NodeId {
        self.storage.add_pi(LITERAL_IDENTITY)
    }

    fn create_po(&self, s: NodeId) -> usize {
        self.storage.add_po(Signal::from(s))
    }

    fn create_not(&self, a: NodeId) -> NodeId {
        self.create_node_with_literal(&[a], LITERAL_NOT)
    }

    fn create_and(&self, a: NodeId, b: NodeId) -> NodeId {
        self.create_node_with_literal(&[a, b], LITERAL_AND)
    }

    fn create_or(&self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(&[a, b], 2, 0xe)
    }

    fn create_xor(&self, a: NodeId, b: NodeId) -> NodeId {
        self.create_fixed(&[a, b], 2, 0x6)
    }

    fn create_maj(&self, a: NodeId, b: NodeId, c: NodeId) -> NodeId {
        self.create_fixed(&[a, b, c], 3, 0xe8)
    }

    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[NodeId],
    ) -> Result<NodeId, NetworkError> {
        check_clone_source(&other.storage, source, children.len())?;
        self.create_node(children, &other.node_function(source))
    }

    fn substitute_node(&self, old: NodeId, new: NodeId) -> Result<(), NetworkError> {
        self.storage
            .borrow_mut()
            .substitute(old, Signal::from(new), canonicalize_lut)
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

    fn po_at(&self, index: usize) -> NodeId {
        self.storage.po_at(index).node
    }

    fn fanins(&self, n: NodeId) -> Vec<NodeId> {
        self.storage.children(n).iter().map(|s| s.node).collect()
    }

    fn gate_kind(&self, n: NodeId) -> GateKind {
        if self.is_constant(n) {
            GateKind::Constant
        } else if self.is_pi(n) {
            GateKind::Input
        } else {
            classify(&self.node_function(n))
        }
    }

    fn node_function(&self, n: NodeId) -> TruthTable {
        let storage = self.storage.borrow();
        storage.functions.get(storage.node(n).function)
    }

    fn compute<V: SimValue>(&self, n: NodeId, fanin_values: &[V]) -> Result<V, NetworkError> {
        check_fanin_values(&self.storage, n, fanin_values)?;
        let table = self.node_function(n);
        let mut result = fanin_values[0].zero_like();
        for i in 0..result.bit_count() {
            let pattern = fanin_values
                .iter()
                .enumerate()
                .fold(0usize, |acc, (j, v)| acc | ((v.bit(i) as usize) << j));
            result.set_bit(i, table.get_bit(pattern));
        }
        Ok(result)
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
        KlutNetwork {
            storage: self.storage.deep_clone(),
        }
    }
}
