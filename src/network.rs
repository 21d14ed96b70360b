// SPDX-License-Identifier: Apache-2.0

//! The construction/query/iteration contract shared by every network family
//! and every view.

use std::ops::ControlFlow;

use crate::network_error::NetworkError;
use crate::signal::{NodeId, Signal};
use crate::simulation::SimValue;
use crate::truth_table::TruthTable;

/// Coarse classification of a node's function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Constant,
    Input,
    And,
    Xor,
    Xor3,
    Maj,
    /// Any other table-defined function.
    Lut,
}

/// A handle to a logic network.
///
/// Handles share their store: cloning a handle (or wrapping it in a view)
/// never copies nodes, and mutation through one handle is visible through all
/// of them. Methods therefore take `&self`; callers are responsible for
/// keeping at most one writer active at a time.
pub trait Network: Clone {
    type Signal: Copy + Eq + std::hash::Hash + std::fmt::Debug;

    // -- Signals and node classification

    fn get_node(&self, s: Self::Signal) -> NodeId;
    fn is_complemented(&self, s: Self::Signal) -> bool;
    fn make_signal(&self, n: NodeId) -> Self::Signal;
    fn get_constant(&self, value: bool) -> Self::Signal;
    fn is_constant(&self, n: NodeId) -> bool;
    /// Value of the constant node `n`; false for non-constant nodes.
    fn constant_value(&self, n: NodeId) -> bool;
    fn is_pi(&self, n: NodeId) -> bool;
    /// Position of `n` in the primary-input list.
    fn pi_index(&self, n: NodeId) -> Option<usize>;
    /// Whether `n` was released by a substitution.
    fn is_dead(&self, n: NodeId) -> bool;

    fn is_gate(&self, n: NodeId) -> bool {
        !self.is_constant(n) && !self.is_pi(n)
    }

    // -- Creation and mutation

    fn create_pi(&self) -> Self::Signal;
    /// Registers `s` as a primary output and returns its output index.
    fn create_po(&self, s: Self::Signal) -> usize;
    fn create_not(&self, a: Self::Signal) -> Self::Signal;
    fn create_and(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal;
    fn create_or(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal;
    fn create_xor(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal;
    fn create_maj(&self, a: Self::Signal, b: Self::Signal, c: Self::Signal) -> Self::Signal;

    /// Recreates the gate `source` of `other` in this network over
    /// `children`, which already carry the polarity of each fanin slot.
    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[Self::Signal],
    ) -> Result<Self::Signal, NetworkError>;

    /// Redirects every child slot and primary output that references `old`
    /// to `new`, composing polarities, and releases `old`.
    fn substitute_node(&self, old: NodeId, new: Self::Signal) -> Result<(), NetworkError>;

    // -- Structure

    /// Number of nodes ever created, including constants and dead nodes.
    fn size(&self) -> usize;
    fn num_pis(&self) -> usize;
    fn num_pos(&self) -> usize;
    fn num_gates(&self) -> usize;
    fn fanin_size(&self, n: NodeId) -> usize;
    fn fanout_size(&self, n: NodeId) -> usize;
    fn pi_at(&self, index: usize) -> NodeId;
    fn po_at(&self, index: usize) -> Self::Signal;
    fn fanins(&self, n: NodeId) -> Vec<Self::Signal>;

    // -- Functions

    fn gate_kind(&self, n: NodeId) -> GateKind;

    /// Function of `n` over its fanin signals, with edge complements applied.
    fn node_function(&self, n: NodeId) -> TruthTable;

    fn is_and(&self, n: NodeId) -> bool {
        self.gate_kind(n) == GateKind::And
    }

    fn is_xor(&self, n: NodeId) -> bool {
        self.gate_kind(n) == GateKind::Xor
    }

    fn is_xor3(&self, n: NodeId) -> bool {
        self.gate_kind(n) == GateKind::Xor3
    }

    fn is_maj(&self, n: NodeId) -> bool {
        self.gate_kind(n) == GateKind::Maj
    }

    /// Evaluates gate `n` given one value per fanin node, in slot order.
    /// Edge complements are applied by this call.
    fn compute<V: SimValue>(&self, n: NodeId, fanin_values: &[V]) -> Result<V, NetworkError>;

    // -- Iteration

    /// Live nodes in creation order.
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.size())
            .map(NodeId::new)
            .filter(move |n| !self.is_dead(*n))
    }

    /// Live gates in creation order.
    fn gates(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(move |n| self.is_gate(*n))
    }

    fn pis(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.num_pis()).map(move |i| self.pi_at(i))
    }

    fn pos(&self) -> impl Iterator<Item = Self::Signal> + '_ {
        (0..self.num_pos()).map(move |i| self.po_at(i))
    }

    fn foreach_node<F: FnMut(NodeId) -> ControlFlow<()>>(&self, mut f: F) {
        for n in self.nodes() {
            if f(n).is_break() {
                return;
            }
        }
    }

    fn foreach_gate<F: FnMut(NodeId) -> ControlFlow<()>>(&self, mut f: F) {
        for n in self.gates() {
            if f(n).is_break() {
                return;
            }
        }
    }

    fn foreach_pi<F: FnMut(NodeId, usize) -> ControlFlow<()>>(&self, mut f: F) {
        for (i, n) in self.pis().enumerate() {
            if f(n, i).is_break() {
                return;
            }
        }
    }

    fn foreach_po<F: FnMut(Self::Signal, usize) -> ControlFlow<()>>(&self, mut f: F) {
        for (i, s) in self.pos().enumerate() {
            if f(s, i).is_break() {
                return;
            }
        }
    }

    fn foreach_fanin<F: FnMut(Self::Signal, usize) -> ControlFlow<()>>(&self, n: NodeId, mut f: F) {
        for (i, s) in self.fanins(n).into_iter().enumerate() {
            if f(s, i).is_break() {
                return;
            }
        }
    }

    // -- Scratch state

    fn clear_values(&self);
    fn value(&self, n: NodeId) -> u32;
    fn set_value(&self, n: NodeId, value: u32);
    /// Increments the scratch value and returns its previous value.
    fn incr_value(&self, n: NodeId) -> u32;
    /// Decrements the scratch value and returns its new value.
    fn decr_value(&self, n: NodeId) -> u32;
    fn clear_visited(&self);
    fn visited(&self, n: NodeId) -> u32;
    fn set_visited(&self, n: NodeId, visited: u32);

    /// Copies the whole store into a new, unshared handle.
    fn deep_clone(&self) -> Self;
}

/// Networks that can enumerate the gates referencing a node.
pub trait FanoutNetwork: Network {
    /// Live gates with at least one child slot referencing `n`, each listed
    /// once, in creation order. Primary outputs are not included.
    fn fanout(&self, n: NodeId) -> Vec<NodeId>;

    fn foreach_fanout<F: FnMut(NodeId) -> ControlFlow<()>>(&self, n: NodeId, mut f: F) {
        for p in self.fanout(n) {
            if f(p).is_break() {
                return;
            }
        }
    }
}

/// Networks whose gates can be complemented in place by complementing their
/// inputs, i.e. whose gate function is self-dual.
pub trait SelfDualNetwork: Network<Signal = Signal> {
    /// Complements every child of gate `n` and every use of `n`, leaving the
    /// represented function of every other node and output unchanged.
    fn invert_gate(&self, n: NodeId) -> Result<(), NetworkError>;
}
