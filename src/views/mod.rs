// SPDX-License-Identifier: Apache-2.0

//! Views wrap a base network, share its store, and add derived or externally
//! supplied state. A view is itself a [`Network`](crate::network::Network),
//! so views stack.

/// Expands to the `Network` methods that a view forwards unchanged to the
/// network stored in `self.$base`: signal handling, structural queries,
/// functions, simulation, and scratch state. The implementing type's base
/// network parameter must be named `N`.
macro_rules! forward_network_queries {
    ($base:ident) => {
        type Signal = N::Signal;

        fn get_node(&self, s: Self::Signal) -> $crate::signal::NodeId {
            self.$base.get_node(s)
        }

        fn is_complemented(&self, s: Self::Signal) -> bool {
            self.$base.is_complemented(s)
        }

        fn make_signal(&self, n: $crate::signal::NodeId) -> Self::Signal {
            self.$base.make_signal(n)
        }

        fn get_constant(&self, value: bool) -> Self::Signal {
            self.$base.get_constant(value)
        }

        fn is_constant(&self, n: $crate::signal::NodeId) -> bool {
            self.$base.is_constant(n)
        }

        fn constant_value(&self, n: $crate::signal::NodeId) -> bool {
            self.$base.constant_value(n)
        }

        fn is_pi(&self, n: $crate::signal::NodeId) -> bool {
            self.$base.is_pi(n)
        }

        fn pi_index(&self, n: $crate::signal::NodeId) -> Option<usize> {
            self.$base.pi_index(n)
        }

        fn is_dead(&self, n: $crate::signal::NodeId) -> bool {
            self.$base.is_dead(n)
        }

        fn size(&self) -> usize {
            self.$base.size()
        }

        fn num_pis(&self) -> usize {
            self.$base.num_pis()
        }

        fn num_pos(&self) -> usize {
            self.$base.num_pos()
        }

        fn num_gates(&self) -> usize {
            self.$base.num_gates()
        }

        fn fanin_size(&self, n: $crate::signal::NodeId) -> usize {
            self.$base.fanin_size(n)
        }

        fn fanout_size(&self, n: $crate::signal::NodeId) -> usize {
            self.$base.fanout_size(n)
        }

        fn pi_at(&self, index: usize) -> $crate::signal::NodeId {
            self.$base.pi_at(index)
        }

        fn po_at(&self, index: usize) -> Self::Signal {
            self.$base.po_at(index)
        }

        fn fanins(&self, n: $crate::signal::NodeId) -> Vec<Self::Signal> {
            self.$base.fanins(n)
        }

        fn gate_kind(&self, n: $crate::signal::NodeId) -> $crate::network::GateKind {
            self.$base.gate_kind(n)
        }

        fn node_function(&self, n: $crate::signal::NodeId) -> $crate::truth_table::TruthTable {
            self.$base.node_function(n)
        }

        fn compute<V: $crate::simulation::SimValue>(
            &self,
            n: $crate::signal::NodeId,
            fanin_values: &[V],
        ) -> Result<V, $crate::network_error::NetworkError> {
            self.$base.compute(n, fanin_values)
        }

        fn clear_values(&self) {
            self.$base.clear_values()
        }

        fn value(&self, n: $crate::signal::NodeId) -> u32 {
            self.$base.value(n)
        }

        fn set_value(&self, n: $crate::signal::NodeId, value: u32) {
            self.$base.set_value(n, value)
        }

        fn incr_value(&self, n: $crate::signal::NodeId) -> u32 {
            self.$base.incr_value(n)
        }

        fn decr_value(&self, n: $crate::signal::NodeId) -> u32 {
            self.$base.decr_value(n)
        }

        fn clear_visited(&self) {
            self.$base.clear_visited()
        }

        fn visited(&self, n: $crate::signal::NodeId) -> u32 {
            self.$base.visited(n)
        }

        fn set_visited(&self, n: $crate::signal::NodeId, visited: u32) {
            self.$base.set_visited(n, visited)
        }
    };
}

pub(crate) use forward_network_queries;

pub mod dont_care_view;
pub mod fanout_view;

pub use dont_care_view::DontCareView;
pub use fanout_view::FanoutView;
