// SPDX-License-Identifier: Apache-2.0

//! Hash-consed logic networks.
//!
//! Three node-function families share one construction/query/iteration
//! contract (the [`Network`] trait):
//!
//! * [`AigNetwork`]: two-input AND gates with complemented edges.
//! * [`MigNetwork`]: three-input majority gates with complemented edges.
//! * [`KlutNetwork`]: variable-arity lookup tables backed by a function cache.
//!
//! Network handles are cheap to clone and share one underlying store, so a
//! view (see [`views`]) can wrap a network and add derived state without
//! copying its nodes. Passes in [`algorithms`] rewrite a network in place.

pub mod algorithms;
pub mod check_equivalence;
pub mod cnf;
pub mod function_cache;
pub mod network;
pub mod network_error;
pub mod networks;
pub mod signal;
pub mod simulation;
pub(crate) mod storage;
pub mod summary_stats;
pub mod topo;
pub mod truth_table;
pub mod views;

pub use network::{FanoutNetwork, GateKind, Network, SelfDualNetwork};
pub use network_error::NetworkError;
pub use networks::aig::AigNetwork;
pub use networks::klut::KlutNetwork;
pub use networks::mig::MigNetwork;
pub use signal::{NodeId, Signal};
pub use truth_table::TruthTable;
