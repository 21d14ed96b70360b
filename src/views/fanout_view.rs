// SPDX-License-Identifier: Apache-2.0

//! Adds fanout enumeration to a network.

use std::cell::RefCell;
use std::rc::Rc;

use crate::network::{FanoutNetwork, Network, SelfDualNetwork};
use crate::network_error::NetworkError;
use crate::signal::NodeId;
use crate::views::forward_network_queries;

/// Network plus a node -> referencing-gates index.
///
/// The index is computed on construction. Gates created and substitutions
/// performed through the view keep it current; mutation through any other
/// handle to the same store is not observed, and callers must call
/// [`FanoutView::update_fanout`] before relying on `fanout` again.
#[derive(Debug, Clone)]
pub struct FanoutView<N: Network> {
    base: N,
    index: Rc<RefCell<Vec<Vec<NodeId>>>>,
}

impl<N: Network + Default> Default for FanoutView<N> {
    fn default() -> Self {
        FanoutView::new(N::default())
    }
}

impl<N: Network> FanoutView<N> {
    pub fn new(base: N) -> Self {
        let view = FanoutView {
            base,
            index: Rc::new(RefCell::new(Vec::new())),
        };
        view.update_fanout();
        view
    }

    pub fn base(&self) -> &N {
        &self.base
    }

    pub fn into_base(self) -> N {
        self.base
    }

    /// Rebuilds the index from the base network's children lists.
    pub fn update_fanout(&self) {
        let mut index = vec![Vec::new(); self.base.size()];
        for parent in self.base.gates() {
            Self::register(&self.base, &mut index, parent);
        }
        *self.index.borrow_mut() = index;
    }

    fn register(base: &N, index: &mut [Vec<NodeId>], parent: NodeId) {
        for child in base.fanins(parent) {
            let list = &mut index[base.get_node(child).id];
            if list.last() != Some(&parent) {
                list.push(parent);
            }
        }
    }

    /// Indexes nodes the base network appended since the last update.
    fn on_add(&self) {
        let mut index = self.index.borrow_mut();
        let known = index.len();
        let size = self.base.size();
        if known >= size {
            return;
        }
        index.resize(size, Vec::new());
        for id in known..size {
            let n = NodeId::new(id);
            if self.base.is_gate(n) && !self.base.is_dead(n) {
                Self::register(&self.base, &mut index, n);
            }
        }
    }

    fn added<T>(&self, result: T) -> T {
        self.on_add();
        result
    }
}

impl<N: Network> Network for FanoutView<N> {
    forward_network_queries!(base);

    fn create_pi(&self) -> Self::Signal {
        self.added(self.base.create_pi())
    }

    fn create_po(&self, s: Self::Signal) -> usize {
        self.base.create_po(s)
    }

    fn create_not(&self, a: Self::Signal) -> Self::Signal {
        self.added(self.base.create_not(a))
    }

    fn create_and(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.added(self.base.create_and(a, b))
    }

    fn create_or(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.added(self.base.create_or(a, b))
    }

    fn create_xor(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.added(self.base.create_xor(a, b))
    }

    fn create_maj(&self, a: Self::Signal, b: Self::Signal, c: Self::Signal) -> Self::Signal {
        self.added(self.base.create_maj(a, b, c))
    }

    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[Self::Signal],
    ) -> Result<Self::Signal, NetworkError> {
        let s = self.base.clone_node(&other.base, source, children)?;
        Ok(self.added(s))
    }

    fn substitute_node(&self, old: NodeId, new: Self::Signal) -> Result<(), NetworkError> {
        self.base.substitute_node(old, new)?;
        self.update_fanout();
        Ok(())
    }

    fn deep_clone(&self) -> Self {
        FanoutView::new(self.base.deep_clone())
    }
}

impl<N: Network> FanoutNetwork for FanoutView<N> {
    fn fanout(&self, n: NodeId) -> Vec<NodeId> {
        self.index
            .borrow()
            .get(n.id)
            .cloned()
            .unwrap_or_default()
    }
}

impl<N: SelfDualNetwork> SelfDualNetwork for FanoutView<N> {
    /// Complementing a gate rewrites polarities only, so the index stays
    /// valid.
    fn invert_gate(&self, n: NodeId) -> Result<(), NetworkError> {
        self.base.invert_gate(n)
    }
}
