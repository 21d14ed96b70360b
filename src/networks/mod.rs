// SPDX-License-Identifier: Apache-2.0

//! The three network families and the shared handle they are built on.

pub mod aig;
pub mod klut;
pub mod mig;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::network_error::NetworkError;
use crate::signal::{NodeId, Signal};
use crate::simulation::SimValue;
use crate::storage::Storage;

/// Reference-counted handle to a store. Every family wraps one; cloning it
/// shares the store.
#[derive(Debug, Clone)]
pub(crate) struct StorageHandle(Rc<RefCell<Storage>>);

impl StorageHandle {
    pub(crate) fn new(storage: Storage) -> Self {
        StorageHandle(Rc::new(RefCell::new(storage)))
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Storage> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Storage> {
        self.0.borrow_mut()
    }

    pub(crate) fn deep_clone(&self) -> Self {
        StorageHandle::new(self.borrow().clone())
    }

    pub(crate) fn ptr_eq(&self, other: &StorageHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn size(&self) -> usize {
        self.borrow().nodes.len()
    }

    pub(crate) fn num_pis(&self) -> usize {
        self.borrow().inputs.len()
    }

    pub(crate) fn num_pos(&self) -> usize {
        self.borrow().outputs.len()
    }

    pub(crate) fn num_gates(&self) -> usize {
        self.borrow().num_gates()
    }

    pub(crate) fn is_constant(&self, n: NodeId) -> bool {
        self.borrow().is_constant(n)
    }

    pub(crate) fn is_pi(&self, n: NodeId) -> bool {
        self.borrow().is_pi(n)
    }

    pub(crate) fn pi_index(&self, n: NodeId) -> Option<usize> {
        self.borrow().pi_index(n)
    }

    pub(crate) fn is_dead(&self, n: NodeId) -> bool {
        self.borrow().node(n).dead
    }

    pub(crate) fn fanin_size(&self, n: NodeId) -> usize {
        self.borrow().node(n).children.len()
    }

    pub(crate) fn fanout_size(&self, n: NodeId) -> usize {
        self.borrow().node(n).fanout as usize
    }

    pub(crate) fn pi_at(&self, index: usize) -> NodeId {
        self.borrow().inputs[index]
    }

    pub(crate) fn po_at(&self, index: usize) -> Signal {
        self.borrow().outputs[index]
    }

    pub(crate) fn children(&self, n: NodeId) -> Vec<Signal> {
        self.borrow().node(n).children.clone()
    }

    pub(crate) fn add_pi(&self, function: u32) -> NodeId {
        self.borrow_mut().add_pi(function)
    }

    pub(crate) fn add_po(&self, s: Signal) -> usize {
        self.borrow_mut().add_po(s)
    }

    pub(crate) fn clear_values(&self) {
        for node in self.borrow_mut().nodes.iter_mut() {
            node.value = 0;
        }
    }

    pub(crate) fn value(&self, n: NodeId) -> u32 {
        self.borrow().node(n).value
    }

    pub(crate) fn set_value(&self, n: NodeId, value: u32) {
        self.borrow_mut().nodes[n.id].value = value;
    }

    pub(crate) fn incr_value(&self, n: NodeId) -> u32 {
        let mut storage = self.borrow_mut();
        let node = &mut storage.nodes[n.id];
        let previous = node.value;
        node.value = previous.wrapping_add(1);
        previous
    }

    pub(crate) fn decr_value(&self, n: NodeId) -> u32 {
        let mut storage = self.borrow_mut();
        let node = &mut storage.nodes[n.id];
        node.value = node.value.wrapping_sub(1);
        node.value
    }

    pub(crate) fn clear_visited(&self) {
        for node in self.borrow_mut().nodes.iter_mut() {
            node.visited = 0;
        }
    }

    pub(crate) fn visited(&self, n: NodeId) -> u32 {
        self.borrow().node(n).visited
    }

    pub(crate) fn set_visited(&self, n: NodeId, visited: u32) {
        self.borrow_mut().nodes[n.id].visited = visited;
    }
}

/// Checks a `compute` call's fanin values against gate `n`'s arity and
/// against each other's width.
pub(crate) fn check_fanin_values<V: SimValue>(
    handle: &StorageHandle,
    n: NodeId,
    values: &[V],
) -> Result<(), NetworkError> {
    {
        let storage = handle.borrow();
        storage.check_node(n)?;
        if !storage.is_gate(n) {
            return Err(NetworkError::NotAGate(n));
        }
        let expected = storage.node(n).children.len();
        if values.len() != expected {
            return Err(NetworkError::ArityMismatch {
                expected,
                actual: values.len(),
            });
        }
    }
    if let Some(first) = values.first() {
        for v in values.iter().skip(1) {
            if v.bit_count() != first.bit_count() {
                return Err(NetworkError::ValueWidthMismatch {
                    expected: first.bit_count(),
                    actual: v.bit_count(),
                });
            }
        }
    }
    Ok(())
}

/// Checks that `source` is a gate of `other` before it is cloned.
pub(crate) fn check_clone_source(
    other: &StorageHandle,
    source: NodeId,
    children: usize,
) -> Result<(), NetworkError> {
    let storage = other.borrow();
    storage.check_node(source)?;
    if !storage.is_gate(source) {
        return Err(NetworkError::NotAGate(source));
    }
    let expected = storage.node(source).children.len();
    if expected != children {
        return Err(NetworkError::ArityMismatch {
            expected,
            actual: children,
        });
    }
    Ok(())
}
