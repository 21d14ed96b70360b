// SPDX-License-Identifier: Apache-2.0

//! Node arena shared by all network families.
//!
//! The store knows nothing about gate semantics. Families hand it canonical
//! keys to hash-cons against, and a canonicalization function whenever a
//! mutation needs to re-key a node whose children changed.

use ahash::AHashMap;

use crate::function_cache::FunctionCache;
use crate::network_error::NetworkError;
use crate::signal::{NodeId, Signal};

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) children: Vec<Signal>,
    /// Function literal; only meaningful for table-based networks.
    pub(crate) function: u32,
    pub(crate) fanout: u32,
    pub(crate) value: u32,
    pub(crate) visited: u32,
    pub(crate) dead: bool,
}

impl Node {
    pub(crate) fn new(children: Vec<Signal>, function: u32) -> Self {
        Node {
            children,
            function,
            fanout: 0,
            value: 0,
            visited: 0,
            dead: false,
        }
    }
}

/// Canonical structural signature of a gate.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct StrashKey {
    pub(crate) function: u32,
    pub(crate) children: Vec<Signal>,
}

/// Canonical form of a gate's current children and function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Canonical {
    /// The gate hashes under the key. The flag is set when the gate computes
    /// the complement of the key's function.
    Gate(StrashKey, bool),
    /// The children make the gate equal to an existing signal, e.g. two equal
    /// fanins after a substitution.
    Trivial(Signal),
}

/// Maps a gate's children and function literal to its canonical form.
pub(crate) type Canonicalize = fn(&[Signal], u32, &FunctionCache) -> Canonical;

#[derive(Debug, Clone)]
pub(crate) struct Storage {
    pub(crate) nodes: Vec<Node>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<Signal>,
    pub(crate) strash: AHashMap<StrashKey, Signal>,
    pub(crate) functions: FunctionCache,
    pub(crate) num_constants: usize,
}

/// Child slots and output slots referencing a node, captured before a
/// mutation starts.
struct References {
    slots: Vec<(NodeId, usize)>,
    outputs: Vec<usize>,
}

impl References {
    /// Distinct referencing gates in creation order.
    fn parents(&self) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self.slots.iter().map(|(p, _)| *p).collect();
        parents.dedup();
        parents
    }
}

/// Follows earlier replacements of `s`'s node, keeping the polarity.
fn resolve_replacement(replaced: &AHashMap<NodeId, Signal>, mut s: Signal) -> Signal {
    while let Some(next) = replaced.get(&s.node) {
        s = next.complement_if(s.complemented);
    }
    s
}

impl Storage {
    /// Creates a store whose first nodes are the given constants, identified
    /// by their function literals.
    pub(crate) fn new(constant_functions: &[u32], functions: FunctionCache) -> Self {
        Storage {
            nodes: constant_functions
                .iter()
                .map(|f| Node::new(Vec::new(), *f))
                .collect(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: AHashMap::new(),
            functions,
            num_constants: constant_functions.len(),
        }
    }

    pub(crate) fn node(&self, n: NodeId) -> &Node {
        &self.nodes[n.id]
    }

    pub(crate) fn check_node(&self, n: NodeId) -> Result<(), NetworkError> {
        if n.id >= self.nodes.len() {
            return Err(NetworkError::NodeOutOfRange {
                node: n,
                size: self.nodes.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn is_constant(&self, n: NodeId) -> bool {
        n.id < self.num_constants
    }

    pub(crate) fn is_pi(&self, n: NodeId) -> bool {
        !self.is_constant(n) && self.nodes[n.id].children.is_empty()
    }

    pub(crate) fn is_gate(&self, n: NodeId) -> bool {
        !self.is_constant(n) && !self.nodes[n.id].children.is_empty()
    }

    /// Checks that `n` is a live gate that may be rewritten.
    pub(crate) fn check_live_gate(&self, n: NodeId) -> Result<(), NetworkError> {
        self.check_node(n)?;
        if !self.is_gate(n) {
            return Err(NetworkError::NotAGate(n));
        }
        if self.nodes[n.id].dead {
            return Err(NetworkError::DeadNode(n));
        }
        Ok(())
    }

    pub(crate) fn pi_index(&self, n: NodeId) -> Option<usize> {
        if !self.is_pi(n) {
            return None;
        }
        self.inputs.iter().position(|i| *i == n)
    }

    pub(crate) fn num_gates(&self) -> usize {
        self.nodes.len() - self.inputs.len() - self.num_constants
    }

    pub(crate) fn add_pi(&mut self, function: u32) -> NodeId {
        let n = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(Vec::new(), function));
        self.inputs.push(n);
        n
    }

    pub(crate) fn add_po(&mut self, s: Signal) -> usize {
        debug_assert!(
            s.node.id < self.nodes.len(),
            "output references node {} beyond store size {}",
            s.node,
            self.nodes.len()
        );
        self.nodes[s.node.id].fanout += 1;
        self.outputs.push(s);
        self.outputs.len() - 1
    }

    /// Hash-conses a gate with canonical `key`. The returned signal is
    /// relative to the key's function over the key's children.
    pub(crate) fn find_or_add(&mut self, key: StrashKey) -> Signal {
        if let Some(hit) = self.strash.get(&key).copied() {
            if !self.nodes[hit.node.id].dead {
                return hit;
            }
            log::debug!("evicting strash entry for dead node {}", hit.node);
            self.strash.remove(&key);
        }
        for child in key.children.iter() {
            debug_assert!(
                child.node.id < self.nodes.len() && !self.nodes[child.node.id].dead,
                "gate child {} is out of range or dead",
                child
            );
            self.nodes[child.node.id].fanout += 1;
        }
        let n = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(key.children.clone(), key.function));
        let s = Signal::from(n);
        self.strash.insert(key, s);
        s
    }

    fn references(&self, target: NodeId) -> References {
        let mut slots = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.dead {
                continue;
            }
            for (slot, child) in node.children.iter().enumerate() {
                if child.node == target {
                    slots.push((NodeId::new(id), slot));
                }
            }
        }
        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.node == target)
            .map(|(i, _)| i)
            .collect();
        References { slots, outputs }
    }

    fn evict(&mut self, n: NodeId, canonicalize: Canonicalize) {
        let node = &self.nodes[n.id];
        if let Canonical::Gate(key, _) = canonicalize(&node.children, node.function, &self.functions)
        {
            if self.strash.get(&key).map(|s| s.node) == Some(n) {
                self.strash.remove(&key);
            }
        }
    }

    /// Hashes live gate `n` under its current signature. Returns the signal
    /// that must replace `n` when the gate folds to a trivial signal or
    /// duplicates another live gate; `n` is left unhashed in that case.
    fn rekey(&mut self, n: NodeId, canonicalize: Canonicalize) -> Option<Signal> {
        let node = &self.nodes[n.id];
        match canonicalize(&node.children, node.function, &self.functions) {
            Canonical::Trivial(s) => Some(s),
            Canonical::Gate(key, complemented) => match self.strash.get(&key).copied() {
                Some(existing) if existing.node != n && !self.nodes[existing.node.id].dead => {
                    Some(existing.complement_if(complemented))
                }
                _ => {
                    self.strash.insert(key, Signal::new(n, complemented));
                    None
                }
            },
        }
    }

    /// Marks gate `root` dead and releases its fanins, recursively releasing
    /// gates left without references.
    fn take_out(&mut self, root: NodeId, canonicalize: Canonicalize) {
        let mut worklist = vec![root];
        while let Some(n) = worklist.pop() {
            if self.nodes[n.id].dead {
                continue;
            }
            self.evict(n, canonicalize);
            let node = &mut self.nodes[n.id];
            node.dead = true;
            node.fanout = 0;
            let children: Vec<NodeId> = node.children.iter().map(|c| c.node).collect();
            for child in children {
                let is_gate = self.is_gate(child);
                let child_node = &mut self.nodes[child.id];
                child_node.fanout = child_node.fanout.saturating_sub(1);
                if child_node.fanout == 0 && !child_node.dead && is_gate {
                    worklist.push(child);
                }
            }
            log::trace!("took out node {}", n);
        }
    }

    fn in_transitive_fanin(&self, root: NodeId, target: NodeId) -> bool {
        let mut seen = vec![false; self.nodes.len()];
        let mut worklist = vec![root];
        while let Some(n) = worklist.pop() {
            if n == target {
                return true;
            }
            if std::mem::replace(&mut seen[n.id], true) {
                continue;
            }
            worklist.extend(self.nodes[n.id].children.iter().map(|c| c.node));
        }
        false
    }

    /// Redirects every reference to `old` onto `new` and releases `old`.
    ///
    /// Parents whose rewritten children fold to a trivial signal or duplicate
    /// another live gate are substituted in turn, so no two live gates share
    /// a signature afterwards.
    pub(crate) fn substitute(
        &mut self,
        old: NodeId,
        new: Signal,
        canonicalize: Canonicalize,
    ) -> Result<(), NetworkError> {
        self.check_node(old)?;
        self.check_node(new.node)?;
        if old == new.node {
            return Err(NetworkError::SelfSubstitution(old));
        }
        if self.is_constant(old) {
            return Err(NetworkError::NotAGate(old));
        }
        for n in [old, new.node] {
            if self.nodes[n.id].dead {
                return Err(NetworkError::DeadNode(n));
            }
        }
        debug_assert!(
            !self.in_transitive_fanin(new.node, old),
            "substituting {} with {} would create a cycle",
            old,
            new
        );

        let mut replaced: AHashMap<NodeId, Signal> = AHashMap::new();
        let mut worklist = vec![(old, new)];
        while let Some((old, new)) = worklist.pop() {
            if self.nodes[old.id].dead {
                continue;
            }
            let new = resolve_replacement(&replaced, new);
            if new.node == old || self.nodes[new.node.id].dead {
                // The replacement was released after it was queued, so `old`
                // now owns the signature.
                if let Some(s) = self.rekey(old, canonicalize) {
                    worklist.push((old, s));
                }
                continue;
            }
            self.redirect(old, new, canonicalize, &mut worklist);
            replaced.insert(old, new);
        }
        self.check_invariants_with_debug_assert();
        Ok(())
    }

    /// One substitution step: rewrites the references to `old`, releases it,
    /// and queues the parents that became redundant.
    fn redirect(
        &mut self,
        old: NodeId,
        new: Signal,
        canonicalize: Canonicalize,
        worklist: &mut Vec<(NodeId, Signal)>,
    ) {
        let refs = self.references(old);
        let parents = refs.parents();
        for p in parents.iter() {
            self.evict(*p, canonicalize);
        }
        for (p, slot) in refs.slots.iter() {
            let child = &mut self.nodes[p.id].children[*slot];
            *child = new.complement_if(child.complemented);
        }
        for i in refs.outputs.iter() {
            let output = &mut self.outputs[*i];
            *output = new.complement_if(output.complemented);
        }
        let redirected = (refs.slots.len() + refs.outputs.len()) as u32;
        self.nodes[new.node.id].fanout += redirected;
        self.nodes[old.id].fanout = 0;
        if self.is_gate(old) {
            self.take_out(old, canonicalize);
        }
        for p in parents {
            if self.nodes[p.id].dead {
                continue;
            }
            if let Some(s) = self.rekey(p, canonicalize) {
                log::debug!("node {} became redundant with {}; substituting it", p, s);
                worklist.push((p, s));
            }
        }
        log::debug!(
            "substituted {} with {} ({} references redirected)",
            old,
            new,
            redirected
        );
    }

    /// Complements every child of gate `n` and every use of `n`.
    pub(crate) fn complement_gate(
        &mut self,
        n: NodeId,
        canonicalize: Canonicalize,
    ) -> Result<(), NetworkError> {
        self.check_live_gate(n)?;
        let refs = self.references(n);
        let parents = refs.parents();
        self.evict(n, canonicalize);
        for p in parents.iter() {
            self.evict(*p, canonicalize);
        }
        for child in self.nodes[n.id].children.iter_mut() {
            *child = child.complement();
        }
        for (p, slot) in refs.slots.iter() {
            let child = &mut self.nodes[p.id].children[*slot];
            *child = child.complement();
        }
        for i in refs.outputs.iter() {
            self.outputs[*i] = self.outputs[*i].complement();
        }
        // Toggling every use of `n` maps parent signatures one to one, so a
        // well-formed store gains no duplicates here.
        for m in std::iter::once(n).chain(parents) {
            let replacement = self.rekey(m, canonicalize);
            debug_assert!(
                replacement.is_none(),
                "complementing {} made {} redundant",
                n,
                m
            );
        }
        log::trace!("complemented gate {}", n);
        Ok(())
    }

    /// Recounts references from live gates and outputs and compares them
    /// with the stored fanout counts.
    pub(crate) fn check_invariants_with_debug_assert(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let mut expected = vec![0u32; self.nodes.len()];
        for node in self.nodes.iter().filter(|node| !node.dead) {
            for child in node.children.iter() {
                expected[child.node.id] += 1;
            }
        }
        for output in self.outputs.iter() {
            expected[output.node.id] += 1;
        }
        for (id, node) in self.nodes.iter().enumerate() {
            debug_assert_eq!(
                node.fanout, expected[id],
                "fanout count of node %{} is stale",
                id
            );
        }
    }
}
