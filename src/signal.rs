// SPDX-License-Identifier: Apache-2.0

/// Dense index of a node in its store. Indices are never reused.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId {
    pub id: usize,
}

impl NodeId {
    pub const fn new(id: usize) -> Self {
        NodeId { id }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.id)
    }
}

/// Reference to a node plus a polarity bit.
///
/// Orders by node first, then by polarity, which is the order canonical gate
/// keys are sorted in.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Signal {
    pub node: NodeId,
    pub complemented: bool,
}

impl Signal {
    pub const fn new(node: NodeId, complemented: bool) -> Self {
        Signal { node, complemented }
    }

    #[must_use]
    pub fn complement(&self) -> Self {
        Signal {
            node: self.node,
            complemented: !self.complemented,
        }
    }

    /// Complements the signal when `cond` holds.
    #[must_use]
    pub fn complement_if(&self, cond: bool) -> Self {
        Signal {
            node: self.node,
            complemented: self.complemented ^ cond,
        }
    }

    pub fn non_complemented(&self) -> Option<NodeId> {
        if self.complemented {
            None
        } else {
            Some(self.node)
        }
    }
}

impl std::ops::Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        self.complement()
    }
}

impl From<NodeId> for Signal {
    fn from(node: NodeId) -> Self {
        Signal {
            node,
            complemented: false,
        }
    }
}

impl From<&NodeId> for Signal {
    fn from(node: &NodeId) -> Self {
        Signal::from(*node)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.complemented {
            write!(f, "!{}", self.node)
        } else {
            write!(f, "{}", self.node)
        }
    }
}
