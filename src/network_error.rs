// SPDX-License-Identifier: Apache-2.0

use crate::signal::NodeId;

/// Errors surfaced by network construction, simulation, views, and the SAT
/// bridge.
///
/// Most variants describe a caller passing data that does not fit the
/// network it is applied to; they are reported instead of aborting so that
/// drivers can print a diagnostic.
#[derive(Debug)]
pub enum NetworkError {
    /// A node index is not below the network's size.
    NodeOutOfRange { node: NodeId, size: usize },
    /// The number of values or children does not match the expected arity.
    ArityMismatch { expected: usize, actual: usize },
    /// The node is a constant or a primary input and has no gate function.
    NotAGate(NodeId),
    /// The node was released by a substitution and may not be rewritten.
    DeadNode(NodeId),
    /// `substitute_node` was asked to replace a node with itself.
    SelfSubstitution(NodeId),
    /// Two networks (or a network and an assignment) disagree on the number
    /// of primary inputs.
    InputCountMismatch { expected: usize, actual: usize },
    /// A network does not have the number of primary outputs required.
    OutputCountMismatch { expected: usize, actual: usize },
    /// Simulation values of differing widths were combined.
    ValueWidthMismatch { expected: usize, actual: usize },
    /// A cube list produced no product term.
    EmptyCover,
    /// Malformed don't-care text; `line` is 1-based.
    Parse { line: usize, message: String },
    Io(std::io::Error),
    Solver(varisat::solver::SolverError),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::NodeOutOfRange { node, size } => {
                write!(f, "node {} out of range for network of size {}", node, size)
            }
            NetworkError::ArityMismatch { expected, actual } => {
                write!(f, "arity mismatch: expected {} got {}", expected, actual)
            }
            NetworkError::NotAGate(node) => write!(f, "node {} is not a gate", node),
            NetworkError::DeadNode(node) => write!(f, "node {} is dead", node),
            NetworkError::SelfSubstitution(node) => {
                write!(f, "cannot substitute node {} with itself", node)
            }
            NetworkError::InputCountMismatch { expected, actual } => write!(
                f,
                "primary input count mismatch: expected {} got {}",
                expected, actual
            ),
            NetworkError::OutputCountMismatch { expected, actual } => write!(
                f,
                "primary output count mismatch: expected {} got {}",
                expected, actual
            ),
            NetworkError::ValueWidthMismatch { expected, actual } => write!(
                f,
                "simulation value width mismatch: expected {} bits got {}",
                expected, actual
            ),
            NetworkError::EmptyCover => write!(f, "cube list contains no product term"),
            NetworkError::Parse { line, message } => {
                write!(f, "parse error on line {}: {}", line, message)
            }
            NetworkError::Io(e) => write!(f, "I/O error: {}", e),
            NetworkError::Solver(e) => write!(f, "SAT solver error: {:?}", e),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e)
    }
}

impl From<varisat::solver::SolverError> for NetworkError {
    fn from(e: varisat::solver::SolverError) -> Self {
        NetworkError::Solver(e)
    }
}
