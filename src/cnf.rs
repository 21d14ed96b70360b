// SPDX-License-Identifier: Apache-2.0

//! Tseitin encoding of networks into CNF against an abstract solver.

use varisat::ExtendFormula;

use crate::network::{GateKind, Network};
use crate::network_error::NetworkError;
use crate::topo::topo_order;
use crate::truth_table::TruthTable;

/// A solver literal: a variable index plus a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: u32,
    pub negated: bool,
}

impl Lit {
    pub fn positive(var: u32) -> Self {
        Lit {
            var,
            negated: false,
        }
    }

    pub fn negative(var: u32) -> Self {
        Lit { var, negated: true }
    }

    /// Negates the literal when `cond` holds.
    #[must_use]
    pub fn not_if(self, cond: bool) -> Self {
        Lit {
            var: self.var,
            negated: self.negated ^ cond,
        }
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        self.not_if(true)
    }
}

impl From<Lit> for varisat::Lit {
    fn from(lit: Lit) -> Self {
        let var = varisat::Var::from_index(lit.var as usize);
        if lit.negated {
            varisat::Lit::negative(var)
        } else {
            varisat::Lit::positive(var)
        }
    }
}

/// The two operations clause emission needs from a SAT solver.
pub trait SatSolver {
    /// Allocates a fresh variable and returns its index.
    fn add_variable(&mut self) -> u32;
    fn add_clause(&mut self, clause: &[Lit]);
}

fn to_varisat(clause: &[Lit]) -> Vec<varisat::Lit> {
    clause.iter().map(|l| varisat::Lit::from(*l)).collect()
}

impl SatSolver for varisat::Solver<'_> {
    fn add_variable(&mut self) -> u32 {
        ExtendFormula::new_var(self).index() as u32
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        ExtendFormula::add_clause(self, &to_varisat(clause));
    }
}

impl SatSolver for varisat::CnfFormula {
    fn add_variable(&mut self) -> u32 {
        ExtendFormula::new_var(self).index() as u32
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        ExtendFormula::add_clause(self, &to_varisat(clause));
    }
}

// Tseitin clauses for out <=> a AND b:
// (out | !a | !b) & (!out | a) & (!out | b)
pub fn on_and(solver: &mut impl SatSolver, out: Lit, a: Lit, b: Lit) {
    solver.add_clause(&[!a, !b, out]);
    solver.add_clause(&[a, !out]);
    solver.add_clause(&[b, !out]);
}

// Clauses for out = a XOR b are:
// (!a | !b | !out) & (a | b | !out) & (a | !b | out) & (!a | b | out)
pub fn on_xor(solver: &mut impl SatSolver, out: Lit, a: Lit, b: Lit) {
    solver.add_clause(&[!a, !b, !out]);
    solver.add_clause(&[a, b, !out]);
    solver.add_clause(&[a, !b, out]);
    solver.add_clause(&[!a, b, out]);
}

/// Three-input parity: one clause per input row.
pub fn on_xor3(solver: &mut impl SatSolver, out: Lit, a: Lit, b: Lit, c: Lit) {
    for row in 0u32..8 {
        let odd = row.count_ones() % 2 == 1;
        solver.add_clause(&[
            a.not_if(row & 1 != 0),
            b.not_if(row & 2 != 0),
            c.not_if(row & 4 != 0),
            out.not_if(!odd),
        ]);
    }
}

// Any two true inputs force the output true, any two false inputs force it
// false.
pub fn on_maj(solver: &mut impl SatSolver, out: Lit, a: Lit, b: Lit, c: Lit) {
    for (x, y) in [(a, b), (a, c), (b, c)] {
        solver.add_clause(&[!x, !y, out]);
        solver.add_clause(&[x, y, !out]);
    }
}

/// Arbitrary table over `inputs`: for every row, the inputs taking that row
/// imply the output takes the row's value.
pub fn on_lut(solver: &mut impl SatSolver, out: Lit, inputs: &[Lit], table: &TruthTable) {
    debug_assert_eq!(inputs.len(), table.num_vars());
    for row in 0..table.num_bits() {
        let mut clause: Vec<Lit> = inputs
            .iter()
            .enumerate()
            .map(|(j, input)| input.not_if((row >> j) & 1 == 1))
            .collect();
        clause.push(out.not_if(!table.get_bit(row)));
        solver.add_clause(&clause);
    }
}

/// Encodes the transitive fanin of every primary output, allocating a
/// constant-false variable first. Returns one literal per primary output.
pub fn generate_cnf<N: Network, S: SatSolver>(
    ntk: &N,
    solver: &mut S,
    pi_lits: &[Lit],
) -> Result<Vec<Lit>, NetworkError> {
    let constant = Lit::positive(solver.add_variable());
    solver.add_clause(&[!constant]);
    generate_cnf_with_constant(ntk, solver, constant, pi_lits)
}

/// Like [`generate_cnf`], with a caller-provided literal that is false in
/// every model.
pub fn generate_cnf_with_constant<N: Network, S: SatSolver>(
    ntk: &N,
    solver: &mut S,
    constant_false: Lit,
    pi_lits: &[Lit],
) -> Result<Vec<Lit>, NetworkError> {
    if pi_lits.len() != ntk.num_pis() {
        return Err(NetworkError::InputCountMismatch {
            expected: ntk.num_pis(),
            actual: pi_lits.len(),
        });
    }
    let mut node_lits: Vec<Option<Lit>> = vec![None; ntk.size()];
    let lookup = |node_lits: &[Option<Lit>], s: N::Signal| -> Result<Lit, NetworkError> {
        let n = ntk.get_node(s);
        node_lits[n.id]
            .map(|lit| lit.not_if(ntk.is_complemented(s)))
            .ok_or(NetworkError::NodeOutOfRange {
                node: n,
                size: node_lits.len(),
            })
    };
    for n in topo_order(ntk) {
        let lit = if ntk.is_constant(n) {
            constant_false.not_if(ntk.constant_value(n))
        } else if let Some(index) = ntk.pi_index(n) {
            pi_lits[index]
        } else {
            let fanins: Vec<Lit> = ntk
                .fanins(n)
                .into_iter()
                .map(|s| lookup(&node_lits, s))
                .collect::<Result<_, _>>()?;
            let out = Lit::positive(solver.add_variable());
            match (ntk.gate_kind(n), fanins.as_slice()) {
                (GateKind::And, [a, b]) => on_and(solver, out, *a, *b),
                (GateKind::Xor, [a, b]) => on_xor(solver, out, *a, *b),
                (GateKind::Xor3, [a, b, c]) => on_xor3(solver, out, *a, *b, *c),
                (GateKind::Maj, [a, b, c]) => on_maj(solver, out, *a, *b, *c),
                _ => on_lut(solver, out, &fanins, &ntk.node_function(n)),
            }
            out
        };
        node_lits[n.id] = Some(lit);
    }
    ntk.pos().map(|po| lookup(&node_lits, po)).collect()
}
