// SPDX-License-Identifier: Apache-2.0

//! SAT-based combinational equivalence checking between two networks with the
//! same interface.
//!
//! Both networks are encoded over shared primary-input variables, one XOR
//! miter is built per output pair, and the solver is asked for an assignment
//! under which some miter is true.

use std::collections::HashSet;

use crate::cnf::{generate_cnf_with_constant, on_xor, Lit, SatSolver};
use crate::network::Network;
use crate::network_error::NetworkError;
use crate::views::DontCareView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivResult {
    Proved,
    /// One value per primary input under which some output differs.
    Disproved(Vec<bool>),
}

fn check_interfaces<A: Network, B: Network>(a: &A, b: &B) -> Result<(), NetworkError> {
    if a.num_pis() != b.num_pis() {
        return Err(NetworkError::InputCountMismatch {
            expected: a.num_pis(),
            actual: b.num_pis(),
        });
    }
    if a.num_pos() != b.num_pos() {
        return Err(NetworkError::OutputCountMismatch {
            expected: a.num_pos(),
            actual: b.num_pos(),
        });
    }
    Ok(())
}

/// Proves that `a` and `b` compute the same function on every output.
pub fn prove_equivalence<A: Network, B: Network>(a: &A, b: &B) -> Result<EquivResult, NetworkError> {
    check_interfaces(a, b)?;
    solve_miter(a, b, |_, _, _| Ok(()))
}

/// Proves that `view` and `other` agree on every assignment outside the
/// view's don't-care region.
pub fn prove_equivalence_with_dont_cares<A: Network, B: Network>(
    view: &DontCareView<A>,
    other: &B,
) -> Result<EquivResult, NetworkError> {
    check_interfaces(view, other)?;
    solve_miter(view, other, |solver, constant, pi_lits| {
        view.emit_exclusion_clauses_for_inputs(solver, constant, pi_lits)
    })
}

fn solve_miter<A: Network, B: Network>(
    a: &A,
    b: &B,
    restrict: impl FnOnce(&mut varisat::Solver<'static>, Lit, &[Lit]) -> Result<(), NetworkError>,
) -> Result<EquivResult, NetworkError> {
    let mut solver = varisat::Solver::new();
    let constant = Lit::positive(solver.add_variable());
    solver.add_clause(&[!constant]);
    let pi_lits: Vec<Lit> = (0..a.num_pis())
        .map(|_| Lit::positive(solver.add_variable()))
        .collect();

    let outputs_a = generate_cnf_with_constant(a, &mut solver, constant, &pi_lits)?;
    let outputs_b = generate_cnf_with_constant(b, &mut solver, constant, &pi_lits)?;
    restrict(&mut solver, constant, &pi_lits)?;

    // diff -> OR(miters)
    let diff = Lit::positive(solver.add_variable());
    let mut clause = vec![!diff];
    for (la, lb) in outputs_a.iter().zip(outputs_b.iter()) {
        let miter = Lit::positive(solver.add_variable());
        on_xor(&mut solver, miter, *la, *lb);
        clause.push(miter);
    }
    solver.add_clause(&clause);

    solver.assume(&[varisat::Lit::from(diff)]);
    if !solver.solve()? {
        log::debug!(
            "equivalence proved over {} inputs and {} outputs",
            a.num_pis(),
            a.num_pos()
        );
        return Ok(EquivResult::Proved);
    }
    let model: HashSet<varisat::Lit> = solver.model().unwrap_or_default().into_iter().collect();
    let counterexample: Vec<bool> = pi_lits
        .iter()
        .map(|lit| model.contains(&varisat::Lit::from(*lit)))
        .collect();
    log::debug!("equivalence disproved; counterexample {:?}", counterexample);
    Ok(EquivResult::Disproved(counterexample))
}
