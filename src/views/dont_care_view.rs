// SPDX-License-Identifier: Apache-2.0

//! Attaches an external don't-care function to a network.
//!
//! The don't-care function is a separate single-output network over the same
//! primary inputs. Its output is 1 on assignments the base network does not
//! need to be correct on.
//!
//! It can be read from a cube list:
//!
//! ```text
//! <header line 1>
//! <header line 2>
//! <header line 3>
//! <header line 4>
//! 1-0 0
//! 01- 0
//! .end
//! ```
//!
//! Each data row lists one offset cube of the don't-care function: `0`/`1`
//! are negative/positive literals, any other character leaves that input out
//! of the cube. The don't-care function is the complement of the union of the
//! listed cubes, so listed assignments are care points.

use std::io::BufRead;
use std::path::Path;

use crate::cnf::{generate_cnf_with_constant, Lit, SatSolver};
use crate::network::{FanoutNetwork, Network, SelfDualNetwork};
use crate::network_error::NetworkError;
use crate::signal::NodeId;
use crate::simulation::{simulate, PatternSimulator};
use crate::views::forward_network_queries;

const HEADER_LINES: usize = 4;

/// One row of a cube list: per input, `Some(polarity)` or `None` when the
/// input does not appear in the cube.
pub type Cube = Vec<Option<bool>>;

#[derive(Debug, Clone)]
pub struct DontCareView<N: Network> {
    base: N,
    dont_cares: N,
}

impl<N: Network> DontCareView<N> {
    /// Wraps `base` with the don't-care function computed by `dont_cares`,
    /// which must have the same primary inputs and exactly one output.
    pub fn new(base: N, dont_cares: N) -> Result<Self, NetworkError> {
        if dont_cares.num_pis() != base.num_pis() {
            return Err(NetworkError::InputCountMismatch {
                expected: base.num_pis(),
                actual: dont_cares.num_pis(),
            });
        }
        if dont_cares.num_pos() != 1 {
            return Err(NetworkError::OutputCountMismatch {
                expected: 1,
                actual: dont_cares.num_pos(),
            });
        }
        Ok(DontCareView { base, dont_cares })
    }

    /// Builds the don't-care function from a cube list. The whole text is
    /// validated before any node is created.
    pub fn from_reader<R: BufRead>(base: N, reader: R) -> Result<Self, NetworkError>
    where
        N: Default,
    {
        let cubes = parse_offset_cubes(reader, base.num_pis())?;
        let dont_cares = N::default();
        build_cover_complement(&dont_cares, base.num_pis(), &cubes)?;
        Self::new(base, dont_cares)
    }

    pub fn from_path<P: AsRef<Path>>(base: N, path: P) -> Result<Self, NetworkError>
    where
        N: Default,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(base, std::io::BufReader::new(file))
    }

    pub fn base(&self) -> &N {
        &self.base
    }

    pub fn dont_cares(&self) -> &N {
        &self.dont_cares
    }

    /// Whether `assignment` (one value per primary input) lies in the
    /// don't-care region.
    pub fn pattern_is_excluded(&self, assignment: &[bool]) -> Result<bool, NetworkError> {
        if assignment.len() != self.dont_cares.num_pis() {
            return Err(NetworkError::InputCountMismatch {
                expected: self.dont_cares.num_pis(),
                actual: assignment.len(),
            });
        }
        let outputs = simulate(&self.dont_cares, &PatternSimulator::new(assignment))?;
        Ok(outputs[0])
    }

    /// Adds clauses that rule out every don't-care assignment. Variable 0 is
    /// the constant-false variable and variable `i + 1` is primary input `i`;
    /// the caller must already have allocated variables `0..=num_pis`. The
    /// unit clause fixing variable 0 to false is emitted here.
    pub fn emit_exclusion_clauses<S: SatSolver>(&self, solver: &mut S) -> Result<(), NetworkError> {
        let constant_false = Lit::positive(0);
        solver.add_clause(&[!constant_false]);
        let pi_lits: Vec<Lit> = (0..self.dont_cares.num_pis())
            .map(|i| Lit::positive(i as u32 + 1))
            .collect();
        self.emit_exclusion_clauses_for_inputs(solver, constant_false, &pi_lits)
    }

    /// Like [`Self::emit_exclusion_clauses`], with caller-chosen literals for
    /// the constant and the primary inputs. The caller must already force
    /// `constant_false` to false.
    pub fn emit_exclusion_clauses_for_inputs<S: SatSolver>(
        &self,
        solver: &mut S,
        constant_false: Lit,
        pi_lits: &[Lit],
    ) -> Result<(), NetworkError> {
        let outputs = generate_cnf_with_constant(&self.dont_cares, solver, constant_false, pi_lits)?;
        solver.add_clause(&[!outputs[0]]);
        log::trace!(
            "emitted exclusion clauses for {} don't-care gates",
            self.dont_cares.num_gates()
        );
        Ok(())
    }
}

/// Reads the data rows of a cube list. Only offset rows (output bit `0`) are
/// accepted.
pub fn parse_offset_cubes<R: BufRead>(reader: R, num_pis: usize) -> Result<Vec<Cube>, NetworkError> {
    let mut cubes = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if index < HEADER_LINES {
            continue;
        }
        if line.starts_with(".end") {
            break;
        }
        let mut fields = line.split_whitespace();
        let bits = match fields.next() {
            Some(bits) => bits,
            None => continue,
        };
        let parse_error = |message: String| NetworkError::Parse {
            line: line_number,
            message,
        };
        let output = fields
            .next()
            .ok_or_else(|| parse_error("missing output bit".to_string()))?;
        if let Some(extra) = fields.next() {
            return Err(parse_error(format!("unexpected field {:?}", extra)));
        }
        if bits.chars().count() != num_pis {
            return Err(parse_error(format!(
                "cube {:?} has {} positions; expected {}",
                bits,
                bits.chars().count(),
                num_pis
            )));
        }
        if output != "0" {
            return Err(parse_error(format!(
                "output bit {:?}; only offset rows are supported",
                output
            )));
        }
        cubes.push(
            bits.chars()
                .map(|c| match c {
                    '0' => Some(false),
                    '1' => Some(true),
                    _ => None,
                })
                .collect(),
        );
    }
    log::debug!("parsed {} offset cubes over {} inputs", cubes.len(), num_pis);
    if cubes.is_empty() {
        return Err(NetworkError::EmptyCover);
    }
    Ok(cubes)
}

/// Creates `num_pis` primary inputs in `ntk` and one output computing the
/// complement of the union of `cubes`.
pub fn build_cover_complement<N: Network>(
    ntk: &N,
    num_pis: usize,
    cubes: &[Cube],
) -> Result<N::Signal, NetworkError> {
    if cubes.is_empty() {
        return Err(NetworkError::EmptyCover);
    }
    let pis: Vec<N::Signal> = (0..num_pis).map(|_| ntk.create_pi()).collect();
    let mut cover: Option<N::Signal> = None;
    for cube in cubes {
        let mut term: Option<N::Signal> = None;
        for (pi, literal) in pis.iter().zip(cube.iter()) {
            let literal = match literal {
                Some(true) => *pi,
                Some(false) => ntk.create_not(*pi),
                None => continue,
            };
            term = Some(match term {
                Some(term) => ntk.create_and(term, literal),
                None => literal,
            });
        }
        // A cube without literals covers every assignment.
        let term = term.unwrap_or_else(|| ntk.get_constant(true));
        cover = Some(match cover {
            Some(cover) => ntk.create_or(cover, term),
            None => term,
        });
    }
    let cover = cover.ok_or(NetworkError::EmptyCover)?;
    let output = ntk.create_not(cover);
    ntk.create_po(output);
    Ok(output)
}

impl<N: Network> Network for DontCareView<N> {
    forward_network_queries!(base);

    fn create_pi(&self) -> Self::Signal {
        self.base.create_pi()
    }

    fn create_po(&self, s: Self::Signal) -> usize {
        self.base.create_po(s)
    }

    fn create_not(&self, a: Self::Signal) -> Self::Signal {
        self.base.create_not(a)
    }

    fn create_and(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.base.create_and(a, b)
    }

    fn create_or(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.base.create_or(a, b)
    }

    fn create_xor(&self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.base.create_xor(a, b)
    }

    fn create_maj(&self, a: Self::Signal, b: Self::Signal, c: Self::Signal) -> Self::Signal {
        self.base.create_maj(a, b, c)
    }

    fn clone_node(
        &self,
        other: &Self,
        source: NodeId,
        children: &[Self::Signal],
    ) -> Result<Self::Signal, NetworkError> {
        self.base.clone_node(&other.base, source, children)
    }

    fn substitute_node(&self, old: NodeId, new: Self::Signal) -> Result<(), NetworkError> {
        self.base.substitute_node(old, new)
    }

    fn deep_clone(&self) -> Self {
        DontCareView {
            base: self.base.deep_clone(),
            dont_cares: self.dont_cares.deep_clone(),
        }
    }
}

impl<N: FanoutNetwork> FanoutNetwork for DontCareView<N> {
    fn fanout(&self, n: NodeId) -> Vec<NodeId> {
        self.base.fanout(n)
    }
}

impl<N: SelfDualNetwork> SelfDualNetwork for DontCareView<N> {
    fn invert_gate(&self, n: NodeId) -> Result<(), NetworkError> {
        self.base.invert_gate(n)
    }
}
