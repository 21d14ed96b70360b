// SPDX-License-Identifier: Apache-2.0

//! A family-independent description of a small network that `arbitrary` can
//! generate from unstructured bytes.

use arbitrary::Arbitrary;
use gatenet::Network;

#[derive(Debug, Clone, Copy, Arbitrary)]
pub enum RecipeGate {
    And,
    Or,
    Xor,
    Maj,
}

#[derive(Debug, Clone, Arbitrary)]
pub struct RecipeOp {
    pub gate: RecipeGate,
    /// Operand indices into the signals created so far, taken modulo their
    /// count.
    pub operands: [u8; 3],
    /// Bit `i` complements operand `i`.
    pub complements: u8,
}

#[derive(Debug, Clone)]
pub struct NetworkRecipe {
    pub num_pis: u8,
    pub ops: Vec<RecipeOp>,
    /// Output indices into the signals, with a complement flag.
    pub outputs: Vec<(u8, bool)>,
}

impl<'a> Arbitrary<'a> for NetworkRecipe {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_pis = u.int_in_range(1..=6)?;
        let num_ops = u.int_in_range(0..=24)?;
        let mut ops = Vec::with_capacity(num_ops as usize);
        for _ in 0..num_ops {
            ops.push(RecipeOp::arbitrary(u)?);
        }
        let num_outputs = u.int_in_range(1..=4)?;
        let mut outputs = Vec::with_capacity(num_outputs as usize);
        for _ in 0..num_outputs {
            outputs.push((u8::arbitrary(u)?, bool::arbitrary(u)?));
        }
        Ok(NetworkRecipe {
            num_pis,
            ops,
            outputs,
        })
    }
}

impl NetworkRecipe {
    /// Replays the recipe into the empty network `ntk`.
    pub fn build<N: Network>(&self, ntk: &N) {
        let mut signals: Vec<N::Signal> = (0..self.num_pis).map(|_| ntk.create_pi()).collect();
        let operand = |signals: &[N::Signal], op: &RecipeOp, i: usize| {
            let s = signals[op.operands[i] as usize % signals.len()];
            if op.complements & (1 << i) != 0 {
                ntk.create_not(s)
            } else {
                s
            }
        };
        for op in self.ops.iter() {
            let a = operand(&signals, op, 0);
            let b = operand(&signals, op, 1);
            let s = match op.gate {
                RecipeGate::And => ntk.create_and(a, b),
                RecipeGate::Or => ntk.create_or(a, b),
                RecipeGate::Xor => ntk.create_xor(a, b),
                RecipeGate::Maj => {
                    let c = operand(&signals, op, 2);
                    ntk.create_maj(a, b, c)
                }
            };
            signals.push(s);
        }
        for (index, complemented) in self.outputs.iter() {
            let s = signals[*index as usize % signals.len()];
            let s = if *complemented { ntk.create_not(s) } else { s };
            ntk.create_po(s);
        }
    }
}
