// SPDX-License-Identifier: Apache-2.0

//! Dense truth tables over a fixed number of variables.

use bitvec::vec::BitVec;

/// Truth table of a function over `num_vars` inputs, stored as `2^num_vars`
/// bits where bit `i` is the output for the input assignment whose variable
/// `j` is bit `j` of `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    bits: BitVec,
}

impl TruthTable {
    /// Constant-zero table over `num_vars` inputs.
    pub fn new(num_vars: usize) -> Self {
        TruthTable {
            num_vars,
            bits: BitVec::repeat(false, 1usize << num_vars),
        }
    }

    /// Builds a table over at most six variables from the low bits of `word`.
    pub fn from_word(num_vars: usize, word: u64) -> Self {
        assert!(
            num_vars <= 6,
            "from_word supports at most 6 variables, got {}",
            num_vars
        );
        let mut tt = TruthTable::new(num_vars);
        for i in 0..tt.num_bits() {
            tt.set_bit(i, (word >> i) & 1 == 1);
        }
        tt
    }

    /// Projection onto variable `var`.
    pub fn nth_var(num_vars: usize, var: usize) -> Self {
        assert!(
            var < num_vars,
            "variable {} out of range for {} variables",
            var,
            num_vars
        );
        let mut tt = TruthTable::new(num_vars);
        for i in 0..tt.num_bits() {
            tt.set_bit(i, (i >> var) & 1 == 1);
        }
        tt
    }

    /// Zero table with the same shape as `self`.
    pub fn construct(&self) -> Self {
        TruthTable::new(self.num_vars)
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    pub fn get_bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn set_bit(&mut self, index: usize, value: bool) {
        self.bits.set(index, value);
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_const0(&self) -> bool {
        self.bits.not_any()
    }

    /// Whether the output depends only on how many inputs are set, so any
    /// permutation of the inputs computes the same function.
    pub fn is_symmetric(&self) -> bool {
        let mut by_weight: Vec<Option<bool>> = vec![None; self.num_vars + 1];
        for i in 0..self.num_bits() {
            let bit = self.get_bit(i);
            match by_weight[i.count_ones() as usize].replace(bit) {
                Some(seen) if seen != bit => return false,
                _ => {}
            }
        }
        true
    }

    /// Returns the low 64 bits of the table as a word.
    pub fn to_word(&self) -> u64 {
        self.bits
            .iter()
            .by_vals()
            .take(64)
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | ((b as u64) << i))
    }

    fn zip_with(&self, other: &TruthTable, f: impl Fn(bool, bool) -> bool) -> TruthTable {
        assert_eq!(
            self.num_vars, other.num_vars,
            "truth tables must have the same number of variables"
        );
        let bits: BitVec = self
            .bits
            .iter()
            .by_vals()
            .zip(other.bits.iter().by_vals())
            .map(|(a, b)| f(a, b))
            .collect();
        TruthTable {
            num_vars: self.num_vars,
            bits,
        }
    }
}

impl std::ops::Not for &TruthTable {
    type Output = TruthTable;

    fn not(self) -> TruthTable {
        TruthTable {
            num_vars: self.num_vars,
            bits: self.bits.iter().by_vals().map(|b| !b).collect(),
        }
    }
}

impl std::ops::Not for TruthTable {
    type Output = TruthTable;

    fn not(self) -> TruthTable {
        !&self
    }
}

impl std::ops::BitAnd for &TruthTable {
    type Output = TruthTable;

    fn bitand(self, rhs: &TruthTable) -> TruthTable {
        self.zip_with(rhs, |a, b| a & b)
    }
}

impl std::ops::BitOr for &TruthTable {
    type Output = TruthTable;

    fn bitor(self, rhs: &TruthTable) -> TruthTable {
        self.zip_with(rhs, |a, b| a | b)
    }
}

impl std::ops::BitXor for &TruthTable {
    type Output = TruthTable;

    fn bitxor(self, rhs: &TruthTable) -> TruthTable {
        self.zip_with(rhs, |a, b| a ^ b)
    }
}

/// Binary rendering with the highest-index bit first.
impl std::fmt::Display for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.num_bits()).rev() {
            write!(f, "{}", if self.get_bit(i) { '1' } else { '0' })?;
        }
        Ok(())
    }
}
