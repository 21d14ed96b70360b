// SPDX-License-Identifier: Apache-2.0

//! Append-only, content-addressed store of node functions.
//!
//! A function and its complement share one entry: tables are normalized so
//! that bit 0 is clear, and the literal handed out is `2 * index` for the
//! stored table or `2 * index + 1` for its complement.

use ahash::AHashMap;

use crate::truth_table::TruthTable;

#[derive(Debug, Clone, Default)]
pub struct FunctionCache {
    tables: Vec<TruthTable>,
    /// Per entry: whether every input permutation yields the same function.
    symmetric: Vec<bool>,
    index: AHashMap<TruthTable, u32>,
}

impl FunctionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `function` (or finds it) and returns its literal.
    pub fn insert(&mut self, function: &TruthTable) -> u32 {
        let (normal, complemented) = if function.num_bits() > 0 && function.get_bit(0) {
            (!function, true)
        } else {
            (function.clone(), false)
        };
        let index = match self.index.get(&normal) {
            Some(index) => *index,
            None => {
                let index = self.tables.len() as u32;
                self.index.insert(normal.clone(), index);
                self.symmetric.push(normal.is_symmetric());
                self.tables.push(normal);
                index
            }
        };
        2 * index + complemented as u32
    }

    /// Returns the table for `literal` by value.
    pub fn get(&self, literal: u32) -> TruthTable {
        let table = &self.tables[(literal / 2) as usize];
        if literal % 2 == 1 {
            !table
        } else {
            table.clone()
        }
    }

    /// Whether the children of a node with function `literal` may be
    /// reordered freely. Complementing preserves symmetry, so both literals
    /// of an entry agree.
    pub fn is_symmetric(&self, literal: u32) -> bool {
        self.symmetric[(literal / 2) as usize]
    }

    /// Number of distinct (complement-normalized) tables stored.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complements_share_an_entry() {
        let mut cache = FunctionCache::new();
        let and = TruthTable::from_word(2, 0x8);
        let nand = !&and;
        let and_lit = cache.insert(&and);
        let nand_lit = cache.insert(&nand);
        assert_eq!(and_lit ^ 1, nand_lit);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(nand_lit), nand);
        assert_eq!(cache.get(and_lit), and);
    }

    #[test]
    fn test_symmetry_is_recorded_per_entry() {
        let mut cache = FunctionCache::new();
        let or = cache.insert(&TruthTable::from_word(2, 0xe));
        let nor = cache.insert(&TruthTable::from_word(2, 0x1));
        let mux = cache.insert(&TruthTable::from_word(3, 0xca));
        assert!(cache.is_symmetric(or));
        assert!(cache.is_symmetric(nor));
        assert!(!cache.is_symmetric(mux));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut cache = FunctionCache::new();
        let tt = TruthTable::from_word(3, 0x96);
        assert_eq!(cache.insert(&tt), cache.insert(&tt.clone()));
        assert_eq!(cache.len(), 1);
    }
}
