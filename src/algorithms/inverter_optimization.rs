// SPDX-License-Identifier: Apache-2.0

//! Greedy reduction of complemented edges in self-dual networks.
//!
//! Complementing a self-dual gate (inverting all of its inputs and all of its
//! uses) preserves every represented function, so the number of complemented
//! edges can be traded between a gate's fanin side and its fanout side. The
//! pass applies such flips when they strictly reduce the count.

use serde::Serialize;

use crate::network::{FanoutNetwork, Network, SelfDualNetwork};
use crate::network_error::NetworkError;
use crate::signal::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InverterOptimizationOptions {
    /// Also try flipping a gate together with the parents that then gain.
    pub two_level: bool,
    /// Upper bound on sweep rounds; `None` runs to convergence.
    pub max_rounds: Option<usize>,
}

impl Default for InverterOptimizationOptions {
    fn default() -> Self {
        InverterOptimizationOptions {
            two_level: true,
            max_rounds: None,
        }
    }
}

impl InverterOptimizationOptions {
    pub fn one_level() -> Self {
        InverterOptimizationOptions {
            two_level: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InverterOptimizationStats {
    /// Complemented edges removed by the pass.
    pub total_gain: i64,
    /// Gate flips that were kept.
    pub num_inverted_gates: usize,
    pub one_level_moves: usize,
    pub two_level_moves: usize,
    pub rounds: usize,
}

/// Complemented non-constant fanins of live gates plus complemented primary
/// outputs.
pub fn count_complemented_edges<N: Network>(ntk: &N) -> usize {
    let mut count = 0;
    for n in ntk.gates() {
        count += ntk
            .fanins(n)
            .into_iter()
            .filter(|s| ntk.is_complemented(*s) && !ntk.is_constant(ntk.get_node(*s)))
            .count();
    }
    count + ntk.pos().filter(|s| ntk.is_complemented(*s)).count()
}

/// Change in the complemented-edge count when an edge flips polarity.
fn flip_gain(complemented: bool) -> i64 {
    if complemented {
        1
    } else {
        -1
    }
}

struct InverterPass<'a, N: SelfDualNetwork + FanoutNetwork> {
    ntk: &'a N,
    /// Per node: gain contributed by the primary outputs referencing it.
    output_gain: Vec<i64>,
    stats: InverterOptimizationStats,
}

impl<'a, N: SelfDualNetwork + FanoutNetwork> InverterPass<'a, N> {
    fn new(ntk: &'a N) -> Self {
        let mut output_gain = vec![0; ntk.size()];
        for po in ntk.pos() {
            output_gain[po.node.id] += flip_gain(po.complemented);
        }
        InverterPass {
            ntk,
            output_gain,
            stats: InverterOptimizationStats::default(),
        }
    }

    /// Reduction in complemented edges if `n` were flipped now.
    fn gain(&self, n: NodeId) -> i64 {
        let mut gain = self.output_gain[n.id];
        for s in self.ntk.fanins(n) {
            if !self.ntk.is_constant(s.node) {
                gain += flip_gain(s.complemented);
            }
        }
        for parent in self.ntk.fanout(n) {
            for s in self.ntk.fanins(parent) {
                if s.node == n {
                    gain += flip_gain(s.complemented);
                }
            }
        }
        gain
    }

    fn flip(&mut self, n: NodeId) -> Result<(), NetworkError> {
        self.ntk.invert_gate(n)?;
        self.output_gain[n.id] = -self.output_gain[n.id];
        Ok(())
    }

    fn one_level_sweep(&mut self, order: &[NodeId]) -> Result<bool, NetworkError> {
        let mut changed = false;
        for &n in order {
            if self.ntk.is_dead(n) {
                continue;
            }
            let gain = self.gain(n);
            if gain > 0 {
                log::trace!("flipping {} gains {}", n, gain);
                self.flip(n)?;
                self.stats.total_gain += gain;
                self.stats.num_inverted_gates += 1;
                self.stats.one_level_moves += 1;
                changed = true;
            }
        }
        Ok(changed)
    }

    fn two_level_sweep(&mut self, order: &[NodeId]) -> Result<bool, NetworkError> {
        let mut changed = false;
        for &n in order {
            if self.ntk.is_dead(n) {
                continue;
            }
            let mut gain = self.gain(n);
            self.flip(n)?;
            let mut flipped = Vec::new();
            for parent in self.ntk.fanout(n) {
                let parent_gain = self.gain(parent);
                if parent_gain > 0 {
                    self.flip(parent)?;
                    gain += parent_gain;
                    flipped.push(parent);
                }
            }
            if gain > 0 && !flipped.is_empty() {
                log::trace!(
                    "flipping {} with parents {:?} gains {}",
                    n,
                    flipped,
                    gain
                );
                self.stats.total_gain += gain;
                self.stats.num_inverted_gates += 1 + flipped.len();
                self.stats.two_level_moves += 1;
                changed = true;
            } else {
                for parent in flipped.into_iter().rev() {
                    self.flip(parent)?;
                }
                self.flip(n)?;
            }
        }
        Ok(changed)
    }
}

/// Repeats forward and backward one-level sweeps, followed by a two-level
/// sweep when enabled, until a round changes nothing.
///
/// Fails only if the network reports an error from `invert_gate`, which does
/// not happen for live gates of a well-formed network.
pub fn optimize_inverters<N: SelfDualNetwork + FanoutNetwork>(
    ntk: &N,
    options: &InverterOptimizationOptions,
) -> Result<InverterOptimizationStats, NetworkError> {
    let before = if cfg!(debug_assertions) {
        Some(count_complemented_edges(ntk))
    } else {
        None
    };
    let forward: Vec<NodeId> = ntk.gates().collect();
    let backward: Vec<NodeId> = forward.iter().rev().copied().collect();

    let mut pass = InverterPass::new(ntk);
    loop {
        if options.max_rounds.is_some_and(|max| pass.stats.rounds >= max) {
            break;
        }
        pass.stats.rounds += 1;
        let mut changed = pass.one_level_sweep(&forward)?;
        changed |= pass.one_level_sweep(&backward)?;
        if options.two_level {
            changed |= pass.two_level_sweep(&forward)?;
        }
        if !changed {
            break;
        }
    }

    if let Some(before) = before {
        let after = count_complemented_edges(ntk);
        debug_assert_eq!(
            before as i64 - after as i64,
            pass.stats.total_gain,
            "reported gain disagrees with the complemented-edge count"
        );
    }
    log::info!(
        "inverter optimization: gain {} over {} rounds ({} one-level, {} two-level moves)",
        pass.stats.total_gain,
        pass.stats.rounds,
        pass.stats.one_level_moves,
        pass.stats.two_level_moves
    );
    Ok(pass.stats)
}
