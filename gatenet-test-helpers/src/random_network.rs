// SPDX-License-Identifier: Apache-2.0

use gatenet::Network;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct RandomNetworkShape {
    pub num_pis: usize,
    pub num_gates: usize,
    pub num_pos: usize,
    /// Probability that a gate operand or output is complemented.
    pub complement_probability: f64,
}

impl Default for RandomNetworkShape {
    fn default() -> Self {
        RandomNetworkShape {
            num_pis: 4,
            num_gates: 16,
            num_pos: 3,
            complement_probability: 0.4,
        }
    }
}

fn pick<N: Network, R: Rng>(ntk: &N, rng: &mut R, signals: &[N::Signal], p: f64) -> N::Signal {
    let s = signals[rng.gen_range(0..signals.len())];
    if rng.gen_bool(p) {
        ntk.create_not(s)
    } else {
        s
    }
}

/// Populates the empty network `ntk` with a random combinational circuit of
/// the requested shape, mixing AND, OR, XOR, and majority constructors.
///
/// Outputs are drawn from the most recently created signals so most of the
/// circuit stays reachable.
pub fn random_network<N: Network, R: Rng>(ntk: &N, rng: &mut R, shape: &RandomNetworkShape) {
    assert!(shape.num_pis > 0, "random networks need at least one input");
    let p = shape.complement_probability;
    let mut signals: Vec<N::Signal> = (0..shape.num_pis).map(|_| ntk.create_pi()).collect();
    for _ in 0..shape.num_gates {
        let a = pick(ntk, rng, &signals, p);
        let b = pick(ntk, rng, &signals, p);
        let s = match rng.gen_range(0..4) {
            0 => ntk.create_and(a, b),
            1 => ntk.create_or(a, b),
            2 => ntk.create_xor(a, b),
            _ => {
                let c = pick(ntk, rng, &signals, p);
                ntk.create_maj(a, b, c)
            }
        };
        signals.push(s);
    }
    let window = signals.len().min(shape.num_pos.max(1) * 2);
    let tail = &signals[signals.len() - window..];
    for _ in 0..shape.num_pos {
        let s = pick(ntk, rng, tail, p);
        ntk.create_po(s);
    }
    log::trace!(
        "random network: {} inputs, {} gates, {} outputs",
        ntk.num_pis(),
        ntk.num_gates(),
        ntk.num_pos()
    );
}
