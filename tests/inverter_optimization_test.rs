// SPDX-License-Identifier: Apache-2.0

use gatenet::algorithms::inverter_optimization::{
    count_complemented_edges, optimize_inverters, InverterOptimizationOptions,
};
use gatenet::views::FanoutView;
use gatenet::{MigNetwork, Network};
use gatenet_test_helpers::{
    assert_fanout_counts_consistent, output_functions, random_network, NetworkRecipe,
    RandomNetworkShape,
};
use pretty_assertions::assert_eq;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use test_case::test_case;

fn basic() -> MigNetwork {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let d = mig.create_pi();
    let f1 = mig.create_maj(!a, b, c);
    let f2 = mig.create_maj(!a, b, d);
    let f3 = mig.create_maj(a, !f1, f2);
    let f4 = mig.create_maj(a, !f1, b);
    mig.create_po(f3);
    mig.create_po(f4);
    mig
}

fn constant_input_0() -> MigNetwork {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let f1 = mig.create_maj(!a, b, mig.get_constant(false));
    let f2 = mig.create_maj(!a, b, c);
    let f3 = mig.create_maj(a, !f1, f2);
    mig.create_po(f3);
    mig
}

fn constant_input_1() -> MigNetwork {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let f1 = mig.create_maj(a, b, mig.get_constant(true));
    let f2 = mig.create_maj(!a, b, c);
    let f3 = mig.create_maj(a, !f1, f2);
    let f4 = mig.create_maj(a, !f1, c);
    mig.create_po(f3);
    mig.create_po(f4);
    mig
}

fn output() -> MigNetwork {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let d = mig.create_pi();
    let f1 = mig.create_maj(!a, b, c);
    let f2 = mig.create_maj(!a, b, d);
    let f3 = mig.create_maj(a, !f1, f2);
    mig.create_po(f3);
    mig.create_po(!f1);
    mig
}

fn complex() -> MigNetwork {
    let mig = MigNetwork::new();
    let zero = mig.get_constant(false);
    let x1 = mig.create_pi();
    let x2 = mig.create_pi();
    let x3 = mig.create_pi();
    let y1 = mig.create_maj(x1, !x2, x3);
    let y2 = mig.create_maj(zero, !x2, x3);
    let z1 = mig.create_maj(y1, y2, !x3);
    let z2 = mig.create_maj(x2, x3, !y2);
    let z3 = mig.create_maj(zero, x1, !y2);
    let z4 = mig.create_maj(x2, !y1, zero);
    let z5 = mig.create_maj(x1, !y1, zero);
    let t1 = mig.create_maj(z1, z2, !z3);
    let t2 = mig.create_maj(z1, !x1, zero);
    mig.create_po(!t1);
    mig.create_po(!t2);
    mig.create_po(z4);
    mig.create_po(z5);
    mig
}

fn two_level() -> MigNetwork {
    let mig = MigNetwork::new();
    let a = mig.create_pi();
    let b = mig.create_pi();
    let c = mig.create_pi();
    let d = mig.create_pi();
    let f1 = mig.create_maj(!a, b, c);
    let f2 = mig.create_maj(!a, b, d);
    let f3 = mig.create_maj(!a, f1, f2);
    let f4 = mig.create_maj(a, !f1, f2);
    let f5 = mig.create_maj(a, !f1, f4);
    mig.create_po(!f3);
    mig.create_po(f5);
    mig
}

/// Runs the pass and checks the invariants every run must satisfy; returns
/// the reported gain.
fn run_and_check(mig: MigNetwork, options: &InverterOptimizationOptions) -> i64 {
    let _ = env_logger::builder().is_test(true).try_init();
    let view = FanoutView::new(mig);
    let functions = output_functions(&view);
    let before = count_complemented_edges(&view);
    let stats = optimize_inverters(&view, options).unwrap();
    let after = count_complemented_edges(&view);

    assert!(stats.total_gain >= 0);
    assert_eq!(before as i64 - after as i64, stats.total_gain);
    assert_eq!(output_functions(&view), functions);
    assert_fanout_counts_consistent(&view);

    let again = optimize_inverters(&view, options).unwrap();
    assert_eq!(again.total_gain, 0);
    assert_eq!(count_complemented_edges(&view), after);
    stats.total_gain
}

#[test_case(basic, 1 ; "basic")]
#[test_case(constant_input_0, 1 ; "constant input 0")]
#[test_case(constant_input_1, 0 ; "constant input 1")]
#[test_case(output, 1 ; "output")]
#[test_case(complex, 11 - 4 ; "complex")]
#[test_case(two_level, 2 ; "two level")]
fn test_inverter_scenarios(build: fn() -> MigNetwork, expected_gain: i64) {
    assert_eq!(
        run_and_check(build(), &InverterOptimizationOptions::default()),
        expected_gain
    );
}

#[test]
fn test_complex_scenario_counts() {
    let view = FanoutView::new(complex());
    assert_eq!(count_complemented_edges(&view), 11);
    optimize_inverters(&view, &InverterOptimizationOptions::default()).unwrap();
    assert_eq!(count_complemented_edges(&view), 4);
}

#[test_case(basic ; "basic")]
#[test_case(complex ; "complex")]
#[test_case(two_level ; "two level")]
fn test_one_level_only(build: fn() -> MigNetwork) {
    run_and_check(build(), &InverterOptimizationOptions::one_level());
}

#[test]
fn test_random_networks_keep_function() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x1dea);
    for _ in 0..64 {
        let mig = MigNetwork::new();
        let shape = RandomNetworkShape {
            num_pis: 5,
            num_gates: 24,
            num_pos: 4,
            complement_probability: 0.5,
        };
        random_network(&mig, &mut rng, &shape);
        run_and_check(mig, &InverterOptimizationOptions::default());
    }
}

#[test]
fn test_arbitrary_recipes_keep_function() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let mut bytes = vec![0u8; 512];
    for _ in 0..64 {
        rng.fill_bytes(&mut bytes);
        let mut u = arbitrary::Unstructured::new(&bytes);
        let recipe: NetworkRecipe = match u.arbitrary() {
            Ok(recipe) => recipe,
            Err(_) => continue,
        };
        let mig = MigNetwork::new();
        recipe.build(&mig);
        run_and_check(mig, &InverterOptimizationOptions::default());
    }
}
