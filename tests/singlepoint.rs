use approx::{abs_diff_eq, assert_abs_diff_eq};
use nalgebra::Vector3;
use ndarray::prelude::*;
use rayon::prelude::*;
use std::sync::Arc;
use tbscc::io::{parse_xyz, Configuration};
use tbscc::param::Parametrization;
use tbscc::{Calculator, Context, MixerKind, Results, ScfError, ScfState, ScfStatus, Structure};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn structure(numbers: &[u8], positions: &[[f64; 3]]) -> Structure {
    let xyz: Vec<Vector3<f64>> = positions
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]))
        .collect();
    Structure::new(numbers.to_vec(), xyz).unwrap()
}

fn water() -> Structure {
    structure(
        &[8, 1, 1],
        &[
            [0.0, 0.0, 0.2217],
            [0.0, 1.4309, -0.8867],
            [0.0, -1.4309, -0.8867],
        ],
    )
}

fn hydrogen_molecule() -> Structure {
    structure(&[1, 1], &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.4]])
}

fn ammonia() -> Structure {
    structure(
        &[7, 1, 1, 1],
        &[
            [0.0, 0.0, 0.2141],
            [0.0, 1.7726, -0.4995],
            [1.5351, -0.8863, -0.4995],
            [-1.5351, -0.8863, -0.4995],
        ],
    )
}

fn run(calc: &Calculator, mol: &Structure) -> (ScfStatus, ScfState) {
    let mut state = ScfState::new();
    let status = calc.run(mol, &mut state).unwrap();
    (status, state)
}

#[test]
fn water_converges_with_the_valence_electron_count() {
    init();
    let calc = Calculator::gfn2();
    let mut ctx = Context::new();
    let mut results = Results::new();
    let status = calc.singlepoint(&mut ctx, &water(), &mut results).unwrap();
    assert_eq!(status, ScfStatus::Converged);

    let occ = results.occupations().unwrap();
    assert_abs_diff_eq!(occ.sum(), 8.0, epsilon = 1e-8);
    assert!(occ.iter().all(|f| *f >= 0.0 && *f <= 2.0));
    let charges = results.charges().unwrap();
    assert_abs_diff_eq!(charges.sum(), 0.0, epsilon = 1e-8);
    // oxygen is negative, the hydrogen atoms are equivalent
    assert!(charges[0] < 0.0);
    assert_abs_diff_eq!(charges[1], charges[2], epsilon = 1e-6);
    let p = results.density_matrix().unwrap();
    assert_abs_diff_eq!(p, p.t(), epsilon = 1e-10);
    assert!(results.homo_lumo_gap().unwrap() > 0.0);
}

#[test]
fn charges_sum_to_the_total_charge() {
    init();
    let calc = Calculator::gfn2();
    let cation = water().with_charge(1.0).with_multiplicity(2);
    let mut results = Results::new();
    calc.singlepoint(&mut Context::new(), &cation, &mut results)
        .unwrap();
    assert_abs_diff_eq!(results.charges().unwrap().sum(), 1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(results.occupations().unwrap().sum(), 7.0, epsilon = 1e-8);
}

#[test]
fn tighter_accuracy_gives_smaller_residual() {
    init();
    let mut calc = Calculator::gfn2();
    calc.set_accuracy(0.01).unwrap();
    let (status, state) = run(&calc, &ammonia());
    assert_eq!(status, ScfStatus::Converged);
    assert!(state.residual < 2.0e-5 * 0.01);

    let (_, loose) = run(&Calculator::gfn2(), &ammonia());
    assert!(state.iteration >= loose.iteration);
    assert_abs_diff_eq!(state.energy, loose.energy, epsilon = 1e-5);
}

#[test]
fn repeated_runs_are_identical() {
    init();
    let calc = Calculator::gfn1();
    let (_, first) = run(&calc, &water());
    let (_, second) = run(&calc, &water());
    assert_eq!(first.iteration, second.iteration);
    assert_abs_diff_eq!(first.energy, second.energy, epsilon = 1e-12);
    assert_abs_diff_eq!(first.dq_out, second.dq_out, epsilon = 1e-12);
}

#[test]
fn zero_temperature_gives_integer_occupations() {
    init();
    let mut calc = Calculator::gfn2();
    calc.set_electronic_temperature(0.0).unwrap();
    let (status, state) = run(&calc, &water());
    assert_eq!(status, ScfStatus::Converged);
    assert!(state
        .occupations
        .iter()
        .all(|f| abs_diff_eq!(*f, 0.0, epsilon = 1e-12) || abs_diff_eq!(*f, 2.0, epsilon = 1e-12)));
    assert_eq!(state.energies.entropy, 0.0);
}

#[test]
fn closed_shell_atom_converges_in_one_iteration() {
    init();
    let carbon = structure(&[6], &[[0.0, 0.0, 0.0]]);
    let (status, state) = run(&Calculator::gfn2(), &carbon);
    assert_eq!(status, ScfStatus::Converged);
    assert_eq!(state.iteration, 1);
    // degenerate p orbitals share two electrons
    assert_abs_diff_eq!(
        state.occupations,
        array![2.0, 2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0],
        epsilon = 1e-8
    );
    assert_abs_diff_eq!(state.partial_charges()[0], 0.0, epsilon = 1e-10);
}

#[test]
fn doublet_atom_converges_in_one_iteration() {
    init();
    let hydrogen = structure(&[1], &[[0.0, 0.0, 0.0]]).with_multiplicity(2);
    let (status, state) = run(&Calculator::gfn2(), &hydrogen);
    assert_eq!(status, ScfStatus::Converged);
    assert_eq!(state.iteration, 1);
    assert_abs_diff_eq!(state.occupations[0], 1.0, epsilon = 1e-12);
}

#[test]
fn odd_electron_singlet_is_rejected() {
    init();
    let hydrogen = structure(&[1], &[[0.0, 0.0, 0.0]]);
    let mut state = ScfState::new();
    let err = Calculator::gfn2().run(&hydrogen, &mut state).unwrap_err();
    assert!(matches!(err, ScfError::MalformedStructure(_)));
}

#[test]
fn hydrogen_molecule_occupies_the_bonding_orbital() {
    init();
    let mut calc = Calculator::gfn2();
    calc.set_max_iterations(50).unwrap();
    calc.set_mixer_damping(1.0).unwrap();
    let (status, state) = run(&calc, &hydrogen_molecule());
    assert_eq!(status, ScfStatus::Converged);
    assert!(state.orbital_energies[0] < state.orbital_energies[1]);
    assert_abs_diff_eq!(state.occupations[0], 2.0, epsilon = 1e-8);
    assert_abs_diff_eq!(state.occupations[1], 0.0, epsilon = 1e-8);
    // bonding combination has equal signs on both atoms
    let c = state.orbitals.column(0);
    assert!(c[0] * c[1] > 0.0);
    assert_abs_diff_eq!(state.partial_charges(), array![0.0, 0.0], epsilon = 1e-8);
}

#[test]
fn iteration_limit_still_writes_results() {
    init();
    let mut calc = Calculator::gfn2();
    calc.set_max_iterations(1).unwrap();
    let mut ctx = Context::new();
    let mut results = Results::new();
    let status = calc.singlepoint(&mut ctx, &water(), &mut results).unwrap();
    assert_eq!(status, ScfStatus::MaxIterationsReached);
    assert_eq!(results.converged(), Some(false));
    assert_eq!(results.iterations(), Some(1));
    assert!(results.energy().is_some());
    assert_eq!(results.charges().unwrap().len(), 3);
    assert_eq!(ctx.warnings().count(), 1);
    assert!(!ctx.has_errors());
}

#[test]
fn missing_element_fails_before_the_first_iteration() {
    init();
    let iron = structure(&[26, 8], &[[0.0, 0.0, 0.0], [0.0, 0.0, 3.0]]);
    let calc = Calculator::gfn2();
    let mut state = ScfState::new();
    let err = calc.run(&iron, &mut state).unwrap_err();
    assert!(matches!(err, ScfError::MalformedStructure(_)));
    assert_eq!(state.iteration, 0);

    let mut ctx = Context::new();
    let mut results = Results::new();
    assert!(calc.singlepoint(&mut ctx, &iron, &mut results).is_err());
    assert!(results.is_empty());
    assert!(ctx.has_errors());
}

#[test]
fn broyden_mixer_reaches_the_linear_solution() {
    init();
    let linear = Calculator::gfn2();
    let mut broyden = Calculator::gfn2();
    broyden.set_mixer(MixerKind::Broyden { memory: 20 }).unwrap();
    let (status_lin, lin) = run(&linear, &water());
    let (status_bro, bro) = run(&broyden, &water());
    assert_eq!(status_lin, ScfStatus::Converged);
    assert_eq!(status_bro, ScfStatus::Converged);
    assert_abs_diff_eq!(lin.energy, bro.energy, epsilon = 1e-5);
    assert_abs_diff_eq!(lin.partial_charges(), bro.partial_charges(), epsilon = 1e-3);
}

#[test]
fn calculator_is_shared_between_threads() {
    init();
    let calc = Arc::new(Calculator::gfn2());
    let molecules: Vec<Structure> = vec![water(), ammonia(), hydrogen_molecule()];
    let serial: Vec<f64> = molecules.iter().map(|mol| run(&calc, mol).1.energy).collect();
    let parallel: Vec<f64> = molecules
        .par_iter()
        .map(|mol| {
            let mut results = Results::new();
            calc.singlepoint(&mut Context::new(), mol, &mut results)
                .unwrap();
            results.energy().unwrap()
        })
        .collect();
    assert_abs_diff_eq!(
        Array1::from(serial),
        Array1::from(parallel),
        epsilon = 1e-12
    );
}

#[test]
fn records_reproduce_the_builtin_parametrization() {
    init();
    let records = Parametrization::gfn2_records();
    let ron = records.to_ron_string().unwrap();
    let parsed = tbscc::param::ParamRecords::from_ron_str(&ron).unwrap();
    let calc = Calculator::from_records(parsed).unwrap();
    let (_, custom) = run(&calc, &water());
    let (_, builtin) = run(&Calculator::gfn2(), &water());
    assert_abs_diff_eq!(custom.energy, builtin.energy, epsilon = 1e-10);
}

#[test]
fn configuration_drives_a_singlepoint() {
    init();
    let config = Configuration::from_toml(
        "method = \"gfn1\"\n[mol]\ncharge = 0.0\n[scf]\naccuracy = 0.1\nmixer = \"broyden\"\nbroyden_memory = 10\n",
    )
    .unwrap();
    let calc = config.calculator(config.parametrization().unwrap()).unwrap();
    assert_eq!(calc.mixer(), MixerKind::Broyden { memory: 10 });
    let mol = parse_xyz(
        "3\nwater\nO 0.000000 0.000000 0.117300\nH 0.000000 0.757200 -0.469200\nH 0.000000 -0.757200 -0.469200\n",
    )
    .unwrap();
    let mut results = Results::new();
    let status = calc.singlepoint(&mut Context::new(), &mol, &mut results).unwrap();
    assert_eq!(status, ScfStatus::Converged);
    assert!(results.energy().unwrap() < 0.0);
}

#[test]
fn full_damping_without_history_is_plain_replacement() {
    init();
    let mut linear = Calculator::gfn2();
    linear.set_mixer_damping(1.0).unwrap();
    linear.set_max_iterations(10).unwrap();
    let mut broyden = linear.clone();
    broyden.set_mixer(MixerKind::Broyden { memory: 1 }).unwrap();
    let (status_lin, lin) = run(&linear, &water());
    let (status_bro, bro) = run(&broyden, &water());
    assert_eq!(status_lin, status_bro);
    assert_eq!(lin.iteration, bro.iteration);
    assert_abs_diff_eq!(lin.energy, bro.energy, epsilon = 1e-12);
    // the input of the next iteration is the output of the last one
    assert_abs_diff_eq!(lin.dq, lin.dq_out, epsilon = 1e-14);
}

#[test]
fn tight_accuracy_at_finite_temperature_finds_the_occupation() {
    init();
    let mut calc = Calculator::gfn2();
    calc.set_accuracy(1e-8).unwrap();
    calc.set_electronic_temperature(0.01).unwrap();
    let mut ctx = Context::new();
    let mut results = Results::new();
    // the cycle may stop at the iteration limit, the occupation itself must not fail
    let status = calc.singlepoint(&mut ctx, &water(), &mut results).unwrap();
    assert!(matches!(
        status,
        ScfStatus::Converged | ScfStatus::MaxIterationsReached
    ));
    assert!(!ctx.has_errors());
    assert_abs_diff_eq!(results.occupations().unwrap().sum(), 8.0, epsilon = 1e-10);
}
