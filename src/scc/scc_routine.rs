use crate::defaults;
use crate::error::ScfError;
use crate::scc::energies::{get_electronic_energy, guess_density_matrix, guess_entropy_energy};
use crate::scc::fermi_occupation::{fermi_occupation, spin_channels, Occupation};
use crate::scc::hamiltonians::HamiltonianBuilder;
use crate::scc::helpers::{density_matrix, get_electron_count};
use crate::scc::logging::*;
use crate::scc::mixer::Mixer;
use crate::scc::mulliken::mulliken;
use crate::scc::solver::EigenSolver;
use crate::utils::Timer;
use log::{error, log_enabled, warn, Level};
use ndarray::prelude::*;

/// Stage of a self-consistent charge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScfStatus {
    Initialized,
    Iterating,
    Converged,
    MaxIterationsReached,
    Failed,
}

/// Contributions to the total energy in Hartree.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyTerms {
    /// band structure energy and the charge dependent terms
    pub electronic: f64,
    /// -T S of the electrons
    pub entropy: f64,
    pub repulsion: f64,
    pub dispersion: f64,
}

impl EnergyTerms {
    pub fn total(&self) -> f64 {
        self.electronic + self.entropy + self.repulsion + self.dispersion
    }
}

/// Mutable state of one self-consistent charge run. A state belongs to exactly one run.
#[derive(Debug, Clone)]
pub struct ScfState {
    pub status: ScfStatus,
    /// number of completed iterations, it is never decreased during a run
    pub iteration: usize,
    /// excess populations (electrons relative to the neutral atoms) that enter the next
    /// iteration
    pub dq: Array1<f64>,
    /// excess populations of the current density matrix
    pub dq_out: Array1<f64>,
    pub density_matrix: Array2<f64>,
    /// total energy of the current iteration
    pub energy: f64,
    pub energies: EnergyTerms,
    /// norm of the population residual of the current iteration
    pub residual: f64,
    pub orbital_energies: Array1<f64>,
    pub orbitals: Array2<f64>,
    pub occupations: Array1<f64>,
}

impl Default for ScfState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScfState {
    pub fn new() -> Self {
        Self {
            status: ScfStatus::Initialized,
            iteration: 0,
            dq: Array1::zeros(0),
            dq_out: Array1::zeros(0),
            density_matrix: Array2::zeros((0, 0)),
            energy: 0.0,
            energies: EnergyTerms::default(),
            residual: f64::INFINITY,
            orbital_energies: Array1::zeros(0),
            orbitals: Array2::zeros((0, 0)),
            occupations: Array1::zeros(0),
        }
    }

    /// Atomic partial charges of the current density, positive for a loss of electrons.
    pub fn partial_charges(&self) -> Array1<f64> {
        self.dq_out.mapv(|x| -x)
    }

    pub fn is_converged(&self) -> bool {
        self.status == ScfStatus::Converged
    }
}

/// Numerical settings of the SCC cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScfSettings {
    pub max_iterations: usize,
    /// threshold of the energy change between two iterations
    pub energy_conv: f64,
    /// threshold of the norm of the population residual
    pub charge_conv: f64,
    /// accuracy of the electron count when the chemical potential is determined
    pub fermi_conv: f64,
    /// electronic temperature in Hartree
    pub kt: f64,
    pub damping: f64,
}

impl ScfSettings {
    /// All thresholds are scaled with `accuracy`; smaller values give tighter convergence.
    pub fn new(accuracy: f64, max_iterations: usize, damping: f64, kt: f64) -> Self {
        Self {
            max_iterations,
            energy_conv: defaults::SCF_ENERGY_CONV * accuracy,
            charge_conv: defaults::SCF_CHARGE_CONV * accuracy,
            fermi_conv: defaults::FERMI_ELEC_CONV * accuracy,
            kt,
            damping,
        }
    }
}

impl Default for ScfSettings {
    fn default() -> Self {
        Self::new(
            defaults::ACCURACY,
            defaults::MAX_ITER,
            defaults::MIXER_DAMPING,
            defaults::TEMPERATURE * crate::constants::K_BOLTZMANN,
        )
    }
}

/// Drives the self-consistent charge cycle: build H from the populations, diagonalize,
/// occupy the orbitals, compute the new populations by Mulliken analysis and mix them
/// with the previous ones until the energy and the populations are stationary.
pub struct ScfDriver<'a, E: EigenSolver, M: Mixer> {
    builder: &'a HamiltonianBuilder,
    solver: E,
    mixer: M,
    settings: ScfSettings,
    charge: f64,
    n_elec: f64,
    n_unpaired: usize,
    repulsion: f64,
    dispersion: f64,
}

impl<'a, E: EigenSolver, M: Mixer> ScfDriver<'a, E, M> {
    /// Set up the cycle for a structure with the given total charge and number of unpaired
    /// electrons. Fails if the electrons cannot be distributed over the orbitals.
    pub fn new(
        builder: &'a HamiltonianBuilder,
        solver: E,
        mixer: M,
        settings: ScfSettings,
        charge: f64,
        n_unpaired: usize,
    ) -> Result<Self, ScfError> {
        let n_elec: f64 = get_electron_count(
            builder.reference_populations(),
            charge,
            n_unpaired,
            builder.n_orbs(),
        )?;
        Ok(Self {
            builder,
            solver,
            mixer,
            settings,
            charge,
            n_elec,
            n_unpaired,
            repulsion: 0.0,
            dispersion: 0.0,
        })
    }

    /// Geometry dependent energies that are added to the electronic energy.
    pub fn with_nuclear_energies(mut self, repulsion: f64, dispersion: f64) -> Self {
        self.repulsion = repulsion;
        self.dispersion = dispersion;
        self
    }

    pub fn n_electrons(&self) -> f64 {
        self.n_elec
    }

    pub fn settings(&self) -> &ScfSettings {
        &self.settings
    }

    /// Initial guess: the total charge is distributed evenly over all atoms and the
    /// density matrix is built from the scaled occupations of the neutral atoms. The
    /// energy of this guess serves as the reference for the first energy change.
    pub fn initialize(&mut self, state: &mut ScfState) {
        let builder: &HamiltonianBuilder = self.builder;
        let n_atoms: usize = builder.n_atoms();
        let n_orbs: usize = builder.n_orbs();
        let dq: Array1<f64> = Array1::from_elem(n_atoms, -self.charge / n_atoms as f64);
        let p0: Array2<f64> = guess_density_matrix(
            builder.reference_occupations(),
            builder.reference_populations(),
            dq.view(),
            builder.atom_n_orbs(),
        );
        let (n_alpha, n_beta) = spin_channels(self.n_elec, self.n_unpaired);
        let energies = EnergyTerms {
            electronic: get_electronic_energy(
                p0.view(),
                builder.h0(),
                dq.view(),
                builder.gamma(),
                builder.hubbard_derivatives(),
            ),
            entropy: guess_entropy_energy(p0.view(), n_alpha, n_beta, self.settings.kt),
            repulsion: self.repulsion,
            dispersion: self.dispersion,
        };

        self.mixer.reset();
        *state = ScfState {
            status: ScfStatus::Initialized,
            iteration: 0,
            dq_out: dq.clone(),
            dq,
            density_matrix: p0,
            energy: energies.total(),
            energies,
            residual: f64::INFINITY,
            orbital_energies: Array1::zeros(n_orbs),
            orbitals: Array2::zeros((n_orbs, n_orbs)),
            occupations: Array1::zeros(n_orbs),
        };
    }

    /// Perform one iteration and return whether the convergence criteria are met.
    pub fn iterate(&mut self, state: &mut ScfState) -> Result<bool, ScfError> {
        let builder: &HamiltonianBuilder = self.builder;
        let h: Array2<f64> = builder.build(state.dq.view());
        let (orbe, orbs): (Array1<f64>, Array2<f64>) = self.solver.solve(h.view())?;

        // compute the fermi orbital occupation
        let occupation: Occupation = fermi_occupation(
            orbe.view(),
            self.n_elec,
            self.n_unpaired,
            self.settings.kt,
            self.settings.fermi_conv,
        )?;

        // calculate the density matrix and the new Mulliken populations
        let p: Array2<f64> = density_matrix(orbs.view(), occupation.occupations.view());
        let q: Array1<f64> = mulliken(p.view(), builder.overlap(), builder.atom_n_orbs());
        let dq_out: Array1<f64> = &q - &builder.reference_populations();

        let energies = EnergyTerms {
            electronic: get_electronic_energy(
                p.view(),
                builder.h0(),
                dq_out.view(),
                builder.gamma(),
                builder.hubbard_derivatives(),
            ),
            entropy: occupation.entropy_energy,
            repulsion: self.repulsion,
            dispersion: self.dispersion,
        };
        let energy: f64 = energies.total();
        if !energy.is_finite() || dq_out.iter().any(|x| !x.is_finite()) {
            return Err(ScfError::InternalNumericalFailure(format!(
                "non-finite energy or populations in iteration {}",
                state.iteration + 1
            )));
        }

        let (dq_next, residual): (Array1<f64>, f64) =
            self.mixer
                .mix(state.dq.view(), dq_out.view(), self.settings.damping);
        if !residual.is_finite() || dq_next.iter().any(|x| !x.is_finite()) {
            return Err(ScfError::InternalNumericalFailure(format!(
                "non-finite mixed populations in iteration {}",
                state.iteration + 1
            )));
        }

        let energy_diff: f64 = energy - state.energy;
        state.iteration += 1;
        state.dq = dq_next;
        state.dq_out = dq_out;
        state.density_matrix = p;
        state.energy = energy;
        state.energies = energies;
        state.residual = residual;
        state.orbital_energies = orbe;
        state.orbitals = orbs;
        state.occupations = occupation.occupations;

        if log_enabled!(Level::Info) {
            print_energies_at_iteration(state.iteration, energy, energy_diff, residual);
        }
        if log_enabled!(Level::Trace) {
            print_orbital_information(state.orbital_energies.view(), state.occupations.view());
        }
        if log_enabled!(Level::Debug) {
            print_charges(state.partial_charges().view(), state.dq_out.view());
        }

        Ok(energy_diff.abs() < self.settings.energy_conv && residual < self.settings.charge_conv)
    }

    /// Run the cycle from the initial guess until convergence or until the maximal number
    /// of iterations is reached. The state is reinitialized at the start of the run.
    pub fn run(&mut self, state: &mut ScfState) -> Result<ScfStatus, ScfError> {
        let timer: Timer = Timer::start();
        self.initialize(state);

        if log_enabled!(Level::Info) {
            print_scc_init(
                self.settings.max_iterations,
                self.settings.kt,
                self.repulsion,
                self.dispersion,
            );
        }

        while state.iteration < self.settings.max_iterations {
            state.status = ScfStatus::Iterating;
            match self.iterate(state) {
                Ok(true) => {
                    state.status = ScfStatus::Converged;
                    break;
                }
                Ok(false) => {}
                Err(err) => {
                    state.status = ScfStatus::Failed;
                    error!("SCC-Routine failed in iteration {}: {}", state.iteration + 1, err);
                    return Err(err);
                }
            }
        }
        if state.status != ScfStatus::Converged {
            state.status = ScfStatus::MaxIterationsReached;
            warn!(
                "SCC not converged after {} iterations, residual {:.3e}",
                state.iteration, state.residual
            );
        }

        if log_enabled!(Level::Info) {
            print_scc_end(
                &timer,
                state.is_converged(),
                state.iteration,
                state.energy,
                state.orbital_energies.view(),
                state.occupations.view(),
            );
        }
        Ok(state.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc::mixer::LinearMixer;
    use crate::scc::solver::LowdinSolver;
    use approx::assert_relative_eq;

    /// Two-site model with one orbital per site and a strong Coulomb interaction
    fn two_site_model(epsilon: (f64, f64)) -> HamiltonianBuilder {
        HamiltonianBuilder::from_parts(
            array![[epsilon.0, -0.2], [-0.2, epsilon.1]],
            Array2::eye(2),
            array![[0.5, 0.2], [0.2, 0.5]],
            vec![1, 1],
            array![1.0, 1.0],
            None,
        )
        .unwrap()
    }

    fn driver(
        builder: &HamiltonianBuilder,
        settings: ScfSettings,
    ) -> ScfDriver<LowdinSolver, LinearMixer> {
        let solver = LowdinSolver::new(builder.overlap()).unwrap();
        ScfDriver::new(builder, solver, LinearMixer, settings, 0.0, 0).unwrap()
    }

    #[test]
    fn symmetric_model_keeps_neutral_sites() {
        let builder = two_site_model((-0.5, -0.5));
        let mut state = ScfState::new();
        let status = driver(&builder, ScfSettings::new(1.0, 30, 0.4, 0.0))
            .run(&mut state)
            .unwrap();
        assert_eq!(status, ScfStatus::Converged);
        // the first iteration changes the energy with respect to the guess
        assert_eq!(state.iteration, 2);
        assert_relative_eq!(state.dq_out, array![0.0, 0.0], epsilon = 1e-12);
        // bonding orbital doubly occupied: E = 2 (eps + t)
        assert_relative_eq!(state.energy, 2.0 * (-0.5 - 0.2), epsilon = 1e-12);
    }

    #[test]
    fn coulomb_interaction_reduces_the_polarization() {
        let builder = two_site_model((-0.6, -0.4));
        let mut state = ScfState::new();
        let status = driver(&builder, ScfSettings::new(0.01, 200, 0.4, 0.0))
            .run(&mut state)
            .unwrap();
        assert_eq!(status, ScfStatus::Converged);
        // the site with the lower on-site energy gains electrons
        assert!(state.dq_out[0] > 0.0);
        assert_relative_eq!(state.dq_out.sum(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(state.occupations.sum(), 2.0, epsilon = 1e-12);
        // the self-consistent polarization is smaller than the one of the bare H0
        let mut bare = ScfState::new();
        let mut bare_driver = driver(&builder, ScfSettings::new(1.0, 1, 1.0, 0.0));
        bare_driver.run(&mut bare).unwrap();
        assert!(state.dq_out[0] < bare.dq_out[0]);
    }

    #[test]
    fn iteration_limit_is_a_status() {
        let builder = two_site_model((-0.6, -0.4));
        let mut state = ScfState::new();
        let status = driver(&builder, ScfSettings::new(1e-6, 1, 0.1, 0.0))
            .run(&mut state)
            .unwrap();
        assert_eq!(status, ScfStatus::MaxIterationsReached);
        assert_eq!(state.status, ScfStatus::MaxIterationsReached);
        assert_eq!(state.iteration, 1);
    }

    struct BrokenSolver;

    impl EigenSolver for BrokenSolver {
        fn solve(&self, h: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>), ScfError> {
            let n: usize = h.nrows();
            Ok((Array1::from_elem(n, f64::NAN), Array2::eye(n)))
        }
    }

    #[test]
    fn numerical_failures_stop_the_run() {
        let builder = two_site_model((-0.5, -0.5));
        let mut state = ScfState::new();
        let mut scc = ScfDriver::new(
            &builder,
            BrokenSolver,
            LinearMixer,
            ScfSettings::default(),
            0.0,
            0,
        )
        .unwrap();
        let result = scc.run(&mut state);
        assert!(matches!(result, Err(ScfError::InternalNumericalFailure(_))));
        assert_eq!(state.status, ScfStatus::Failed);
        assert_eq!(state.iteration, 0);
    }

    #[test]
    fn inconsistent_electron_count_is_rejected() {
        let builder = two_site_model((-0.5, -0.5));
        let solver = LowdinSolver::new(builder.overlap()).unwrap();
        // two electrons cannot form a doublet
        let result = ScfDriver::new(&builder, solver, LinearMixer, ScfSettings::default(), 0.0, 1);
        assert!(matches!(result, Err(ScfError::MalformedStructure(_))));
    }
}
