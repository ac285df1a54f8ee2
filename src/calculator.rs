use crate::constants::K_BOLTZMANN;
use crate::defaults;
use crate::error::ScfError;
use crate::param::{ParamRecords, Parametrization};
use crate::scc::energies::{get_dispersion_energy, get_repulsive_energy};
use crate::scc::{
    get_homo_lumo_gap, HamiltonianBuilder, LowdinSolver, MixerKind, ScfDriver, ScfSettings,
    ScfState, ScfStatus,
};
use crate::types::{keys, Context, Results, Structure};
use log::debug;
use std::sync::Arc;

/// Single point calculator of the self-consistent charge tight-binding model.
///
/// The calculator holds a shared, read-only parametrization and the numerical knobs of
/// the SCC cycle. A run does not change the calculator, so one instance can be used for
/// several structures, also from different threads.
#[derive(Debug, Clone)]
pub struct Calculator {
    param: Arc<Parametrization>,
    accuracy: f64,
    max_iterations: usize,
    mixer_damping: f64,
    // in Hartree
    electronic_temperature: f64,
    mixer: MixerKind,
}

impl Calculator {
    pub fn new(param: Arc<Parametrization>) -> Self {
        Self {
            param,
            accuracy: defaults::ACCURACY,
            max_iterations: defaults::MAX_ITER,
            mixer_damping: defaults::MIXER_DAMPING,
            electronic_temperature: defaults::TEMPERATURE * K_BOLTZMANN,
            mixer: MixerKind::default(),
        }
    }

    pub fn gfn1() -> Self {
        Self::new(Parametrization::gfn1())
    }

    pub fn gfn2() -> Self {
        Self::new(Parametrization::gfn2())
    }

    pub fn ipea1() -> Self {
        Self::new(Parametrization::ipea1())
    }

    /// Calculator for user supplied parameters.
    pub fn from_records(records: ParamRecords) -> Result<Self, ScfError> {
        Ok(Self::new(Arc::new(Parametrization::from_records(records)?)))
    }

    pub fn parametrization(&self) -> &Arc<Parametrization> {
        &self.param
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn mixer_damping(&self) -> f64 {
        self.mixer_damping
    }

    /// Electronic temperature kT in Hartree.
    pub fn electronic_temperature(&self) -> f64 {
        self.electronic_temperature
    }

    pub fn mixer(&self) -> MixerKind {
        self.mixer
    }

    /// Scaling of all convergence thresholds, has to be positive.
    pub fn set_accuracy(&mut self, accuracy: f64) -> Result<(), ScfError> {
        if !(accuracy > 0.0) || !accuracy.is_finite() {
            return Err(ScfError::InvalidConfiguration(format!(
                "accuracy has to be positive, got {}",
                accuracy
            )));
        }
        self.accuracy = accuracy;
        Ok(())
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<(), ScfError> {
        if max_iterations == 0 {
            return Err(ScfError::InvalidConfiguration(String::from(
                "at least one SCC iteration is required",
            )));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }

    /// Fraction of the new populations that enters the next iteration, in (0, 1].
    pub fn set_mixer_damping(&mut self, damping: f64) -> Result<(), ScfError> {
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(ScfError::InvalidConfiguration(format!(
                "mixer damping has to be in (0, 1], got {}",
                damping
            )));
        }
        self.mixer_damping = damping;
        Ok(())
    }

    /// Electronic temperature kT in Hartree, zero gives integer occupations.
    pub fn set_electronic_temperature(&mut self, kt: f64) -> Result<(), ScfError> {
        if !(kt >= 0.0) || !kt.is_finite() {
            return Err(ScfError::InvalidConfiguration(format!(
                "electronic temperature has to be non-negative, got {}",
                kt
            )));
        }
        self.electronic_temperature = kt;
        Ok(())
    }

    pub fn set_mixer(&mut self, mixer: MixerKind) -> Result<(), ScfError> {
        if let MixerKind::Broyden { memory: 0 } = mixer {
            return Err(ScfError::InvalidConfiguration(String::from(
                "the Broyden mixer needs a memory of at least one iteration",
            )));
        }
        self.mixer = mixer;
        Ok(())
    }

    pub fn settings(&self) -> ScfSettings {
        ScfSettings::new(
            self.accuracy,
            self.max_iterations,
            self.mixer_damping,
            self.electronic_temperature,
        )
    }

    /// Run the SCC cycle for `mol` with a caller provided state. The state is
    /// reinitialized; after the run it holds the last iteration, also if the cycle
    /// did not converge.
    pub fn run(&self, mol: &Structure, state: &mut ScfState) -> Result<ScfStatus, ScfError> {
        *state = ScfState::new();
        let n_unpaired: usize = mol.n_unpaired()?;
        let builder: HamiltonianBuilder = HamiltonianBuilder::new(mol, &self.param)?;
        let solver: LowdinSolver = LowdinSolver::new(builder.overlap())?;
        let repulsion: f64 = get_repulsive_energy(mol, &self.param)?;
        let dispersion: f64 = get_dispersion_energy(mol, &self.param)?;
        debug!(
            "{} atoms, {} orbitals, {} parameters",
            builder.n_atoms(),
            builder.n_orbs(),
            self.param.name()
        );
        let mut driver = ScfDriver::new(
            &builder,
            solver,
            self.mixer.build(),
            self.settings(),
            mol.charge(),
            n_unpaired,
        )?
        .with_nuclear_energies(repulsion, dispersion);
        driver.run(state)
    }

    /// Single point calculation. On success the results of the last iteration are written
    /// to `results` and the final status (converged or not) is returned. Errors are
    /// reported through `ctx` as well; `results` is not touched in that case.
    pub fn singlepoint(
        &self,
        ctx: &mut Context,
        mol: &Structure,
        results: &mut Results,
    ) -> Result<ScfStatus, ScfError> {
        let mut state: ScfState = ScfState::new();
        let status: ScfStatus = match self.run(mol, &mut state) {
            Ok(status) => status,
            Err(err) => {
                ctx.error(format!("single point calculation failed: {}", err));
                return Err(err);
            }
        };
        if status == ScfStatus::MaxIterationsReached {
            ctx.warning(format!(
                "SCC did not converge in {} iterations",
                state.iteration
            ));
        }

        results.set(keys::ENERGY, state.energy);
        results.set(
            keys::ELECTRONIC_ENERGY,
            state.energies.electronic + state.energies.entropy,
        );
        results.set(keys::REPULSION_ENERGY, state.energies.repulsion);
        results.set(keys::DISPERSION_ENERGY, state.energies.dispersion);
        if let Some(gap) =
            get_homo_lumo_gap(state.orbital_energies.view(), state.occupations.view())
        {
            results.set(keys::HOMO_LUMO_GAP, gap);
        } else {
            results.take(keys::HOMO_LUMO_GAP);
        }
        results.set(keys::CHARGES, state.partial_charges());
        results.set(keys::ITERATIONS, state.iteration);
        results.set(keys::CONVERGED, state.is_converged());
        results.set(keys::ORBITAL_ENERGIES, state.orbital_energies);
        results.set(keys::ORBITAL_OCCUPATIONS, state.occupations);
        results.set(keys::DENSITY_MATRIX, state.density_matrix);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{ammonia, hydrogen_atom, water};
    use nalgebra::Vector3;

    #[test]
    fn setters_validate_their_input() {
        let mut calc = Calculator::gfn2();
        assert!(calc.set_accuracy(0.0).is_err());
        assert!(calc.set_accuracy(f64::NAN).is_err());
        assert!(calc.set_max_iterations(0).is_err());
        assert!(calc.set_mixer_damping(0.0).is_err());
        assert!(calc.set_mixer_damping(1.5).is_err());
        assert!(calc.set_electronic_temperature(-1e-3).is_err());
        assert!(calc.set_mixer(MixerKind::Broyden { memory: 0 }).is_err());
        // rejected values leave the knobs unchanged
        assert_eq!(calc.accuracy(), defaults::ACCURACY);
        assert_eq!(calc.mixer_damping(), defaults::MIXER_DAMPING);

        calc.set_accuracy(0.1).unwrap();
        calc.set_mixer_damping(1.0).unwrap();
        calc.set_electronic_temperature(0.0).unwrap();
        assert_eq!(calc.accuracy(), 0.1);
        assert_eq!(calc.mixer_damping(), 1.0);
        assert_eq!(calc.electronic_temperature(), 0.0);
    }

    #[test]
    fn calculator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Calculator>();
    }

    #[test]
    fn singlepoint_writes_results() {
        let calc = Calculator::gfn2();
        let mut ctx = Context::new();
        let mut results = Results::new();
        let status = calc.singlepoint(&mut ctx, &water(), &mut results).unwrap();
        assert_eq!(status, ScfStatus::Converged);
        assert_eq!(results.converged(), Some(true));
        assert_eq!(results.charges().unwrap().len(), 3);
        assert_eq!(results.orbital_energies().unwrap().len(), 6);
        assert!(results.contains_key(keys::HOMO_LUMO_GAP));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn run_reuses_the_state() {
        let calc = Calculator::gfn1();
        let mut state = ScfState::new();
        assert_eq!(calc.run(&ammonia(), &mut state).unwrap(), ScfStatus::Converged);
        assert_eq!(state.partial_charges().len(), 4);
        // a second run starts from a fresh state
        assert_eq!(calc.run(&hydrogen_atom(), &mut state).unwrap(), ScfStatus::Converged);
        assert_eq!(state.iteration, 1);
        assert_eq!(state.orbital_energies.len(), 1);
    }

    #[test]
    fn reused_results_drop_a_missing_gap() {
        let calc = Calculator::gfn1();
        let mut ctx = Context::new();
        let mut results = Results::new();
        calc.singlepoint(&mut ctx, &water(), &mut results).unwrap();
        assert!(results.homo_lumo_gap().is_some());
        // a single occupied orbital has no LUMO
        calc.singlepoint(&mut ctx, &hydrogen_atom(), &mut results).unwrap();
        assert_eq!(results.orbital_energies().unwrap().len(), 1);
        assert!(!results.contains_key(keys::HOMO_LUMO_GAP));
    }

    #[test]
    fn coincident_atoms_give_a_singular_overlap() {
        let calc = Calculator::gfn2();
        let mut ctx = Context::new();
        let mut results = Results::new();
        let mol = Structure::new(vec![1, 1], vec![Vector3::zeros(), Vector3::zeros()]).unwrap();
        let result = calc.singlepoint(&mut ctx, &mol, &mut results);
        assert!(matches!(result, Err(ScfError::SingularOverlap { .. })));
        assert!(results.is_empty());
        assert!(ctx.has_errors());
    }

    #[test]
    fn zero_multiplicity_fails_the_run() {
        let calc = Calculator::gfn2();
        let mut ctx = Context::new();
        let mut results = Results::new();
        let mol = water().with_multiplicity(0);
        let result = calc.singlepoint(&mut ctx, &mol, &mut results);
        assert!(matches!(result, Err(ScfError::MalformedStructure(_))));
        assert!(results.is_empty());
        assert!(ctx.has_errors());
    }
}
