pub use fermi_occupation::{fermi_occupation, Occupation};
pub use hamiltonians::HamiltonianBuilder;
pub use helpers::*;
pub use mixer::{BroydenMixer, LinearMixer, Mixer, MixerKind};
pub use scc_routine::{EnergyTerms, ScfDriver, ScfSettings, ScfState, ScfStatus};
pub use solver::{solve_generalized, EigenSolver, LowdinSolver};

pub mod energies;
pub mod fermi_occupation;
pub mod gamma_approximation;
pub mod h0_and_s;
pub mod hamiltonians;
mod helpers;
mod logging;
pub mod mixer;
pub mod mulliken;
pub mod scc_routine;
pub mod solver;
