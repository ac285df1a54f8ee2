// MOLECULE SPECIFICATION
// charge of the molecule in a.u.
pub const CHARGE: f64 = 0.0;
// spin multiplicity 2S + 1
pub const MULTIPLICITY: u8 = 1;
// config file
pub const CONFIG_FILE_NAME: &str = "tbscc.toml";
// tight-binding parametrization used when nothing is specified
pub const METHOD: &str = "gfn2";

// SCF ITERATION
// numerical accuracy, all convergence thresholds are scaled by this value
pub const ACCURACY: f64 = 1.0;
// stop SCF calculation after maxiter iterations
pub const MAX_ITER: usize = 250;
// convergence thresholds for an accuracy of 1.0
pub const SCF_ENERGY_CONV: f64 = 1.0e-6;
pub const SCF_CHARGE_CONV: f64 = 2.0e-5;
// tolerance on the electron count in the search for the chemical potential
pub const FERMI_ELEC_CONV: f64 = 1.0e-10;
// max. number of steps of the chemical potential search
pub const FERMI_MAX_ITER: usize = 200;
// occupation of orbitals is smeared out by Fermi
// distribution with temperature T in Kelvin
pub const TEMPERATURE: f64 = 300.0;
// orbitals that are closer in energy are treated as degenerate at T = 0
pub const DEGENERACY_TOL: f64 = 1.0e-8;
// eigenvalues of the overlap matrix below this value indicate a linear dependent basis
pub const OVERLAP_EIGENVALUE_TOL: f64 = 1.0e-10;

// damping parameter of the charge mixer
pub const MIXER_DAMPING: f64 = 0.4;
// number of stored iterations of the Broyden mixer
pub const BROYDEN_MEMORY: usize = 250;

// Broyden Mixer
pub const BROYDEN_OMEGA0: f64 = 0.01;
pub const BROYDEN_MIN_WEIGHT: f64 = 1.0;
pub const BROYDEN_MAX_WEIGHT: f64 = 1.0e5;
pub const BROYDEN_WEIGHT_FACTOR: f64 = 1.0e-2;
