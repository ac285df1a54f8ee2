use serde::{Deserialize, Serialize};

/// Rule that combines the chemical hardness of two atoms in the Coulomb kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardnessAveraging {
    Arithmetic,
    Harmonic,
}

/// A shell of valence orbitals as it appears in a parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellRecord {
    /// angular momentum, 0 (s) or 1 (p)
    pub l: u8,
    /// principal quantum number, selects the Gaussian expansion of the Slater function
    pub n: u8,
    /// Slater exponent in 1/Bohr
    pub exponent: f64,
    /// number of electrons in the shell of the neutral atom
    pub occupation: f64,
    /// on-site energy in eV
    pub self_energy: f64,
}

/// Per-element parameters as they appear in a parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub symbol: String,
    pub number: u8,
    pub shells: Vec<ShellRecord>,
    /// chemical hardness (Hubbard parameter) in Hartree
    pub hardness: f64,
    /// derivative of the Hubbard parameter, third-order term in Hartree
    #[serde(default)]
    pub hubbard_derivative: f64,
    /// Pauling electronegativity
    pub electronegativity: f64,
    /// exponent of the repulsion potential
    pub rep_alpha: f64,
    /// effective nuclear charge of the repulsion potential
    pub rep_zeff: f64,
    /// C6 coefficient in Hartree * Bohr^6
    #[serde(default)]
    pub c6: f64,
    /// van der Waals radius in Bohr
    #[serde(default)]
    pub vdw_radius: f64,
}

/// Scaling factor of the Hamiltonian elements between two elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub elements: (u8, u8),
    pub scaling: f64,
}

/// Global settings of the tight-binding model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub k_ss: f64,
    pub k_sp: f64,
    pub k_pp: f64,
    /// electronegativity factor of the off-diagonal Hamiltonian
    pub k_en: f64,
    /// exponent of the Klopman-Ohno kernel
    pub gamma_exponent: f64,
    pub averaging: HardnessAveraging,
    pub third_order: bool,
    /// distance exponent of the repulsion potential
    pub rep_kexp: f64,
    pub disp_s6: f64,
    pub disp_a1: f64,
    /// in Bohr
    pub disp_a2: f64,
}

/// Complete set of parameter records from which a
/// [Parametrization](crate::param::Parametrization) can be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamRecords {
    pub name: String,
    pub model: ModelRecord,
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub pairs: Vec<PairRecord>,
}

impl ParamRecords {
    /// Read parameter records in the RON format.
    pub fn from_ron_str(input: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(input)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
