mod elements;
mod records;

pub use records::{
    ElementRecord, HardnessAveraging, ModelRecord, PairRecord, ParamRecords, ShellRecord,
};

use crate::constants::EV_TO_HARTREE;
use crate::error::ScfError;
use elements::builtin_elements;
use hashbrown::HashMap;
use std::sync::{Arc, OnceLock};

/// Global settings of the tight-binding model.
pub type ModelSettings = ModelRecord;

/// A shell of atomic orbitals with all energies converted to Hartree.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellParams {
    pub l: u8,
    pub n: u8,
    pub exponent: f64,
    pub occupation: f64,
    pub self_energy: f64,
}

impl ShellParams {
    /// Number of (Cartesian) orbitals in this shell.
    pub fn n_orbs(&self) -> usize {
        2 * self.l as usize + 1
    }
}

/// Parameters of one chemical element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementParams {
    pub symbol: String,
    pub number: u8,
    pub shells: Vec<ShellParams>,
    pub hardness: f64,
    pub hubbard_derivative: f64,
    pub electronegativity: f64,
    pub rep_alpha: f64,
    pub rep_zeff: f64,
    pub c6: f64,
    pub vdw_radius: f64,
}

impl ElementParams {
    pub fn n_orbs(&self) -> usize {
        self.shells.iter().map(ShellParams::n_orbs).sum()
    }

    /// Number of valence electrons of the neutral atom.
    pub fn n_valence_electrons(&self) -> f64 {
        self.shells.iter().map(|shell| shell.occupation).sum()
    }

    /// Occupation of each atomic orbital of the neutral (spherical) atom.
    pub fn orbital_occupations(&self) -> Vec<f64> {
        self.shells
            .iter()
            .flat_map(|shell| {
                let n: usize = shell.n_orbs();
                std::iter::repeat(shell.occupation / n as f64).take(n)
            })
            .collect()
    }
}

/// Immutable store of the tight-binding parameters. Once constructed it is only read and
/// can be shared between calculators and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Parametrization {
    name: String,
    model: ModelSettings,
    elements: HashMap<u8, ElementParams>,
    pairs: HashMap<(u8, u8), f64>,
}

static GFN1: OnceLock<Arc<Parametrization>> = OnceLock::new();
static GFN2: OnceLock<Arc<Parametrization>> = OnceLock::new();
static IPEA1: OnceLock<Arc<Parametrization>> = OnceLock::new();

fn pair_key(za: u8, zb: u8) -> (u8, u8) {
    if za <= zb {
        (za, zb)
    } else {
        (zb, za)
    }
}

fn invalid<S: Into<String>>(msg: S) -> ScfError {
    ScfError::InvalidConfiguration(msg.into())
}

fn check_positive(value: f64, what: &str) -> Result<(), ScfError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive, got {}", what, value)))
    }
}

fn check_non_negative(value: f64, what: &str) -> Result<(), ScfError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must not be negative, got {}", what, value)))
    }
}

impl Parametrization {
    /// Validate a set of parameter records and convert it into a parametrization.
    pub fn from_records(records: ParamRecords) -> Result<Self, ScfError> {
        let model: ModelSettings = records.model;
        check_positive(model.gamma_exponent, "exponent of the Coulomb kernel")?;
        check_non_negative(model.rep_kexp, "exponent of the repulsion")?;
        check_non_negative(model.disp_s6, "dispersion scaling s6")?;
        check_non_negative(model.disp_a1, "dispersion damping a1")?;
        check_non_negative(model.disp_a2, "dispersion damping a2")?;
        if ![model.k_ss, model.k_sp, model.k_pp, model.k_en]
            .iter()
            .all(|k| k.is_finite())
        {
            return Err(invalid("Hueckel constants must be finite"));
        }

        let mut elements: HashMap<u8, ElementParams> = HashMap::new();
        for record in records.elements.into_iter() {
            let element: ElementParams = Self::convert_element(record)?;
            if elements.contains_key(&element.number) {
                return Err(invalid(format!(
                    "element {} is parametrized twice",
                    element.symbol
                )));
            }
            elements.insert(element.number, element);
        }

        let mut pairs: HashMap<(u8, u8), f64> = HashMap::new();
        for pair in records.pairs.iter() {
            if !pair.scaling.is_finite() {
                return Err(invalid(format!(
                    "pair scaling for {:?} is not finite",
                    pair.elements
                )));
            }
            pairs.insert(pair_key(pair.elements.0, pair.elements.1), pair.scaling);
        }

        Ok(Self {
            name: records.name,
            model,
            elements,
            pairs,
        })
    }

    fn convert_element(record: ElementRecord) -> Result<ElementParams, ScfError> {
        if record.number == 0 {
            return Err(invalid(format!(
                "element {} has atomic number 0",
                record.symbol
            )));
        }
        if record.shells.is_empty() {
            return Err(invalid(format!("element {} has no shells", record.symbol)));
        }
        let mut shells: Vec<ShellParams> = Vec::with_capacity(record.shells.len());
        for shell in record.shells.iter() {
            if shell.l > 1 {
                return Err(invalid(format!(
                    "element {}: only s and p shells are supported, got l = {}",
                    record.symbol, shell.l
                )));
            }
            if !(1..=3).contains(&shell.n) || shell.n <= shell.l {
                return Err(invalid(format!(
                    "element {}: unsupported principal quantum number {} for l = {}",
                    record.symbol, shell.n, shell.l
                )));
            }
            check_positive(shell.exponent, "Slater exponent")?;
            check_non_negative(shell.occupation, "shell occupation")?;
            let capacity: f64 = 2.0 * (2 * shell.l as usize + 1) as f64;
            if shell.occupation > capacity {
                return Err(invalid(format!(
                    "element {}: occupation {} exceeds the capacity of the shell",
                    record.symbol, shell.occupation
                )));
            }
            if !shell.self_energy.is_finite() {
                return Err(invalid(format!(
                    "element {}: self-energy is not finite",
                    record.symbol
                )));
            }
            shells.push(ShellParams {
                l: shell.l,
                n: shell.n,
                exponent: shell.exponent,
                occupation: shell.occupation,
                self_energy: shell.self_energy * EV_TO_HARTREE,
            });
        }
        check_positive(record.hardness, "chemical hardness")?;
        check_non_negative(record.rep_alpha, "repulsion exponent")?;
        check_non_negative(record.rep_zeff, "effective nuclear charge")?;
        check_non_negative(record.c6, "C6 coefficient")?;
        check_non_negative(record.vdw_radius, "van der Waals radius")?;
        if !(record.hubbard_derivative.is_finite() && record.electronegativity.is_finite()) {
            return Err(invalid(format!(
                "element {}: non-finite parameters",
                record.symbol
            )));
        }
        Ok(ElementParams {
            symbol: record.symbol,
            number: record.number,
            shells,
            hardness: record.hardness,
            hubbard_derivative: record.hubbard_derivative,
            electronegativity: record.electronegativity,
            rep_alpha: record.rep_alpha,
            rep_zeff: record.rep_zeff,
            c6: record.c6,
            vdw_radius: record.vdw_radius,
        })
    }

    /// Built-in GFN1-xTB flavoured parametrization.
    pub fn gfn1() -> Arc<Self> {
        GFN1.get_or_init(|| Self::builtin(Self::gfn1_records()))
            .clone()
    }

    /// Built-in GFN2-xTB flavoured parametrization.
    pub fn gfn2() -> Arc<Self> {
        GFN2.get_or_init(|| Self::builtin(Self::gfn2_records()))
            .clone()
    }

    /// Built-in IPEA1-xTB flavoured parametrization.
    pub fn ipea1() -> Arc<Self> {
        IPEA1
            .get_or_init(|| Self::builtin(Self::ipea1_records()))
            .clone()
    }

    /// Look up a built-in parametrization by its (case insensitive) name.
    pub fn by_name(name: &str) -> Option<Arc<Self>> {
        match name.to_lowercase().as_str() {
            "gfn1" | "gfn1-xtb" => Some(Self::gfn1()),
            "gfn2" | "gfn2-xtb" => Some(Self::gfn2()),
            "ipea1" | "ipea1-xtb" => Some(Self::ipea1()),
            _ => None,
        }
    }

    fn builtin(records: ParamRecords) -> Arc<Self> {
        Arc::new(
            Self::from_records(records)
                .expect("Failed to validate the built-in parameters. This is a library bug."),
        )
    }

    pub fn gfn1_records() -> ParamRecords {
        ParamRecords {
            name: String::from("GFN1-xTB"),
            model: ModelRecord {
                k_ss: 1.85,
                k_sp: 2.08,
                k_pp: 2.25,
                k_en: -0.007,
                gamma_exponent: 2.0,
                averaging: HardnessAveraging::Harmonic,
                third_order: true,
                rep_kexp: 1.5,
                disp_s6: 1.0,
                disp_a1: 0.63,
                disp_a2: 5.0,
            },
            elements: builtin_elements(0.0),
            pairs: vec![PairRecord {
                elements: (1, 1),
                scaling: 0.96,
            }],
        }
    }

    pub fn gfn2_records() -> ParamRecords {
        ParamRecords {
            name: String::from("GFN2-xTB"),
            model: ModelRecord {
                k_ss: 1.85,
                k_sp: 2.04,
                k_pp: 2.23,
                k_en: 0.02,
                gamma_exponent: 2.0,
                averaging: HardnessAveraging::Arithmetic,
                third_order: true,
                rep_kexp: 1.5,
                disp_s6: 1.0,
                disp_a1: 0.52,
                disp_a2: 5.0,
            },
            elements: builtin_elements(0.0),
            pairs: Vec::new(),
        }
    }

    pub fn ipea1_records() -> ParamRecords {
        let mut records: ParamRecords = Self::gfn1_records();
        records.name = String::from("IPEA1-xTB");
        records.elements = builtin_elements(-0.4);
        records.model.k_sp = 2.0;
        records
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &ModelSettings {
        &self.model
    }

    pub fn element(&self, number: u8) -> Option<&ElementParams> {
        self.elements.get(&number)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.elements.contains_key(&number)
    }

    /// Sorted list of all parametrized atomic numbers.
    pub fn atomic_numbers(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = self.elements.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// Scaling of the Hamiltonian elements between two elements (1.0 if not specified).
    pub fn pair_scaling(&self, za: u8, zb: u8) -> f64 {
        self.pairs.get(&pair_key(za, zb)).copied().unwrap_or(1.0)
    }

    /// Hueckel constant for the combination of two angular momenta.
    pub fn shell_pair_constant(&self, la: u8, lb: u8) -> f64 {
        match (la, lb) {
            (0, 0) => self.model.k_ss,
            (1, 1) => self.model.k_pp,
            _ => self.model.k_sp,
        }
    }
}
