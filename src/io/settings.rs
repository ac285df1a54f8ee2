use crate::calculator::Calculator;
use crate::constants::K_BOLTZMANN;
use crate::defaults::*;
use crate::error::ScfError;
use crate::io::InputError;
use crate::param::Parametrization;
use crate::scc::MixerKind;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn default_charge() -> f64 {
    CHARGE
}
fn default_multiplicity() -> u8 {
    MULTIPLICITY
}
fn default_method() -> String {
    String::from(METHOD)
}
fn default_verbose() -> i8 {
    0
}
fn default_accuracy() -> f64 {
    ACCURACY
}
fn default_max_iterations() -> usize {
    MAX_ITER
}
fn default_mixer_damping() -> f64 {
    MIXER_DAMPING
}
fn default_temperature() -> f64 {
    TEMPERATURE
}
fn default_mixer() -> String {
    String::from("linear")
}
fn default_broyden_memory() -> usize {
    BROYDEN_MEMORY
}

/// Settings of the program, read from a TOML file. Every entry is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Configuration {
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub mol: MoleculeConfig,
    #[serde(default)]
    pub scf: SccConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MoleculeConfig {
    #[serde(default = "default_charge")]
    pub charge: f64,
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SccConfig {
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_mixer_damping")]
    pub mixer_damping: f64,
    /// in Kelvin
    #[serde(default = "default_temperature")]
    pub electronic_temperature: f64,
    #[serde(default = "default_mixer")]
    pub mixer: String,
    #[serde(default = "default_broyden_memory")]
    pub broyden_memory: usize,
}

impl Default for MoleculeConfig {
    fn default() -> Self {
        Self {
            charge: default_charge(),
            multiplicity: default_multiplicity(),
        }
    }
}

impl Default for SccConfig {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            max_iterations: default_max_iterations(),
            mixer_damping: default_mixer_damping(),
            electronic_temperature: default_temperature(),
            mixer: default_mixer(),
            broyden_memory: default_broyden_memory(),
        }
    }
}

impl Configuration {
    pub fn from_toml(content: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(content)?)
    }

    /// Read the configuration file. If it does not exist the default settings are
    /// written to it.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let path: &Path = path.as_ref();
        let io_error = |source: std::io::Error| InputError::Io {
            path: path.display().to_string(),
            source,
        };
        if path.exists() {
            let content: String = fs::read_to_string(path).map_err(io_error)?;
            Self::from_toml(&content)
        } else {
            let config: Self = Self::from_toml("")?;
            fs::write(path, toml::to_string(&config)?).map_err(io_error)?;
            Ok(config)
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            i8::MIN..=-1 => LevelFilter::Warn,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn mixer_kind(&self) -> Result<MixerKind, ScfError> {
        match self.scf.mixer.to_lowercase().as_str() {
            "linear" => Ok(MixerKind::Linear),
            "broyden" => Ok(MixerKind::Broyden {
                memory: self.scf.broyden_memory,
            }),
            other => Err(ScfError::InvalidConfiguration(format!(
                "unknown mixer '{}'",
                other
            ))),
        }
    }

    /// Built-in parametrization selected by `method`.
    pub fn parametrization(&self) -> Result<Arc<Parametrization>, ScfError> {
        Parametrization::by_name(&self.method).ok_or_else(|| {
            ScfError::InvalidConfiguration(format!("unknown method '{}'", self.method))
        })
    }

    /// Calculator with all knobs of the [scf] section. The temperature is converted
    /// from Kelvin to Hartree.
    pub fn calculator(&self, param: Arc<Parametrization>) -> Result<Calculator, ScfError> {
        let mut calc: Calculator = Calculator::new(param);
        calc.set_accuracy(self.scf.accuracy)?;
        calc.set_max_iterations(self.scf.max_iterations)?;
        calc.set_mixer_damping(self.scf.mixer_damping)?;
        calc.set_electronic_temperature(self.scf.electronic_temperature * K_BOLTZMANN)?;
        calc.set_mixer(self.mixer_kind()?)?;
        Ok(calc)
    }
}
