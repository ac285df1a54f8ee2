mod overlap;
mod sto_ng;

pub use overlap::overlap_block;
pub use sto_ng::{slater_to_gauss, ContractedGaussian};

use crate::error::ScfError;
use crate::param::Parametrization;
use crate::types::Structure;

/// A shell of atomic orbitals that is centered on one atom of the structure.
#[derive(Debug, Clone)]
pub struct Shell {
    /// index of the atom
    pub atom: usize,
    pub l: u8,
    /// index of the first atomic orbital of this shell
    pub offset: usize,
    /// on-site energy in Hartree
    pub self_energy: f64,
    pub cgto: ContractedGaussian,
}

impl Shell {
    pub fn n_orbs(&self) -> usize {
        2 * self.l as usize + 1
    }
}

/// Minimal valence basis of a structure. The atomic orbitals are ordered by atom, by shell
/// and by the Cartesian component.
#[derive(Debug, Clone)]
pub struct BasisSet {
    pub shells: Vec<Shell>,
    /// shells that belong to each atom
    pub atom_shells: Vec<Vec<usize>>,
    /// number of orbitals of each atom
    pub atom_n_orbs: Vec<usize>,
    /// index of the atom for each orbital
    pub ao_to_atom: Vec<usize>,
    pub n_orbs: usize,
}

impl BasisSet {
    /// Set up the basis for all atoms of the structure. Fails if one of the elements
    /// has no parameters.
    pub fn new(mol: &Structure, param: &Parametrization) -> Result<Self, ScfError> {
        let mut shells: Vec<Shell> = Vec::new();
        let mut atom_shells: Vec<Vec<usize>> = Vec::with_capacity(mol.n_atoms());
        let mut atom_n_orbs: Vec<usize> = Vec::with_capacity(mol.n_atoms());
        let mut ao_to_atom: Vec<usize> = Vec::new();
        let mut offset: usize = 0;

        for (atom, z) in mol.numbers().iter().enumerate() {
            let element = param.element(*z).ok_or_else(|| {
                ScfError::MalformedStructure(format!(
                    "no parameters for element {} (atom {}) in {}",
                    z,
                    atom + 1,
                    param.name()
                ))
            })?;
            let mut indices: Vec<usize> = Vec::with_capacity(element.shells.len());
            for shell in element.shells.iter() {
                let cgto = slater_to_gauss(shell.n, shell.l, shell.exponent).ok_or_else(|| {
                    ScfError::InvalidConfiguration(format!(
                        "no Gaussian expansion for the n={} l={} shell of {}",
                        shell.n, shell.l, element.symbol
                    ))
                })?;
                indices.push(shells.len());
                shells.push(Shell {
                    atom,
                    l: shell.l,
                    offset,
                    self_energy: shell.self_energy,
                    cgto,
                });
                offset += shell.n_orbs();
            }
            let n_orbs: usize = element.n_orbs();
            ao_to_atom.extend(std::iter::repeat(atom).take(n_orbs));
            atom_n_orbs.push(n_orbs);
            atom_shells.push(indices);
        }

        Ok(Self {
            shells,
            atom_shells,
            atom_n_orbs,
            ao_to_atom,
            n_orbs: offset,
        })
    }

    /// Index of the first orbital of each atom.
    pub fn atom_offsets(&self) -> Vec<usize> {
        self.atom_n_orbs
            .iter()
            .scan(0, |acc, n| {
                let start: usize = *acc;
                *acc += n;
                Some(start)
            })
            .collect()
    }
}
