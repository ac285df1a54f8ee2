use crate::constants::element_symbol;
use crate::error::ScfError;
use nalgebra::Vector3;
use ndarray::prelude::*;

/// Molecular structure: atomic numbers, Cartesian positions in Bohr, total charge and spin
/// multiplicity. The SCC routine only reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    numbers: Vec<u8>,
    positions: Vec<Vector3<f64>>,
    charge: f64,
    multiplicity: u8,
}

impl Structure {
    /// Create a neutral singlet structure. The number of atomic numbers and positions has to
    /// be identical.
    pub fn new(numbers: Vec<u8>, positions: Vec<Vector3<f64>>) -> Result<Self, ScfError> {
        if numbers.len() != positions.len() {
            return Err(ScfError::MalformedStructure(format!(
                "{} atomic numbers but {} positions",
                numbers.len(),
                positions.len()
            )));
        }
        if let Some(z) = numbers.iter().find(|z| **z == 0) {
            return Err(ScfError::MalformedStructure(format!(
                "invalid atomic number {}",
                z
            )));
        }
        if positions.iter().any(|xyz| !xyz.iter().all(|x| x.is_finite())) {
            return Err(ScfError::MalformedStructure(String::from(
                "positions contain non-finite values",
            )));
        }
        Ok(Self {
            numbers,
            positions,
            charge: 0.0,
            multiplicity: 1,
        })
    }

    /// Create a structure from an array of shape [n_atoms, 3].
    pub fn from_array(numbers: Vec<u8>, positions: ArrayView2<f64>) -> Result<Self, ScfError> {
        if positions.ncols() != 3 {
            return Err(ScfError::MalformedStructure(format!(
                "positions need three columns, found {}",
                positions.ncols()
            )));
        }
        let xyz: Vec<Vector3<f64>> = positions
            .outer_iter()
            .map(|row| Vector3::new(row[0], row[1], row[2]))
            .collect();
        Self::new(numbers, xyz)
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: u8) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    pub fn set_multiplicity(&mut self, multiplicity: u8) {
        self.multiplicity = multiplicity;
    }

    /// Replace all positions (in Bohr), e.g. for a new point on a scan.
    pub fn update_positions(&mut self, positions: Vec<Vector3<f64>>) -> Result<(), ScfError> {
        if positions.len() != self.numbers.len() {
            return Err(ScfError::MalformedStructure(format!(
                "expected {} positions, got {}",
                self.numbers.len(),
                positions.len()
            )));
        }
        self.positions = positions;
        Ok(())
    }

    pub fn n_atoms(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn multiplicity(&self) -> u8 {
        self.multiplicity
    }

    /// Number of unpaired electrons, 2S. A multiplicity of zero has no spin state.
    pub fn n_unpaired(&self) -> Result<usize, ScfError> {
        match self.multiplicity {
            0 => Err(ScfError::MalformedStructure(String::from(
                "spin multiplicity has to be at least 1",
            ))),
            m => Ok((m - 1) as usize),
        }
    }

    /// Distance between atom i and atom j in Bohr.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        (self.positions[i] - self.positions[j]).norm()
    }

    /// Sum formula like `C1H4`, in order of appearance.
    pub fn formula(&self) -> String {
        let mut counts: Vec<(u8, usize)> = Vec::new();
        for z in self.numbers.iter() {
            match counts.iter_mut().find(|(zi, _)| zi == z) {
                Some((_, n)) => *n += 1,
                None => counts.push((*z, 1)),
            }
        }
        counts
            .iter()
            .map(|(z, n)| format!("{}{}", element_symbol(*z).unwrap_or("X"), n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = Structure::new(vec![1, 1], vec![Vector3::zeros()]);
        assert!(matches!(result, Err(ScfError::MalformedStructure(_))));
    }

    #[test]
    fn structure_from_array() {
        let xyz: Array2<f64> = array![[0.0, 0.0, 0.0], [0.0, 0.0, 1.4]];
        let mol = Structure::from_array(vec![1, 1], xyz.view())
            .unwrap()
            .with_multiplicity(3);
        assert_eq!(mol.n_atoms(), 2);
        assert_eq!(mol.n_unpaired(), Ok(2));
        assert!((mol.distance(0, 1) - 1.4).abs() < 1e-14);
        assert_eq!(mol.formula(), "H2");
    }

    #[test]
    fn zero_multiplicity_is_rejected() {
        let mol = Structure::new(vec![1], vec![Vector3::zeros()])
            .unwrap()
            .with_multiplicity(0);
        assert!(matches!(
            mol.n_unpaired(),
            Err(ScfError::MalformedStructure(_))
        ));
    }
}
