use crate::error::ScfError;
use crate::param::{HardnessAveraging, Parametrization};
use crate::types::Structure;
use hashbrown::HashMap;
use ndarray::prelude::*;

/// ## Gamma Function
/// Klopman-Ohno-Mataga kernel of the isotropic second-order electrostatics
///
/// gamma_AB = (R_AB^g + eta_AB^-g)^(-1/g)
///
/// where eta_AB is the average of the chemical hardness of both atoms. In the limit
/// R -> 0 the kernel goes to the hardness of the atom.
#[derive(Debug, Clone)]
pub struct GammaFunction {
    exponent: f64,
    averaging: HardnessAveraging,
    hardness: HashMap<u8, f64>,
}

impl GammaFunction {
    /// Collect the hardness of all elements of the structure. Every element has to be
    /// parametrized.
    pub fn new(param: &Parametrization, numbers: &[u8]) -> Result<Self, ScfError> {
        let mut hardness: HashMap<u8, f64> = HashMap::new();
        for z in numbers.iter() {
            let element = param.element(*z).ok_or_else(|| {
                ScfError::MalformedStructure(format!("no hardness for element {}", z))
            })?;
            hardness.insert(*z, element.hardness);
        }
        Ok(Self {
            exponent: param.model().gamma_exponent,
            averaging: param.model().averaging,
            hardness,
        })
    }

    fn average(&self, eta_a: f64, eta_b: f64) -> f64 {
        match self.averaging {
            HardnessAveraging::Arithmetic => 0.5 * (eta_a + eta_b),
            HardnessAveraging::Harmonic => 2.0 / (1.0 / eta_a + 1.0 / eta_b),
        }
    }

    pub fn eval(&self, r: f64, z_a: u8, z_b: u8) -> f64 {
        let eta: f64 = self.average(self.hardness[&z_a], self.hardness[&z_b]);
        let g: f64 = self.exponent;
        (r.powf(g) + eta.powf(-g)).powf(-1.0 / g)
    }

    /// R -> 0 limit
    pub fn eval_limit0(&self, z: u8) -> f64 {
        self.hardness[&z]
    }
}

/// Atom resolved gamma matrix of the structure.
pub fn gamma_atomwise(gamma_func: &GammaFunction, mol: &Structure) -> Array2<f64> {
    let n_atoms: usize = mol.n_atoms();
    let numbers: &[u8] = mol.numbers();
    let mut g0: Array2<f64> = Array2::zeros((n_atoms, n_atoms));
    for i in 0..n_atoms {
        g0[[i, i]] = gamma_func.eval_limit0(numbers[i]);
        for j in (i + 1)..n_atoms {
            g0[[i, j]] = gamma_func.eval(mol.distance(i, j), numbers[i], numbers[j]);
            g0[[j, i]] = g0[[i, j]];
        }
    }
    g0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{hydrogen_chloride, water};
    use approx::assert_relative_eq;

    #[test]
    fn gamma_limits() {
        let param = Parametrization::gfn2();
        let gamma_func = GammaFunction::new(&param, &[1, 8]).unwrap();
        let eta_h: f64 = param.element(1).unwrap().hardness;
        assert_relative_eq!(gamma_func.eval(0.0, 1, 1), eta_h, epsilon = 1e-14);
        // Coulomb law at large distances
        assert_relative_eq!(gamma_func.eval(500.0, 1, 8), 1.0 / 500.0, max_relative = 1e-4);
    }

    #[test]
    fn gamma_matrix_is_symmetric() {
        let mol = water();
        let gamma_func = GammaFunction::new(&Parametrization::gfn2(), mol.numbers()).unwrap();
        let g0 = gamma_atomwise(&gamma_func, &mol);
        assert_relative_eq!(g0, g0.t(), epsilon = 1e-15);
        assert!(g0[[0, 1]] < g0[[0, 0]]);
        assert!(g0[[1, 2]] < g0[[1, 1]]);
    }

    #[test]
    fn harmonic_mean_is_smaller() {
        let mol = hydrogen_chloride();
        let mut records = Parametrization::gfn2_records();
        let arithmetic = GammaFunction::new(
            &Parametrization::from_records(records.clone()).unwrap(),
            mol.numbers(),
        )
        .unwrap();
        records.model.averaging = HardnessAveraging::Harmonic;
        let harmonic =
            GammaFunction::new(&Parametrization::from_records(records).unwrap(), mol.numbers())
                .unwrap();
        let r: f64 = mol.distance(0, 1);
        assert!(harmonic.eval(r, 17, 1) < arithmetic.eval(r, 17, 1));
    }
}
