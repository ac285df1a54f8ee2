use crate::basis::BasisSet;
use crate::error::ScfError;
use crate::param::Parametrization;
use crate::scc::gamma_approximation::{gamma_atomwise, GammaFunction};
use crate::scc::h0_and_s::h0_and_s;
use crate::types::Structure;
use ndarray::prelude::*;

/// Expand an atomic potential to the orbital basis: H1_mn = 1/2 (V_A + V_B),
/// with m on atom A and n on atom B. The result has to be multiplied element-wise with
/// the overlap matrix.
pub fn construct_h1(n_orbs_per_atom: &[usize], potential: ArrayView1<f64>) -> Array2<f64> {
    let v_ao: Array1<f64> = n_orbs_per_atom
        .iter()
        .zip(potential.iter())
        .flat_map(|(n, v)| std::iter::repeat(*v).take(*n))
        .collect();
    let n_orbs: usize = v_ao.len();
    let mut h1: Array2<f64> = Array2::zeros((n_orbs, n_orbs));
    for (mu, v_mu) in v_ao.iter().enumerate() {
        for (nu, v_nu) in v_ao.iter().enumerate() {
            h1[[mu, nu]] = 0.5 * (v_mu + v_nu);
        }
    }
    h1
}

/// Assembles the Hamiltonian of the self-consistent charge cycle. The overlap matrix,
/// H0 and the Coulomb kernel only depend on the geometry and are computed once; the
/// charge dependent part is added for every new set of populations.
#[derive(Debug, Clone)]
pub struct HamiltonianBuilder {
    s: Array2<f64>,
    h0: Array2<f64>,
    gamma: Array2<f64>,
    hubbard_derivatives: Option<Array1<f64>>,
    atom_n_orbs: Vec<usize>,
    reference_occupations: Array1<f64>,
    reference_populations: Array1<f64>,
}

impl HamiltonianBuilder {
    pub fn new(mol: &Structure, param: &Parametrization) -> Result<Self, ScfError> {
        if mol.is_empty() {
            return Err(ScfError::MalformedStructure(String::from(
                "the structure contains no atoms",
            )));
        }
        let basis: BasisSet = BasisSet::new(mol, param)?;
        let (s, h0) = h0_and_s(mol, &basis, param);
        let gamma_func: GammaFunction = GammaFunction::new(param, mol.numbers())?;
        let gamma: Array2<f64> = gamma_atomwise(&gamma_func, mol);

        let mut reference_occupations: Vec<f64> = Vec::with_capacity(basis.n_orbs);
        let mut gam3: Vec<f64> = Vec::with_capacity(mol.n_atoms());
        for z in mol.numbers().iter() {
            // the basis set construction already checked that all elements are known
            if let Some(element) = param.element(*z) {
                reference_occupations.extend(element.orbital_occupations());
                gam3.push(element.hubbard_derivative);
            }
        }
        let hubbard_derivatives: Option<Array1<f64>> = if param.model().third_order {
            Some(Array1::from(gam3))
        } else {
            None
        };

        Self::from_parts(
            h0,
            s,
            gamma,
            basis.atom_n_orbs,
            Array1::from(reference_occupations),
            hubbard_derivatives,
        )
    }

    /// Create the builder from precomputed matrices. `reference_occupations` holds the
    /// orbital occupations of the neutral atoms.
    pub fn from_parts(
        h0: Array2<f64>,
        s: Array2<f64>,
        gamma: Array2<f64>,
        atom_n_orbs: Vec<usize>,
        reference_occupations: Array1<f64>,
        hubbard_derivatives: Option<Array1<f64>>,
    ) -> Result<Self, ScfError> {
        let n_orbs: usize = atom_n_orbs.iter().sum();
        let n_atoms: usize = atom_n_orbs.len();
        let dims_ok: bool = h0.dim() == (n_orbs, n_orbs)
            && s.dim() == (n_orbs, n_orbs)
            && gamma.dim() == (n_atoms, n_atoms)
            && reference_occupations.len() == n_orbs
            && hubbard_derivatives
                .as_ref()
                .map_or(true, |gam3| gam3.len() == n_atoms);
        if !dims_ok || n_atoms == 0 {
            return Err(ScfError::MalformedStructure(String::from(
                "inconsistent dimensions of the Hamiltonian parts",
            )));
        }

        let mut reference_populations: Array1<f64> = Array1::zeros(n_atoms);
        let mut mu: usize = 0;
        for (atom, n) in atom_n_orbs.iter().enumerate() {
            reference_populations[atom] = reference_occupations.slice(s![mu..mu + n]).sum();
            mu += n;
        }

        Ok(Self {
            s,
            h0,
            gamma,
            hubbard_derivatives,
            atom_n_orbs,
            reference_occupations,
            reference_populations,
        })
    }

    pub fn n_orbs(&self) -> usize {
        self.h0.nrows()
    }

    pub fn n_atoms(&self) -> usize {
        self.atom_n_orbs.len()
    }

    pub fn overlap(&self) -> ArrayView2<f64> {
        self.s.view()
    }

    pub fn h0(&self) -> ArrayView2<f64> {
        self.h0.view()
    }

    pub fn gamma(&self) -> ArrayView2<f64> {
        self.gamma.view()
    }

    pub fn hubbard_derivatives(&self) -> Option<ArrayView1<f64>> {
        self.hubbard_derivatives.as_ref().map(|gam3| gam3.view())
    }

    pub fn atom_n_orbs(&self) -> &[usize] {
        &self.atom_n_orbs
    }

    pub fn reference_occupations(&self) -> ArrayView1<f64> {
        self.reference_occupations.view()
    }

    /// Number of valence electrons of each neutral atom.
    pub fn reference_populations(&self) -> ArrayView1<f64> {
        self.reference_populations.view()
    }

    /// Atomic potential V_A = sum_B gamma_AB dq_B + Gamma_A dq_A^2 that is created by the
    /// excess populations `dq`.
    pub fn potential(&self, dq: ArrayView1<f64>) -> Array1<f64> {
        let mut v: Array1<f64> = self.gamma.dot(&dq);
        if let Some(gam3) = &self.hubbard_derivatives {
            v = v + &(gam3 * &dq.mapv(|x| x * x));
        }
        v
    }

    /// Hamiltonian for the excess populations `dq` (electrons relative to the neutral
    /// atoms).
    pub fn build(&self, dq: ArrayView1<f64>) -> Array2<f64> {
        let v: Array1<f64> = self.potential(dq);
        let h1: Array2<f64> = construct_h1(&self.atom_n_orbs, v.view()) * &self.s;
        &self.h0 + &h1
    }
}
