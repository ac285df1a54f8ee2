use crate::error::ScfError;
use crate::param::Parametrization;
use crate::scc::fermi_occupation::electronic_entropy;
use crate::types::Structure;
use itertools::Itertools;
use ndarray::prelude::*;

/// Energy of the nuclear repulsion, screened by the core electrons
///
/// E_rep = sum_{A<B} Z_A Z_B / R_AB exp(-sqrt(alpha_A alpha_B) R_AB^k_f)
pub fn get_repulsive_energy(mol: &Structure, param: &Parametrization) -> Result<f64, ScfError> {
    let k_f: f64 = param.model().rep_kexp;
    let mut e_rep: f64 = 0.0;
    for (i, j) in (0..mol.n_atoms()).tuple_combinations() {
        let (a, b) = element_pair(mol, param, i, j)?;
        let r: f64 = mol.distance(i, j);
        let alpha: f64 = (a.rep_alpha * b.rep_alpha).sqrt();
        e_rep += a.rep_zeff * b.rep_zeff / r * (-alpha * r.powf(k_f)).exp();
    }
    Ok(e_rep)
}

/// Pairwise C6 dispersion with rational damping
///
/// E_disp = -s6 sum_{A<B} C6_AB / (R_AB^6 + R0_AB^6)
pub fn get_dispersion_energy(mol: &Structure, param: &Parametrization) -> Result<f64, ScfError> {
    let model = param.model();
    let mut e_disp: f64 = 0.0;
    for (i, j) in (0..mol.n_atoms()).tuple_combinations() {
        let (a, b) = element_pair(mol, param, i, j)?;
        let c6: f64 = (a.c6 * b.c6).sqrt();
        let r0: f64 = model.disp_a1 * 0.5 * (a.vdw_radius + b.vdw_radius) + model.disp_a2;
        e_disp -= model.disp_s6 * c6 / (mol.distance(i, j).powi(6) + r0.powi(6));
    }
    Ok(e_disp)
}

fn element_pair<'a>(
    mol: &Structure,
    param: &'a Parametrization,
    i: usize,
    j: usize,
) -> Result<(&'a crate::param::ElementParams, &'a crate::param::ElementParams), ScfError> {
    let lookup = |atom: usize| {
        let z: u8 = mol.numbers()[atom];
        param.element(z).ok_or_else(|| {
            ScfError::MalformedStructure(format!("no parameters for element {}", z))
        })
    };
    Ok((lookup(i)?, lookup(j)?))
}

/// Electronic energy as the sum of the band structure energy, the second-order
/// Coulomb energy and the optional third-order on-site term.
pub fn get_electronic_energy(
    p: ArrayView2<f64>,
    h0: ArrayView2<f64>,
    dq: ArrayView1<f64>,
    gamma: ArrayView2<f64>,
    hubbard_derivatives: Option<ArrayView1<f64>>,
) -> f64 {
    // band structure energy
    let e_band_structure: f64 = (&p * &h0).sum();
    // Coulomb energy from monopoles
    let e_coulomb: f64 = 0.5 * dq.dot(&gamma.dot(&dq));
    let e_third: f64 = hubbard_derivatives.map_or(0.0, |gam3| {
        gam3.iter()
            .zip(dq.iter())
            .map(|(g, q)| g * q.powi(3))
            .sum::<f64>()
            / 3.0
    });
    e_band_structure + e_coulomb + e_third
}

/// Density matrix of the initial guess: the reference orbital occupations of the
/// neutral atoms on the diagonal, scaled per atom to the guess populations.
pub fn guess_density_matrix(
    reference_occupations: ArrayView1<f64>,
    reference_populations: ArrayView1<f64>,
    dq: ArrayView1<f64>,
    orbs_per_atom: &[usize],
) -> Array2<f64> {
    let mut diag: Array1<f64> = reference_occupations.to_owned();
    let mut mu: usize = 0;
    for (atom, n_orbs) in orbs_per_atom.iter().enumerate() {
        let n0: f64 = reference_populations[atom];
        let scale: f64 = if n0 > 0.0 { (n0 + dq[atom]) / n0 } else { 1.0 };
        diag.slice_mut(s![mu..mu + n_orbs]).mapv_inplace(|x| x * scale);
        mu += n_orbs;
    }
    Array2::from_diag(&diag)
}

/// Entropy contribution -T S of the guess occupations. The diagonal of the guess density
/// is split into the spin channels in proportion to the number of alpha and beta electrons.
pub fn guess_entropy_energy(p0: ArrayView2<f64>, n_alpha: f64, n_beta: f64, kt: f64) -> f64 {
    let n_elec: f64 = n_alpha + n_beta;
    if kt == 0.0 || n_elec <= 0.0 {
        return 0.0;
    }
    [n_alpha, n_beta]
        .iter()
        .map(|n_sigma| {
            let f: Array1<f64> = p0.diag().mapv(|x| (x * n_sigma / n_elec).min(1.0));
            electronic_entropy(f.view(), kt)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{carbon_atom, hydrogen_molecule, water};
    use approx::assert_relative_eq;

    #[test]
    fn pair_energies_vanish_for_a_single_atom() {
        let param = Parametrization::gfn2();
        assert_eq!(get_repulsive_energy(&carbon_atom(), &param), Ok(0.0));
        assert_eq!(get_dispersion_energy(&carbon_atom(), &param), Ok(0.0));
    }

    #[test]
    fn repulsion_of_h2() {
        let param = Parametrization::gfn2();
        let h = param.element(1).unwrap().clone();
        let r: f64 = 1.4;
        let reference: f64 = h.rep_zeff.powi(2) / r
            * (-h.rep_alpha * r.powf(param.model().rep_kexp)).exp();
        assert_relative_eq!(
            get_repulsive_energy(&hydrogen_molecule(), &param).unwrap(),
            reference,
            epsilon = 1e-14
        );
    }

    #[test]
    fn dispersion_is_attractive() {
        let e_disp: f64 = get_dispersion_energy(&water(), &Parametrization::gfn2()).unwrap();
        assert!(e_disp < 0.0);
    }

    #[test]
    fn electronic_energy_terms() {
        let p: Array2<f64> = array![[2.0, 0.0], [0.0, 0.0]];
        let h0: Array2<f64> = array![[-0.5, -0.1], [-0.1, -0.2]];
        let dq: Array1<f64> = array![0.5, -0.5];
        let gamma: Array2<f64> = array![[0.4, 0.2], [0.2, 0.4]];
        let gam3: Array1<f64> = array![0.1, 0.1];
        let e_second: f64 =
            get_electronic_energy(p.view(), h0.view(), dq.view(), gamma.view(), None);
        assert_relative_eq!(e_second, -1.0 + 0.5 * 0.1, epsilon = 1e-15);
        let e_third: f64 = get_electronic_energy(
            p.view(),
            h0.view(),
            dq.view(),
            gamma.view(),
            Some(gam3.view()),
        );
        // odd powers of opposite populations cancel
        assert_relative_eq!(e_third, e_second, epsilon = 1e-15);
    }

    #[test]
    fn guess_entropy_of_a_partially_filled_shell() {
        let p0: Array2<f64> = Array2::from_diag(&array![2.0, 2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0]);
        let kt: f64 = 1e-3;
        let f: f64 = 1.0 / 3.0;
        let reference: f64 = 6.0 * kt * (f * f.ln() + (1.0 - f) * (1.0 - f).ln());
        assert_relative_eq!(
            guess_entropy_energy(p0.view(), 2.0, 2.0, kt),
            reference,
            epsilon = 1e-14
        );
        assert_eq!(guess_entropy_energy(p0.view(), 2.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn guess_density_is_scaled_per_atom() {
        let p0 = guess_density_matrix(
            array![2.0, 4.0 / 3.0, 4.0 / 3.0, 4.0 / 3.0, 1.0].view(),
            array![6.0, 1.0].view(),
            array![-0.6, 0.6].view(),
            &[4, 1],
        );
        assert_relative_eq!(p0.diag().slice(s![..4]).sum(), 5.4, epsilon = 1e-14);
        assert_relative_eq!(p0[[4, 4]], 1.6, epsilon = 1e-14);
    }
}
