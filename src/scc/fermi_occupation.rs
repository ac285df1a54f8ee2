use crate::defaults;
use crate::error::ScfError;
use crate::utils::{argsort, zbrent, RootNotFound};
use ndarray::prelude::*;
use ndarray_stats::QuantileExt;

/// Orbital occupations of both spin channels together with the chemical potentials and
/// the electronic entropy contribution to the free energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupation {
    /// total occupation of each orbital, between 0 and 2
    pub occupations: Array1<f64>,
    pub alpha: Array1<f64>,
    pub beta: Array1<f64>,
    /// chemical potentials of the alpha and beta electrons
    pub fermi_levels: (f64, f64),
    /// -T S, zero at T = 0
    pub entropy_energy: f64,
}

/// Number of alpha and beta electrons for a total of `n_elec` electrons of which
/// `n_unpaired` are unpaired.
pub fn spin_channels(n_elec: f64, n_unpaired: usize) -> (f64, f64) {
    let n_u: f64 = n_unpaired as f64;
    (0.5 * (n_elec + n_u), 0.5 * (n_elec - n_u))
}

/// Find the occupation of single-particle states at the electronic temperature kT
/// (in Hartree) according to the Fermi distribution:
///     $f_a = 1 /(exp(en_a - mu)/(kT) + 1)$
/// Each orbital can hold one alpha and one beta electron. The chemical potential of
/// each spin channel is determined from the condition that
/// sum_a f_a = N_sigma
/// which is solved with Brent's method to an accuracy of `elec_tol` electrons. Tolerances
/// below the rounding error of the sum are raised to that limit.
/// At kT = 0 the orbitals are filled from the bottom; degenerate orbitals at the
/// Fermi level share the remaining electrons.
///
/// Parameters:
/// ===========
/// orbe: orbital energies
/// n_elec: number of electrons
/// n_unpaired: number of unpaired electrons (multiplicity - 1)
/// kt: electronic temperature in Hartree
pub fn fermi_occupation(
    orbe: ArrayView1<f64>,
    n_elec: f64,
    n_unpaired: usize,
    kt: f64,
    elec_tol: f64,
) -> Result<Occupation, ScfError> {
    if !(kt >= 0.0) || !kt.is_finite() {
        return Err(ScfError::InvalidConfiguration(format!(
            "the electronic temperature has to be non-negative, got {}",
            kt
        )));
    }
    if orbe.iter().any(|e| !e.is_finite()) {
        return Err(ScfError::InternalNumericalFailure(String::from(
            "non-finite orbital energies",
        )));
    }
    let (n_alpha, n_beta) = spin_channels(n_elec, n_unpaired);
    let (mu_alpha, f_alpha) = channel_occupation(orbe, n_alpha, kt, elec_tol)?;
    let (mu_beta, f_beta) = if (n_alpha - n_beta).abs() < f64::EPSILON {
        (mu_alpha, f_alpha.clone())
    } else {
        channel_occupation(orbe, n_beta, kt, elec_tol)?
    };
    let entropy_energy: f64 =
        electronic_entropy(f_alpha.view(), kt) + electronic_entropy(f_beta.view(), kt);

    Ok(Occupation {
        occupations: &f_alpha + &f_beta,
        alpha: f_alpha,
        beta: f_beta,
        fermi_levels: (mu_alpha, mu_beta),
        entropy_energy,
    })
}

/// Contribution -T S = kT sum_a [f_a ln f_a + (1 - f_a) ln(1 - f_a)] of one spin channel.
pub fn electronic_entropy(f: ArrayView1<f64>, kt: f64) -> f64 {
    if kt == 0.0 {
        return 0.0;
    }
    let s: f64 = f
        .iter()
        .filter(|x| **x > 0.0 && **x < 1.0)
        .map(|x| x * x.ln() + (1.0 - x) * (1.0 - x).ln())
        .sum();
    kt * s
}

/// Occupation of one spin channel; every orbital holds at most one electron.
fn channel_occupation(
    orbe: ArrayView1<f64>,
    n_sigma: f64,
    kt: f64,
    elec_tol: f64,
) -> Result<(f64, Array1<f64>), ScfError> {
    let n_orbs: usize = orbe.len();
    let (e_min, e_max): (f64, f64) = match (orbe.min(), orbe.max()) {
        (Ok(e_min), Ok(e_max)) => (*e_min, *e_max),
        _ => {
            return Err(ScfError::InternalNumericalFailure(String::from(
                "no orderable orbital energies",
            )))
        }
    };
    if n_sigma < -elec_tol {
        return Err(ScfError::MalformedStructure(format!(
            "negative number of electrons in a spin channel: {}",
            n_sigma
        )));
    }
    if n_sigma > n_orbs as f64 + elec_tol {
        return Err(ScfError::MalformedStructure(format!(
            "{} electrons do not fit into {} orbitals of a spin channel",
            n_sigma, n_orbs
        )));
    }
    // empty and completely filled channels
    if n_sigma <= f64::EPSILON {
        return Ok((e_min, Array1::zeros(n_orbs)));
    }
    if n_sigma >= n_orbs as f64 - f64::EPSILON * n_orbs as f64 {
        return Ok((e_max, Array1::ones(n_orbs)));
    }
    if kt == 0.0 {
        return Ok(step_occupation(orbe, n_sigma));
    }

    // the chemical potential lies between these bounds
    let lower: f64 = e_min - 40.0 * kt;
    let upper: f64 = e_max + 40.0 * kt;
    let func = |mu: f64| -> f64 { fa_minus_nelec(mu, orbe, kt, n_sigma) };
    // the sum over the orbitals cannot be resolved below a few ulps per summand
    let elec_tol: f64 = elec_tol.max(4.0 * n_orbs as f64 * f64::EPSILON * n_sigma.max(1.0));
    let mu_tol: f64 = elec_tol * kt / n_orbs as f64;
    let mu: f64 = match zbrent(func, lower, upper, mu_tol, defaults::FERMI_MAX_ITER) {
        Ok(mu) => mu,
        Err(RootNotFound::MaxIterations(mu)) => mu,
        Err(RootNotFound::NotBracketed) => {
            return Err(ScfError::OccupationNotConverged {
                iterations: 0,
                residual: func(lower).abs().max(func(upper).abs()),
            })
        }
    };
    let dn: f64 = func(mu);
    if !(dn.abs() <= elec_tol) {
        return Err(ScfError::OccupationNotConverged {
            iterations: defaults::FERMI_MAX_ITER,
            residual: dn.abs(),
        });
    }
    Ok((mu, orbe.mapv(|en| fermi(en, mu, kt))))
}

/// Find the occupation of single-particle states at T=0
fn step_occupation(orbe: ArrayView1<f64>, n_sigma: f64) -> (f64, Array1<f64>) {
    let orbe_vec: Vec<f64> = orbe.to_vec();
    let sort_indx: Vec<usize> = argsort(&orbe_vec);
    let mut fermi_occ: Array1<f64> = Array1::zeros(orbe.len());
    let mut remaining: f64 = n_sigma;
    let mut mu: f64 = orbe_vec[sort_indx[0]];
    let mut start: usize = 0;
    while start < sort_indx.len() && remaining > f64::EPSILON {
        // group of degenerate orbitals
        let e_start: f64 = orbe_vec[sort_indx[start]];
        let end: usize = sort_indx[start..]
            .iter()
            .position(|idx| orbe_vec[*idx] - e_start > defaults::DEGENERACY_TOL)
            .map_or(sort_indx.len(), |n| start + n);
        let n_degenerate: f64 = (end - start) as f64;
        let occ: f64 = (remaining / n_degenerate).min(1.0);
        for idx in sort_indx[start..end].iter() {
            fermi_occ[*idx] = occ;
        }
        remaining -= occ * n_degenerate;
        mu = e_start;
        start = end;
    }
    (mu, fermi_occ)
}

fn fermi(en: f64, mu: f64, kt: f64) -> f64 {
    let x: f64 = (en - mu) / kt;
    // avoid the overflow of exp for orbitals far above the Fermi level
    if x > 0.0 {
        let e: f64 = (-x).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + x.exp())
    }
}

fn fa_minus_nelec(mu: f64, orbe: ArrayView1<f64>, kt: f64, n_sigma: f64) -> f64 {
    // find the root of this function to enforce sum_a f_a = N_sigma
    let sum_fa: f64 = orbe.iter().map(|en| fermi(*en, mu, kt)).sum();
    sum_fa - n_sigma
}
