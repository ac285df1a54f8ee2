use crate::error::ScfError;
use ndarray::prelude::*;

/// P_mn = sum_a f_a C_ma C_na
pub fn density_matrix(orbs: ArrayView2<f64>, f: ArrayView1<f64>) -> Array2<f64> {
    let weighted: Array2<f64> = &orbs * &f;
    weighted.dot(&orbs.t())
}

/// Indices of the highest occupied and the lowest unoccupied orbital (energies in
/// ascending order). An orbital counts as occupied if it holds more than half an electron.
pub fn get_frontier_orbitals_from_occ(f: ArrayView1<f64>) -> (Option<usize>, Option<usize>) {
    let n_occ: usize = f.iter().filter(|x| **x > 0.5).count();
    let homo: Option<usize> = n_occ.checked_sub(1);
    let lumo: Option<usize> = if n_occ < f.len() { Some(n_occ) } else { None };
    (homo, lumo)
}

/// HOMO-LUMO gap in Hartree, if both orbitals exist
pub fn get_homo_lumo_gap(orbe: ArrayView1<f64>, f: ArrayView1<f64>) -> Option<f64> {
    match get_frontier_orbitals_from_occ(f) {
        (Some(homo), Some(lumo)) => Some(orbe[lumo] - orbe[homo]),
        _ => None,
    }
}

/// Number of electrons for the neutral reference populations and the total charge. The
/// electrons have to be distributable over the alpha and beta orbitals.
pub fn get_electron_count(
    reference_populations: ArrayView1<f64>,
    charge: f64,
    n_unpaired: usize,
    n_orbs: usize,
) -> Result<f64, ScfError> {
    let n_elec: f64 = reference_populations.sum() - charge;
    let n_u: f64 = n_unpaired as f64;
    if !n_elec.is_finite() || n_elec < 0.0 {
        return Err(ScfError::MalformedStructure(format!(
            "charge {} leaves {} electrons",
            charge, n_elec
        )));
    }
    if n_u > n_elec {
        return Err(ScfError::MalformedStructure(format!(
            "{} unpaired electrons but only {} electrons",
            n_unpaired, n_elec
        )));
    }
    // integer electron counts need the right parity for the multiplicity
    if (n_elec - n_elec.round()).abs() < 1e-10 && (n_elec.round() as i64 - n_unpaired as i64) % 2 != 0
    {
        return Err(ScfError::MalformedStructure(format!(
            "{} electrons are incompatible with a multiplicity of {}",
            n_elec.round(),
            n_unpaired + 1
        )));
    }
    if 0.5 * (n_elec + n_u) > n_orbs as f64 + 1e-10 {
        return Err(ScfError::MalformedStructure(format!(
            "{} electrons do not fit into {} orbitals",
            n_elec, n_orbs
        )));
    }
    Ok(n_elec)
}
