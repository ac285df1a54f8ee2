use crate::constants::HARTREE_TO_EV;
use crate::scc::helpers::get_homo_lumo_gap;
use crate::utils::Timer;
use log::{debug, info, trace};
use ndarray::prelude::*;

pub fn print_scc_init(max_iter: usize, kt: f64, rep_energy: f64, disp_energy: f64) {
    info!("{:^80}", "");
    info!("{: ^80}", "SCC-Routine");
    info!("{:-^80}", "");
    info!("{: <25} {}", "max. iterations:", max_iter);
    info!("{: <25} {:.6e} Hartree", "electronic temperature:", kt);
    info!("{: <25} {:.14} Hartree", "repulsive energy:", rep_energy);
    info!("{: <25} {:.14} Hartree", "dispersion energy:", disp_energy);
    info!("{:^80}", "");
    info!(
        "{: <45} ",
        "SCC Iterations: all quantities are in atomic units"
    );
    info!("{:-^64} ", "");
    info!(
        "{: <5} {: >20} {: >18} {: >18}",
        "Iter.", "SCC Energy", "Energy diff.", "dq residual"
    );
    info!("{:-^64} ", "");
}

pub fn print_energies_at_iteration(iter: usize, energy: f64, energy_diff: f64, residual: f64) {
    info!(
        "{: >5} {:>20.12} {:>18.10e} {:>18.10e}",
        iter, energy, energy_diff, residual
    );
}

pub fn print_scc_end(
    timer: &Timer,
    converged: bool,
    iterations: usize,
    total_energy: f64,
    orbe: ArrayView1<f64>,
    f: ArrayView1<f64>,
) {
    info!("{:-^64} ", "");
    if converged {
        info!("{: ^64}", format!("SCC converged in {} iterations", iterations));
    } else {
        info!("{: ^64}", format!("SCC not converged after {} iterations", iterations));
    }
    info!("{:^80} ", "");
    info!("final energy: {:18.14} Hartree", total_energy);
    if let Some(gap) = get_homo_lumo_gap(orbe, f) {
        debug!("HOMO-LUMO gap: {:18.14} eV", gap * HARTREE_TO_EV);
    }
    info!("{:-<80} ", "");
    info!("{}", timer);
}

pub fn print_orbital_information(orbe: ArrayView1<f64>, f: ArrayView1<f64>) {
    trace!("{:^80} ", "");
    trace!(
        "{:^8} {:^6} {:>18.14} | {:^8} {:^6} {:>18.14}",
        "Orb.",
        "Occ.",
        "Energy/Hartree",
        "Orb.",
        "Occ.",
        "Energy/Hartree"
    );
    trace!("{:-^71} ", "");
    let n_rows: usize = (orbe.len() + 1) / 2;
    for i in 0..n_rows {
        let j: usize = i + n_rows;
        if j < orbe.len() {
            trace!(
                "MO:{:>5} {:>6} {:>18.14} | MO:{:>5} {:>6} {:>18.14}",
                i + 1,
                format!("{:.4}", f[i]),
                orbe[i],
                j + 1,
                format!("{:.4}", f[j]),
                orbe[j]
            );
        } else {
            trace!(
                "MO:{:>5} {:>6} {:>18.14} |",
                i + 1,
                format!("{:.4}", f[i]),
                orbe[i]
            );
        }
    }
    trace!("{:-^71} ", "");
}

pub fn print_charges(charges: ArrayView1<f64>, dq: ArrayView1<f64>) {
    debug!("{: <35} ", "partial charges and population changes");
    debug!("{:-^35}", "");
    for (idx, (q, dq_i)) in charges.iter().zip(dq.iter()).enumerate() {
        debug!("Atom {: >4} q: {:>+.6} dq: {:>+.6}", idx + 1, q, dq_i);
    }
    debug!("{:-^35}", "");
}
