use crate::basis::{overlap_block, BasisSet};
use crate::param::Parametrization;
use crate::types::Structure;
use itertools::Itertools;
use ndarray::prelude::*;
use rayon::prelude::*;

/// Overlap and Hamiltonian block between two atoms together with their orbital offsets
struct PairBlock {
    offset_a: usize,
    offset_b: usize,
    s: Array2<f64>,
    h0: Array2<f64>,
}

/// Compute the overlap matrix and the charge-independent Hamiltonian of the structure.
///
/// The diagonal of H0 contains the shell self-energies, elements between orbitals of
/// different atoms are given by the extended Hueckel expression
///
/// H0_mn = k_ll' k_AB 1/2 (h_m + h_n) S_mn (1 + k_EN (EN_A - EN_B)^2)
///
/// while off-diagonal elements within one atom vanish. The atom pairs are
/// evaluated in parallel.
pub fn h0_and_s(
    mol: &Structure,
    basis: &BasisSet,
    param: &Parametrization,
) -> (Array2<f64>, Array2<f64>) {
    let n_orbs: usize = basis.n_orbs;
    let offsets: Vec<usize> = basis.atom_offsets();
    let positions = mol.positions();
    let numbers: &[u8] = mol.numbers();
    let k_en: f64 = param.model().k_en;

    let pairs: Vec<(usize, usize)> = (0..mol.n_atoms()).tuple_combinations().collect();
    let blocks: Vec<PairBlock> = pairs
        .par_iter()
        .map(|(i, j)| {
            let mut s: Array2<f64> = Array2::zeros((basis.atom_n_orbs[*i], basis.atom_n_orbs[*j]));
            let mut h0: Array2<f64> = Array2::zeros(s.raw_dim());
            let (z_i, z_j) = (numbers[*i], numbers[*j]);
            let en_i: f64 = param.element(z_i).map_or(0.0, |e| e.electronegativity);
            let en_j: f64 = param.element(z_j).map_or(0.0, |e| e.electronegativity);
            let en_factor: f64 = 1.0 + k_en * (en_i - en_j).powi(2);
            let k_pair: f64 = param.pair_scaling(z_i, z_j);

            for sh_a in basis.atom_shells[*i].iter().map(|idx| &basis.shells[*idx]) {
                for sh_b in basis.atom_shells[*j].iter().map(|idx| &basis.shells[*idx]) {
                    let block: Array2<f64> =
                        overlap_block(&sh_a.cgto, &positions[*i], &sh_b.cgto, &positions[*j]);
                    let k_ll: f64 = param.shell_pair_constant(sh_a.l, sh_b.l);
                    let h_avg: f64 = 0.5 * (sh_a.self_energy + sh_b.self_energy);
                    let row: usize = sh_a.offset - offsets[*i];
                    let col: usize = sh_b.offset - offsets[*j];
                    let rows = row..row + sh_a.n_orbs();
                    let cols = col..col + sh_b.n_orbs();
                    s.slice_mut(s![rows.clone(), cols.clone()]).assign(&block);
                    h0.slice_mut(s![rows, cols])
                        .assign(&block.mapv(|x| k_ll * k_pair * h_avg * x * en_factor));
                }
            }
            PairBlock {
                offset_a: offsets[*i],
                offset_b: offsets[*j],
                s,
                h0,
            }
        })
        .collect();

    let mut s: Array2<f64> = Array2::eye(n_orbs);
    let mut h0: Array2<f64> = Array2::zeros((n_orbs, n_orbs));

    // one-center blocks
    for (atom, shells) in basis.atom_shells.iter().enumerate() {
        for sh_a in shells.iter().map(|idx| &basis.shells[*idx]) {
            for mu in sh_a.offset..sh_a.offset + sh_a.n_orbs() {
                h0[[mu, mu]] = sh_a.self_energy;
            }
            // shells of equal angular momentum on the same atom are not orthogonal
            for sh_b in shells.iter().map(|idx| &basis.shells[*idx]) {
                if sh_a.offset < sh_b.offset && sh_a.l == sh_b.l {
                    let block: Array2<f64> = overlap_block(
                        &sh_a.cgto,
                        &positions[atom],
                        &sh_b.cgto,
                        &positions[atom],
                    );
                    let (ra, rb) = (sh_a.offset, sh_b.offset);
                    s.slice_mut(s![ra..ra + sh_a.n_orbs(), rb..rb + sh_b.n_orbs()])
                        .assign(&block);
                    s.slice_mut(s![rb..rb + sh_b.n_orbs(), ra..ra + sh_a.n_orbs()])
                        .assign(&block.t());
                }
            }
        }
    }

    // two-center blocks
    for block in blocks.into_iter() {
        let (ra, rb) = (block.offset_a, block.offset_b);
        let (na, nb) = block.s.dim();
        s.slice_mut(s![ra..ra + na, rb..rb + nb]).assign(&block.s);
        s.slice_mut(s![rb..rb + nb, ra..ra + na]).assign(&block.s.t());
        h0.slice_mut(s![ra..ra + na, rb..rb + nb]).assign(&block.h0);
        h0.slice_mut(s![rb..rb + nb, ra..ra + na]).assign(&block.h0.t());
    }

    (s, h0)
}
