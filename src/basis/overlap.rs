use crate::basis::sto_ng::ContractedGaussian;
use nalgebra::Vector3;
use ndarray::prelude::*;
use std::f64::consts::PI;

/// Overlap integrals between the Cartesian components of two contracted shells.
/// The block has the shape [2 la + 1, 2 lb + 1]; p functions are ordered x, y, z.
pub fn overlap_block(
    cgto_a: &ContractedGaussian,
    pos_a: &Vector3<f64>,
    cgto_b: &ContractedGaussian,
    pos_b: &Vector3<f64>,
) -> Array2<f64> {
    let dim_a: usize = 2 * cgto_a.l as usize + 1;
    let dim_b: usize = 2 * cgto_b.l as usize + 1;
    let mut block: Array2<f64> = Array2::zeros((dim_a, dim_b));
    let r2: f64 = (pos_a - pos_b).norm_squared();

    for (alpha_a, c_a) in cgto_a.alpha.iter().zip(cgto_a.coeff.iter()) {
        for (alpha_b, c_b) in cgto_b.alpha.iter().zip(cgto_b.coeff.iter()) {
            let p: f64 = alpha_a + alpha_b;
            let mu: f64 = alpha_a * alpha_b / p;
            let s00: f64 = (PI / p).powf(1.5) * (-mu * r2).exp();
            // Gaussian product center
            let center: Vector3<f64> = (pos_a * *alpha_a + pos_b * *alpha_b) / p;
            let pa: Vector3<f64> = center - pos_a;
            let pb: Vector3<f64> = center - pos_b;
            let cc: f64 = c_a * c_b * s00;

            match (cgto_a.l, cgto_b.l) {
                (0, 0) => block[[0, 0]] += cc,
                (1, 0) => {
                    for i in 0..3 {
                        block[[i, 0]] += cc * pa[i];
                    }
                }
                (0, 1) => {
                    for j in 0..3 {
                        block[[0, j]] += cc * pb[j];
                    }
                }
                _ => {
                    for i in 0..3 {
                        for j in 0..3 {
                            let delta: f64 = if i == j { 0.5 / p } else { 0.0 };
                            block[[i, j]] += cc * (pa[i] * pb[j] + delta);
                        }
                    }
                }
            }
        }
    }
    block
}
