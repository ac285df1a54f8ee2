use std::f64::consts::PI;

/// Contracted Cartesian Gaussian that approximates a Slater function by three primitives.
/// The coefficients include the normalization of the primitives and of the contraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractedGaussian {
    pub l: u8,
    pub alpha: [f64; 3],
    pub coeff: [f64; 3],
}

// STO-3G expansions for a Slater exponent of 1.0, exponents scale with zeta^2
const ALPHA_1S: [f64; 3] = [2.227660584, 0.405771156, 0.109818];
const COEFF_1S: [f64; 3] = [0.154328967, 0.535328142, 0.444634542];

const ALPHA_2SP: [f64; 3] = [0.994202729, 0.231031354, 0.0751386];
const COEFF_2S: [f64; 3] = [-0.099967230, 0.399512826, 0.700115469];
const COEFF_2P: [f64; 3] = [0.155916275, 0.607683719, 0.391957393];

const ALPHA_3SP: [f64; 3] = [0.4942027, 0.1379644, 0.0540];
const COEFF_3S: [f64; 3] = [-0.2196203, 0.2255954, 0.9003984];
const COEFF_3P: [f64; 3] = [0.0105876, 0.5951670, 0.4620010];

/// Normalization constant of a Cartesian primitive with angular momentum 0 or 1.
fn primitive_norm(alpha: f64, l: u8) -> f64 {
    let s_norm: f64 = (2.0 * alpha / PI).powf(0.75);
    match l {
        0 => s_norm,
        _ => s_norm * 2.0 * alpha.sqrt(),
    }
}

/// Overlap of a contracted function with itself on the same center (for the x component
/// in case of p functions).
fn self_overlap(l: u8, alpha: &[f64; 3], coeff: &[f64; 3]) -> f64 {
    let mut s: f64 = 0.0;
    for (ai, ci) in alpha.iter().zip(coeff.iter()) {
        for (aj, cj) in alpha.iter().zip(coeff.iter()) {
            let p: f64 = ai + aj;
            let s00: f64 = (PI / p).powf(1.5);
            let angular: f64 = if l == 0 { 1.0 } else { 0.5 / p };
            s += ci * cj * angular * s00;
        }
    }
    s
}

/// Expand a Slater function with principal quantum number `n`, angular momentum `l` and
/// exponent `zeta` into three normalized Gaussians. Returns None for shells without an
/// expansion (n > 3 or l > 1).
pub fn slater_to_gauss(n: u8, l: u8, zeta: f64) -> Option<ContractedGaussian> {
    let (alpha, coeff) = match (n, l) {
        (1, 0) => (ALPHA_1S, COEFF_1S),
        (2, 0) => (ALPHA_2SP, COEFF_2S),
        (2, 1) => (ALPHA_2SP, COEFF_2P),
        (3, 0) => (ALPHA_3SP, COEFF_3S),
        (3, 1) => (ALPHA_3SP, COEFF_3P),
        _ => return None,
    };
    let zeta2: f64 = zeta * zeta;
    let mut scaled_alpha: [f64; 3] = [0.0; 3];
    let mut scaled_coeff: [f64; 3] = [0.0; 3];
    for i in 0..3 {
        scaled_alpha[i] = alpha[i] * zeta2;
        scaled_coeff[i] = coeff[i] * primitive_norm(scaled_alpha[i], l);
    }
    // the tabulated coefficients are only normalized to a few digits
    let norm: f64 = self_overlap(l, &scaled_alpha, &scaled_coeff).sqrt().recip();
    scaled_coeff.iter_mut().for_each(|c| *c *= norm);

    Some(ContractedGaussian {
        l,
        alpha: scaled_alpha,
        coeff: scaled_coeff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn contractions_are_normalized() {
        for (n, l, zeta) in [(1, 0, 1.23), (2, 0, 2.1), (2, 1, 1.8), (3, 0, 2.2), (3, 1, 1.9)] {
            let cgto = slater_to_gauss(n, l, zeta).unwrap();
            assert_relative_eq!(
                self_overlap(l, &cgto.alpha, &cgto.coeff),
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn exponents_scale_with_zeta() {
        let cgto = slater_to_gauss(1, 0, 2.0).unwrap();
        assert_relative_eq!(cgto.alpha[0], 4.0 * ALPHA_1S[0], epsilon = 1e-12);
    }

    #[test]
    fn no_expansion_for_d_shells() {
        assert!(slater_to_gauss(3, 2, 1.0).is_none());
        assert!(slater_to_gauss(4, 0, 1.0).is_none());
    }
}
