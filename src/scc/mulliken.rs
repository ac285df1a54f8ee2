use ndarray::prelude::*;

/// Mulliken populations of the atoms: q_A = sum_{m in A} sum_n P_mn S_mn
pub fn mulliken(p: ArrayView2<f64>, s: ArrayView2<f64>, orbs_per_atom: &[usize]) -> Array1<f64> {
    let q_ao: Array1<f64> = (&p * &s).sum_axis(Axis(1));
    let mut q: Array1<f64> = Array1::zeros(orbs_per_atom.len());
    let mut mu: usize = 0;
    for (a, n_orbs) in orbs_per_atom.iter().enumerate() {
        q[a] = q_ao.slice(s![mu..mu + n_orbs]).sum();
        mu += n_orbs;
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn populations_sum_to_the_trace_of_ps() {
        let s: Array2<f64> = array![[1.0, 0.3, 0.1], [0.3, 1.0, 0.2], [0.1, 0.2, 1.0]];
        let p: Array2<f64> = array![[1.2, 0.5, 0.1], [0.5, 0.7, 0.3], [0.1, 0.3, 0.4]];
        let q = mulliken(p.view(), s.view(), &[2, 1]);
        assert_relative_eq!(q.sum(), p.dot(&s).diag().sum(), epsilon = 1e-14);
        // atom 2: P_22 + P_20 S_20 + P_21 S_21
        assert_relative_eq!(q[1], 0.4 + 0.1 * 0.1 + 0.3 * 0.2, epsilon = 1e-14);
    }
}
