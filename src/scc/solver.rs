use crate::defaults;
use crate::error::ScfError;
use ndarray::prelude::*;
use ndarray_linalg::{Eigh, UPLO};

/// Solver of the generalized eigenvalue problem H C = S C e. The overlap matrix is fixed
/// when the solver is created, the Hamiltonian changes in every iteration.
pub trait EigenSolver {
    /// Orbital energies in ascending order and the orbital coefficients (columns).
    fn solve(&self, h: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>), ScfError>;
}

/// Loewdin orthogonalization: the generalized problem is transformed to H' C' = C' e with
/// H' = X^T H X and X = S^-1/2. The orbitals are recovered as C = X C'.
#[derive(Debug, Clone)]
pub struct LowdinSolver {
    x: Array2<f64>,
}

impl LowdinSolver {
    /// Factorize the overlap matrix. Fails if S is not positive definite within the
    /// numerical tolerance.
    pub fn new(s: ArrayView2<f64>) -> Result<Self, ScfError> {
        if s.iter().any(|x| !x.is_finite()) {
            return Err(ScfError::InternalNumericalFailure(String::from(
                "the overlap matrix contains non-finite values",
            )));
        }
        let (eigvals, eigvecs): (Array1<f64>, Array2<f64>) = s.eigh(UPLO::Upper)?;
        let min_eigenvalue: f64 = eigvals.iter().copied().fold(f64::INFINITY, f64::min);
        if !(min_eigenvalue > defaults::OVERLAP_EIGENVALUE_TOL) {
            return Err(ScfError::SingularOverlap { min_eigenvalue });
        }
        // X = U s^-1/2 U^T
        let scaled: Array2<f64> = &eigvecs * &eigvals.mapv(|x| 1.0 / x.sqrt());
        let x: Array2<f64> = scaled.dot(&eigvecs.t());
        Ok(Self { x })
    }

    pub fn transformation(&self) -> ArrayView2<f64> {
        self.x.view()
    }
}

impl EigenSolver for LowdinSolver {
    fn solve(&self, h: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>), ScfError> {
        if h.iter().any(|x| !x.is_finite()) {
            return Err(ScfError::InternalNumericalFailure(String::from(
                "the Hamiltonian contains non-finite values",
            )));
        }
        // H' = X^t.H.X
        let h_prime: Array2<f64> = self.x.t().dot(&h).dot(&self.x);
        let (orbe, c_prime): (Array1<f64>, Array2<f64>) = h_prime.eigh(UPLO::Upper)?;
        // C = X.C'
        let orbs: Array2<f64> = self.x.dot(&c_prime);
        Ok((orbe, orbs))
    }
}

/// Solve H C = S C e in one step.
pub fn solve_generalized(
    h: ArrayView2<f64>,
    s: ArrayView2<f64>,
) -> Result<(Array1<f64>, Array2<f64>), ScfError> {
    LowdinSolver::new(s)?.solve(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::rngs::StdRng;

    #[test]
    fn orbitals_are_s_orthonormal() {
        let s: Array2<f64> = array![[1.0, 0.4, 0.1], [0.4, 1.0, 0.3], [0.1, 0.3, 1.0]];
        let h: Array2<f64> = array![[-0.5, -0.2, 0.0], [-0.2, -0.4, -0.1], [0.0, -0.1, -0.3]];
        let (orbe, orbs) = solve_generalized(h.view(), s.view()).unwrap();
        assert_relative_eq!(orbs.t().dot(&s).dot(&orbs), Array2::<f64>::eye(3), epsilon = 1e-12);
        assert_relative_eq!(
            orbs.t().dot(&h).dot(&orbs),
            Array2::from_diag(&orbe),
            epsilon = 1e-12
        );
        assert!(orbe[0] <= orbe[1] && orbe[1] <= orbe[2]);
    }

    #[test]
    fn two_level_system() {
        // H2-like model: e = (h +- t) / (1 +- s)
        let s: Array2<f64> = array![[1.0, 0.5], [0.5, 1.0]];
        let h: Array2<f64> = array![[-0.5, -0.4], [-0.4, -0.5]];
        let (orbe, _) = solve_generalized(h.view(), s.view()).unwrap();
        assert_relative_eq!(orbe[0], -0.9 / 1.5, epsilon = 1e-12);
        assert_relative_eq!(orbe[1], -0.1 / 0.5, epsilon = 1e-12);
    }

    #[test]
    fn random_positive_definite_overlap() {
        let n: usize = 12;
        let mut rng: StdRng = StdRng::seed_from_u64(42);
        let a: Array2<f64> = Array2::random_using((n, n), Uniform::new(-1.0, 1.0), &mut rng);
        // S = A A^T / n + 1/2 is symmetric and positive definite
        let s: Array2<f64> = a.dot(&a.t()) / n as f64 + Array2::<f64>::eye(n) * 0.5;
        let b: Array2<f64> = Array2::random_using((n, n), Uniform::new(-1.0, 1.0), &mut rng);
        let h: Array2<f64> = &b + &b.t();
        let solver = LowdinSolver::new(s.view()).unwrap();
        let x = solver.transformation();
        assert_relative_eq!(x.dot(&s).dot(&x), Array2::<f64>::eye(n), epsilon = 1e-10);
        let (orbe, orbs) = solver.solve(h.view()).unwrap();
        // H C = S C e
        let hc: Array2<f64> = h.dot(&orbs);
        let sce: Array2<f64> = s.dot(&orbs) * &orbe;
        assert_relative_eq!(hc, sce, epsilon = 1e-10);
    }

    #[test]
    fn singular_overlap_is_detected() {
        let s: Array2<f64> = array![[1.0, 1.0], [1.0, 1.0]];
        match LowdinSolver::new(s.view()) {
            Err(ScfError::SingularOverlap { min_eigenvalue }) => assert!(min_eigenvalue < 1e-10),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_finite_hamiltonian_is_rejected() {
        let solver = LowdinSolver::new(Array2::<f64>::eye(2).view()).unwrap();
        let h: Array2<f64> = array![[f64::NAN, 0.0], [0.0, 1.0]];
        assert!(matches!(
            solver.solve(h.view()),
            Err(ScfError::InternalNumericalFailure(_))
        ));
    }
}
