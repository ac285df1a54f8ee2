use crate::scc::mixer::{residual_norm, Mixer};
use ndarray::prelude::*;

/// Simple damping: q_next = q_prev + d (q_new - q_prev)
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMixer;

impl Mixer for LinearMixer {
    fn mix(
        &mut self,
        previous: ArrayView1<f64>,
        new: ArrayView1<f64>,
        damping: f64,
    ) -> (Array1<f64>, f64) {
        let mixed: Array1<f64> = &previous + &((&new - &previous) * damping);
        (mixed, residual_norm(previous, new))
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_mixing() {
        let mut mixer = LinearMixer::default();
        let previous: Array1<f64> = array![0.0, 1.0];
        let new: Array1<f64> = array![1.0, 1.0];
        let (mixed, residual) = mixer.mix(previous.view(), new.view(), 0.4);
        assert_relative_eq!(mixed, array![0.4, 1.0], epsilon = 1e-15);
        assert_relative_eq!(residual, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn full_damping_replaces_the_input() {
        let mut mixer = LinearMixer::default();
        let previous: Array1<f64> = array![0.3, -0.3, 0.1];
        let new: Array1<f64> = array![-0.2, 0.5, 0.0];
        let (mixed, _) = mixer.mix(previous.view(), new.view(), 1.0);
        assert_relative_eq!(mixed, new, epsilon = 1e-15);
    }
}
