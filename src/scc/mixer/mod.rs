use ndarray::prelude::*;

mod broyden;
mod linear;
pub use broyden::BroydenMixer;
pub use linear::LinearMixer;

/// Trait that allows mixing of the atomic populations for the acceleration
/// of the SCC routine
pub trait Mixer {
    /// Combine the populations that went into the last iteration with the populations that
    /// came out of it. Returns the input for the next iteration and the norm of the
    /// residual (new - previous).
    fn mix(
        &mut self,
        previous: ArrayView1<f64>,
        new: ArrayView1<f64>,
        damping: f64,
    ) -> (Array1<f64>, f64);

    /// Forget the history of previous iterations.
    fn reset(&mut self);
}

impl<M: Mixer + ?Sized> Mixer for Box<M> {
    fn mix(
        &mut self,
        previous: ArrayView1<f64>,
        new: ArrayView1<f64>,
        damping: f64,
    ) -> (Array1<f64>, f64) {
        (**self).mix(previous, new, damping)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Euclidean norm of the difference of two population vectors.
pub fn residual_norm(previous: ArrayView1<f64>, new: ArrayView1<f64>) -> f64 {
    (&new - &previous).mapv(|x| x * x).sum().sqrt()
}

/// Available mixing schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerKind {
    Linear,
    /// modified Broyden mixing that keeps at most `memory` previous iterations
    Broyden { memory: usize },
}

impl Default for MixerKind {
    fn default() -> Self {
        MixerKind::Linear
    }
}

impl MixerKind {
    pub fn build(&self) -> Box<dyn Mixer + Send> {
        match self {
            MixerKind::Linear => Box::new(LinearMixer::default()),
            MixerKind::Broyden { memory } => Box::new(BroydenMixer::new(*memory)),
        }
    }
}
