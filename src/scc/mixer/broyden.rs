use crate::defaults;
use crate::scc::mixer::{residual_norm, Mixer};
use log::warn;
use ndarray::prelude::*;
use ndarray_linalg::Inverse;
use std::collections::VecDeque;

/// Difference vectors of one previous iteration
#[derive(Debug, Clone)]
struct BroydenStep {
    // normalized change of the residual |dF>
    df: Array1<f64>,
    // |u> = alpha |dF> + |dq_inp> / |dF|
    uu: Array1<f64>,
    weight: f64,
}

/// Modified Broyden mixer
///
/// The algorithm is based on the implementation in the DFTB+ Code
/// see https://github.com/dftbplus/dftbplus/blob/master/prog/dftb%2B/lib_mixer/broydenmixer.F90
/// and J. Chem. Phys. 152, 124101 (2020); https://doi.org/10.1063/1.5143190
///
/// Only the last `memory` iterations are kept, older ones are dropped first.
#[derive(Debug, Clone)]
pub struct BroydenMixer {
    memory: usize,
    omega0: f64,
    // minimal weight allowed
    min_weight: f64,
    // maximal weight allowed
    max_weight: f64,
    // numerator of the weight
    weight_factor: f64,
    // input populations and residual of the last iteration
    last: Option<(Array1<f64>, Array1<f64>)>,
    history: VecDeque<BroydenStep>,
}

impl Default for BroydenMixer {
    fn default() -> Self {
        Self::new(defaults::BROYDEN_MEMORY)
    }
}

impl BroydenMixer {
    pub fn new(memory: usize) -> Self {
        Self {
            memory,
            omega0: defaults::BROYDEN_OMEGA0,
            min_weight: defaults::BROYDEN_MIN_WEIGHT,
            max_weight: defaults::BROYDEN_MAX_WEIGHT,
            weight_factor: defaults::BROYDEN_WEIGHT_FACTOR,
            last: None,
            history: VecDeque::with_capacity(memory),
        }
    }

    /// Number of stored difference vectors.
    pub fn n_stored(&self) -> usize {
        self.history.len()
    }

    fn weight(&self, q_diff: &Array1<f64>) -> f64 {
        let norm: f64 = q_diff.dot(q_diff).sqrt();
        let ww: f64 = if norm > self.weight_factor / self.max_weight {
            self.weight_factor / norm
        } else {
            self.max_weight
        };
        ww.max(self.min_weight)
    }

    fn simple_mix(q_inp: ArrayView1<f64>, q_diff: &Array1<f64>, alpha: f64) -> Array1<f64> {
        &q_inp + &(q_diff * alpha)
    }
}

impl Mixer for BroydenMixer {
    /// Mixes the input populations with the residual of the current diagonalization
    fn mix(
        &mut self,
        previous: ArrayView1<f64>,
        new: ArrayView1<f64>,
        damping: f64,
    ) -> (Array1<f64>, f64) {
        let alpha: f64 = damping;
        let q_diff: Array1<f64> = &new - &previous;
        let residual: f64 = residual_norm(previous, new);

        // without history this is a simple mixer
        if self.memory <= 1 {
            return (Self::simple_mix(previous, &q_diff, alpha), residual);
        }
        // First iteration: simple mix and storage of qInp and qDiff
        let (q_inp_last, q_diff_last) = match self.last.take() {
            None => {
                self.last = Some((previous.to_owned(), q_diff.clone()));
                return (Self::simple_mix(previous, &q_diff, alpha), residual);
            }
            Some(last) => last,
        };

        let ww: f64 = self.weight(&q_diff);

        // Build |dF(m-1)>
        let mut df: Array1<f64> = &q_diff - &q_diff_last;
        let inv_norm: f64 = 1.0 / df.dot(&df).sqrt().max(1e-12);
        df *= inv_norm;

        // Create |u(m-1)>
        let uu: Array1<f64> = &df * alpha + &((&previous - &q_inp_last) * inv_norm);

        if self.history.len() + 1 >= self.memory {
            self.history.pop_front();
        }
        self.history.push_back(BroydenStep { df, uu, weight: ww });

        // Build a, beta, c and gamma
        let n: usize = self.history.len();
        let mut beta: Array2<f64> = Array2::zeros((n, n));
        let mut cc: Array1<f64> = Array1::zeros(n);
        for (i, step_i) in self.history.iter().enumerate() {
            cc[i] = step_i.weight * step_i.df.dot(&q_diff);
            for (j, step_j) in self.history.iter().enumerate().skip(i) {
                let a_ij: f64 = step_i.df.dot(&step_j.df);
                beta[[i, j]] = step_i.weight * step_j.weight * a_ij;
                beta[[j, i]] = beta[[i, j]];
            }
            beta[[i, i]] += self.omega0.powi(2);
        }

        // Save charge vectors before overwriting
        self.last = Some((previous.to_owned(), q_diff.clone()));

        let beta: Array2<f64> = match beta.inv() {
            Ok(inverse) => inverse,
            Err(err) => {
                warn!("Broyden mixer: {}, continue with simple mixing", err);
                self.history.clear();
                return (Self::simple_mix(previous, &q_diff, alpha), residual);
            }
        };
        let gamma: Array1<f64> = cc.dot(&beta);

        // Build new vector
        let mut q_next: Array1<f64> = Self::simple_mix(previous, &q_diff, alpha);
        for (step, gamma_i) in self.history.iter().zip(gamma.iter()) {
            q_next.scaled_add(-step.weight * gamma_i, &step.uu);
        }
        (q_next, residual)
    }

    fn reset(&mut self) {
        self.last = None;
        self.history.clear();
    }
}
