mod zbrent;

pub use zbrent::{zbrent, RootNotFound};
use std::fmt;
use std::time::Instant;

/// A simple timer based on std::time::Instant, to implement the std::fmt::Display trait on
pub struct Timer {
    time: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer {
            time: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.time.elapsed().as_secs_f32()
    }
}

// Implement `Display` for Instant.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:>68} {:>8.2} s",
            "elapsed time:",
            self.elapsed_secs()
        )
    }
}

/// Indices that sort the slice in ascending order. NaN entries are placed last.
pub fn argsort(v: &[f64]) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();
    idx.sort_by(|&i, &j| v[i].total_cmp(&v[j]));
    idx
}
