//! Self-consistent charge (SCC) core of an extended tight-binding calculator.
//!
//! A [Calculator] combines a shared [Parametrization](param::Parametrization) with the
//! numerical settings of the SCC cycle and writes the outcome of a single point
//! calculation into a [Results](types::Results) container:
//!
//! ```no_run
//! use tbscc::{Calculator, Context, Results, Structure};
//! use nalgebra::Vector3;
//!
//! let mol = Structure::new(
//!     vec![1, 1],
//!     vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.4)],
//! )?;
//! let calc = Calculator::gfn2();
//! let mut results = Results::new();
//! calc.singlepoint(&mut Context::new(), &mol, &mut results)?;
//! println!("{:?}", results.energy());
//! # Ok::<(), tbscc::ScfError>(())
//! ```
pub mod basis;
pub mod calculator;
pub mod constants;
pub mod defaults;
pub mod error;
pub mod io;
pub mod param;
pub mod scc;
pub mod types;
pub mod utils;

pub use calculator::Calculator;
pub use error::ScfError;
pub use param::Parametrization;
pub use scc::{MixerKind, ScfState, ScfStatus};
pub use types::{Context, Results, Structure};
