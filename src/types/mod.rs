mod context;
mod property;
mod results;
mod structure;

pub use context::{Context, Severity};
pub use property::Property;
pub use results::{keys, Results};
pub use structure::Structure;
