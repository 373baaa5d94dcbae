//! Secondary dependency sets: a recursive ANY/ALL satisfaction tree.

mod evaluation;
mod types;


pub use types::{Behavior, Dependency};
