//! Go code generation from the resolved meta-model catalog.

mod emit;
mod ident;

pub use emit::GoPrinter;
pub use ident::go_pascal;

use std::io::Write;

use crate::error::Error;
use crate::metamodel::Model;

/// Prints Go struct declarations for `name` and every structure it
/// transitively references to `out`.
pub fn generate<W: Write>(model: &Model, name: &str, out: W) -> Result<(), Error> {
    GoPrinter::new(model, out).print_structure(name)
}
