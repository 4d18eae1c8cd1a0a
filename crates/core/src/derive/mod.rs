//! Table-driven rewriting of event text into the derived variant.

mod table;
mod transformer;

pub use table::{ContextTemplate, Rewrite, RewriteTable};
pub use transformer::Transformer;
