//! Declaration XML compilation for CI Load entries.
//!
//! - **compiler**: the [`DeclarationCompiler`] entry point
//! - **defaults**: node-type-keyed default-value tables
//! - **shipment** / **parts**: document-kind emission

pub mod compiler;
pub mod defaults;
mod parts;
mod shipment;
mod writer;

pub use compiler::{DeclarationCompiler, DocumentKind};
pub use defaults::{FieldMap, NodeDefaults, NodeTag};
