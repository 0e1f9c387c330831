//! Items and the metadata records produced for them.
//!
//! - [`Item`]: the unit of work and its identifier classification
//! - [`SourceRecord`]: one source's sparse result
//! - [`FinalRecord`]: the reconciled result
//! - [`Field`]: the enumerated field table the merge is driven by

mod field;
mod item;
mod types;

pub use field::{absorb, Absorb, Absorbed, Field, FieldValue};
pub use item::{IdKind, Item};
pub use types::{FinalRecord, SourceRecord};
