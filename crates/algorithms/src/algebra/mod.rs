//! Grid algebra
//!
//! - **arithmetic**: weighted addition, in-place accumulation, masking
//! - **rescale**: min–max rescaling and the `[1, 10]` range normalisation
//! - **aggregate**: block aggregation to a coarser grid

mod aggregate;
mod arithmetic;
mod rescale;

pub use aggregate::{Aggregation, aggregate};
pub use arithmetic::{accumulate, add, mask};
pub use rescale::{Rescale, normalise_to_range, rescale};
