//! A module exporting useful traits defined in this crate.

pub use crate::clock::{Clock, Reference};
pub use crate::transport::{Transport, TransportExt};
