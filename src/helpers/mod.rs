//! Office Open XML package plumbing shared by the readers.

pub mod xml;
pub(crate) mod zip;
