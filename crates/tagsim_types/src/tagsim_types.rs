//! Tagsim Types - Core data structures for the tag server
//!
//! This crate contains the pure data types shared by the item registry, the
//! simulation loop and whatever protocol shell sits in front of them:
//!
//! - [`VariantValue`] / [`VariantArray`] - tagged union over every supported item value
//! - [`VariantType`] / [`VariantKind`] - type tags used for sample generation and type checks
//! - [`Quality`], [`AccessRights`], [`ItemHandle`], [`PropertyId`], [`EuRange`]

mod types;
mod value;

pub use types::*;
pub use value::*;
