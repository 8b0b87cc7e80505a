//! # formulary-core
//!
//! Core data structures for the formulary named-function catalog.
//!
//! This crate provides the fundamental types shared by the other formulary crates:
//! - [`FormulaDefinition`] - A named function: name, ordered parameters and formula body
//! - [`ParameterSpec`] - One positional parameter of a named function
//! - [`Catalog`] - The ordered collection of definitions known to one documentation build
//!
//! ## Example
//!
//! ```rust
//! use formulary_core::{Catalog, FormulaDefinition, ParameterSpec};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(FormulaDefinition::new("BLANK", "IF(,,)")).unwrap();
//! catalog
//!     .insert(
//!         FormulaDefinition::new("WRAP", "VSTACK(x, BLANK())")
//!             .with_parameter(ParameterSpec::new("x")),
//!     )
//!     .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.get("WRAP").unwrap().parameters.len(), 1);
//! ```

pub mod catalog;
pub mod definition;
pub mod error;

pub use catalog::Catalog;
pub use definition::{FormulaDefinition, ParameterSpec};
pub use error::{Error, Result};
