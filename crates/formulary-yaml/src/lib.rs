//! # formulary-yaml
//!
//! Loads a formula catalog from a directory of YAML files, one named function
//! per file.
//!
//! ```yaml
//! name: DENSIFYROWS
//! version: 1.0.0
//! description: Removes rows that are entirely blank
//! parameters:
//!   - name: range
//!     description: The range to densify
//!     example: A1:D20
//! formula: |
//!   DENSIFY(range, "rows") // keep non-empty rows
//! notes: Optional free text.
//! ```

mod comments;
mod error;
mod options;
mod reader;

pub use comments::strip_comments;
pub use error::{YamlError, YamlResult};
pub use options::YamlReadOptions;
pub use reader::YamlReader;
