//! Catalog of named function definitions

use crate::definition::FormulaDefinition;
use crate::error::{Error, Result};
use ahash::AHashMap;

/// Ordered collection of named functions with lookup by name
///
/// Definitions keep their insertion order (the order the loader supplied them in)
/// and are also addressable by a stable index, which the expansion engine uses as
/// its arena key.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    definitions: Vec<FormulaDefinition>,
    /// Name → index into `definitions`. Names are case-sensitive.
    index: AHashMap<String, usize>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, rejecting empty and duplicate names
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = FormulaDefinition>,
    {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    /// Add a definition
    ///
    /// Returns an error if the name is empty or already present
    pub fn insert(&mut self, definition: FormulaDefinition) -> Result<usize> {
        if definition.name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.index.contains_key(&definition.name) {
            return Err(Error::DuplicateName(definition.name));
        }

        let idx = self.definitions.len();
        self.index.insert(definition.name.clone(), idx);
        self.definitions.push(definition);
        Ok(idx)
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> Option<&FormulaDefinition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Get a definition by index
    pub fn get_index(&self, idx: usize) -> Option<&FormulaDefinition> {
        self.definitions.get(idx)
    }

    /// Get the index of a definition by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Check if a name is defined
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FormulaDefinition> {
        self.definitions.iter()
    }

    /// Iterate over names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    /// Get the number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FormulaDefinition;
    type IntoIter = std::slice::Iter<'a, FormulaDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
