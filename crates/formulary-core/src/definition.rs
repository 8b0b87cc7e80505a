//! Named function definitions
//!
//! A named function is defined once as a parameterized formula body and can be
//! called by name from the bodies of other definitions in the same catalog.
//!
//! # Example
//!
//! ```text
//! // Definition "DENSIFYROWS" with parameter "range"
//! DENSIFY(range, "rows")
//!
//! // Used from another formula
//! =DENSIFYROWS(A1:D20)
//! ```

/// One positional parameter of a named function
///
/// The order of parameters in [`FormulaDefinition::parameters`] defines the
/// positional correspondence with call-site arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSpec {
    /// Identifier used for the parameter inside the formula body
    pub name: String,
    /// Human readable description for documentation
    pub description: Option<String>,
    /// Example argument value (e.g. `A1:B10`, `"rows"`, `BLANK()`)
    pub example: Option<String>,
}

impl ParameterSpec {
    /// Create a parameter with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            example: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the example value
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// A named function definition
///
/// The engine only looks at `name`, `parameters` and `body`; the remaining fields
/// are carried for the documentation renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaDefinition {
    /// Unique, case-sensitive name (e.g. "BLANK", "DENSIFYROWS")
    pub name: String,
    /// Ordered parameter list
    pub parameters: Vec<ParameterSpec>,
    /// Raw formula body, optionally starting with `=`
    pub body: String,
    /// Version string shown in generated documentation
    pub version: Option<String>,
    /// One-paragraph description
    pub description: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// File the definition was loaded from, if any
    pub source: Option<String>,
}

impl FormulaDefinition {
    /// Create a definition with a name and body and no parameters
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            body: body.into(),
            version: None,
            description: None,
            notes: None,
            source: None,
        }
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append several parameters by name
    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters
            .extend(names.into_iter().map(|name| ParameterSpec::new(name)));
        self
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the source file name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Check if the body starts with `=` (ignoring leading whitespace)
    pub fn has_leading_equals(&self) -> bool {
        self.body.trim_start().starts_with('=')
    }

    /// Get the body without surrounding whitespace and without a leading `=`
    pub fn expression(&self) -> &str {
        let trimmed = self.body.trim();
        trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start()
    }

    /// Parameter names in declaration order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_strips_equals() {
        let def = FormulaDefinition::new("F", "  =SUM(x)  ");
        assert!(def.has_leading_equals());
        assert_eq!(def.expression(), "SUM(x)");

        let def = FormulaDefinition::new("G", "IF(,,)");
        assert!(!def.has_leading_equals());
        assert_eq!(def.expression(), "IF(,,)");
    }

    #[test]
    fn test_parameter_order() {
        let def = FormulaDefinition::new("F", "a + b").with_parameters(["a", "b"]);
        assert_eq!(def.parameter_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
