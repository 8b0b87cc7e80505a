//! Formula file reader

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::comments::strip_comments;
use crate::error::{YamlError, YamlResult};
use crate::options::YamlReadOptions;
use formulary_core::{Catalog, FormulaDefinition, ParameterSpec};

/// One formula file as written; field types are checked after deserializing
///
/// `None` is an absent key, `Some(Value::Null)` a key without a value.
#[derive(Debug, Deserialize)]
struct RawFormula {
    #[serde(default, deserialize_with = "present")]
    name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    version: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    parameters: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    formula: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    notes: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Formula file reader
pub struct YamlReader;

impl YamlReader {
    /// Read every formula file in a directory into a catalog
    ///
    /// Files are visited in file-name order. Fails on the first invalid file.
    pub fn read_dir<P: AsRef<Path>>(dir: P, options: &YamlReadOptions) -> YamlResult<Catalog> {
        let dir = dir.as_ref();
        let mut catalog = Catalog::new();

        for path in Self::formula_files(dir, options)? {
            let definition = Self::read_file(&path, options)?;
            let file = definition.source.clone().unwrap_or_default();
            match catalog.insert(definition) {
                Ok(_) => {}
                Err(formulary_core::Error::DuplicateName(name)) => {
                    return Err(YamlError::DuplicateName { file, name });
                }
                Err(source) => return Err(YamlError::Core { file, source }),
            }
        }

        if catalog.is_empty() {
            tracing::warn!("No .{} files found in {}", options.extension, dir.display());
        }

        Ok(catalog)
    }

    /// Formula file paths in a directory, sorted by file name
    pub fn formula_files(dir: &Path, options: &YamlReadOptions) -> YamlResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(YamlError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| YamlError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| YamlError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            let matches = path
                .extension()
                .map_or(false, |ext| ext == options.extension.as_str());
            if matches && path.is_file() {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Read one formula file
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &YamlReadOptions,
    ) -> YamlResult<FormulaDefinition> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| YamlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let definition = Self::read_str(&text, &file, options)?;
        tracing::debug!("Validated {}", file);
        Ok(definition)
    }

    /// Parse and validate formula YAML; `file` is used in error messages
    pub fn read_str(
        text: &str,
        file: &str,
        options: &YamlReadOptions,
    ) -> YamlResult<FormulaDefinition> {
        let syntax = |source| YamlError::Syntax {
            file: file.to_string(),
            source,
        };

        let value: Value = serde_yaml::from_str(text).map_err(syntax)?;
        if value.is_null() {
            return Err(YamlError::EmptyFile {
                file: file.to_string(),
            });
        }
        let raw: RawFormula = serde_yaml::from_value(value).map_err(syntax)?;

        let fields = FieldReader { file };
        let name = fields.string("name", raw.name)?;
        let version = fields.version(raw.version)?;
        let description = fields.string("description", raw.description)?;
        let parameters = fields.parameters(raw.parameters)?;
        let formula = fields.string("formula", raw.formula)?;
        let notes = fields.optional_string("notes", raw.notes)?;

        if options.warn_unknown_fields && !raw.extra.is_empty() {
            let unknown: Vec<&str> = raw.extra.keys().map(String::as_str).collect();
            tracing::warn!("{} contains unexpected fields: {}", file, unknown.join(", "));
        }

        let body = if options.strip_comments {
            strip_comments(&formula).trim().to_string()
        } else {
            formula
        };

        let mut definition = FormulaDefinition::new(name, body)
            .with_version(version)
            .with_description(description)
            .with_source(file);
        definition.parameters = parameters;
        definition.notes = notes;
        Ok(definition)
    }
}

/// Field validation for one file
struct FieldReader<'a> {
    file: &'a str,
}

impl FieldReader<'_> {
    fn missing(&self, field: &'static str) -> YamlError {
        YamlError::MissingField {
            file: self.file.to_string(),
            field,
        }
    }

    fn empty(&self, field: &'static str) -> YamlError {
        YamlError::EmptyField {
            file: self.file.to_string(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> YamlError {
        YamlError::InvalidField {
            file: self.file.to_string(),
            field,
            expected,
        }
    }

    /// Required, non-blank string
    fn string(&self, field: &'static str, value: Option<Value>) -> YamlResult<String> {
        match value {
            None => Err(self.missing(field)),
            Some(Value::Null) => Err(self.empty(field)),
            Some(Value::String(s)) if s.trim().is_empty() => Err(self.empty(field)),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(self.invalid(field, "a string")),
        }
    }

    fn optional_string(
        &self,
        field: &'static str,
        value: Option<Value>,
    ) -> YamlResult<Option<String>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(field, "a string")),
        }
    }

    /// `version: 1.0.0` and `version: 2` are both accepted
    fn version(&self, value: Option<Value>) -> YamlResult<String> {
        match value {
            Some(Value::Number(n)) => Ok(n.to_string()),
            other => self.string("version", other),
        }
    }

    fn parameters(&self, value: Option<Value>) -> YamlResult<Vec<ParameterSpec>> {
        let items = match value {
            None => return Err(self.missing("parameters")),
            Some(Value::Null) => return Err(self.empty("parameters")),
            Some(Value::Sequence(items)) => items,
            Some(_) => return Err(self.invalid("parameters", "a list")),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.parameter(index, item))
            .collect()
    }

    fn parameter(&self, index: usize, item: Value) -> YamlResult<ParameterSpec> {
        let error = |message: &str| YamlError::Parameter {
            file: self.file.to_string(),
            index,
            message: message.to_string(),
        };

        let Value::Mapping(map) = item else {
            return Err(error("must be a dictionary"));
        };

        let name = match map.get("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(_) => return Err(error("field 'name' must be a non-empty string")),
            None => return Err(error("missing required field 'name'")),
        };
        let description = match map.get("description") {
            Some(value) => scalar_text(value),
            None => return Err(error("missing required field 'description'")),
        };

        let mut spec = ParameterSpec::new(name);
        if let Some(description) = description {
            spec = spec.with_description(description);
        }
        if let Some(example) = map.get("example").and_then(scalar_text) {
            spec = spec.with_example(example);
        }
        Ok(spec)
    }
}

/// Text of a scalar YAML value (`A1:B10`, `5`, `true`)
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
