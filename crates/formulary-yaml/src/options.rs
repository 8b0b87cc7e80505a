//! Loader options

/// Options for reading formula files
#[derive(Debug, Clone)]
pub struct YamlReadOptions {
    /// File extension to pick up in a directory (default: `yaml`)
    pub extension: String,
    /// Remove `//` and `/* */` comments from formula bodies
    pub strip_comments: bool,
    /// Log a warning for top-level fields the schema does not know
    pub warn_unknown_fields: bool,
}

impl Default for YamlReadOptions {
    fn default() -> Self {
        Self {
            extension: "yaml".to_string(),
            strip_comments: true,
            warn_unknown_fields: true,
        }
    }
}

impl YamlReadOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comments in formula bodies
    pub fn keep_comments(mut self) -> Self {
        self.strip_comments = false;
        self
    }
}
