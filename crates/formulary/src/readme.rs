//! Markdown documentation for a built catalog
//!
//! The generated list is inserted into a README template between
//! [`START_MARKER`] and [`END_MARKER`]. Everything outside the markers is
//! kept as written.

use crate::build::DocumentedFormula;
use crate::error::ReadmeError;

/// Opening marker of the generated section
pub const START_MARKER: &str = "<!-- AUTO-GENERATED CONTENT START -->";

/// Closing marker of the generated section
pub const END_MARKER: &str = "<!-- AUTO-GENERATED CONTENT END -->";

const GENERATED_NOTE: &str = "<!-- This section is automatically generated by formulary -->";

/// Collapse runs of whitespace (including newlines) to single spaces
fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Anchor GitHub generates for a `### NAME` heading
fn anchor(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn fenced(lines: &mut Vec<String>, text: &str) {
    lines.push("```".into());
    lines.push(text.to_string());
    lines.push("```\n".into());
}

/// Render the formula reference: a quick list and one collapsible section
/// per formula, both sorted by name ignoring case
pub fn render_formula_list(formulas: &[DocumentedFormula]) -> String {
    if formulas.is_empty() {
        return "_No formulas available yet._\n".to_string();
    }

    let mut sorted: Vec<&DocumentedFormula> = formulas.iter().collect();
    sorted.sort_by_key(|f| f.name.to_lowercase());

    let mut lines = vec!["### Quick Reference\n".to_string()];
    for formula in &sorted {
        lines.push(format!(
            "- **[{}](#{})** - {}",
            formula.name,
            anchor(&formula.name),
            clean(formula.description.as_deref().unwrap_or_default())
        ));
    }

    lines.push(String::new());
    lines.push("### Detailed Formulas\n".into());

    for formula in &sorted {
        lines.push("<details>".into());
        lines.push(format!("<summary><strong>{}</strong></summary>\n", formula.name));
        lines.push(format!("### {}\n", formula.name));

        let description = clean(formula.description.as_deref().unwrap_or_default());
        let description = match &formula.version {
            Some(version) => format!("v{} {}", version, description),
            None => description,
        };
        lines.push("**Description**\n".into());
        fenced(&mut lines, &description);

        if !formula.parameters.is_empty() {
            lines.push("**Parameters**\n".into());
            lines.push("```".into());
            for (i, param) in formula.parameters.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, param.name));
            }
            lines.push("```\n".into());
        }

        lines.push("**Formula**\n".into());
        fenced(&mut lines, &formula.expanded);

        for param in &formula.parameters {
            lines.push(format!("#### {}\n", param.name));
            lines.push("**Description:**\n".into());
            fenced(
                &mut lines,
                &clean(param.description.as_deref().unwrap_or_default()),
            );

            if let Some(example) = param.example.as_deref().filter(|e| !e.is_empty()) {
                lines.push("**Example:**\n".into());
                fenced(&mut lines, example);
            }
        }

        if let Some(notes) = formula.notes.as_deref().map(clean).filter(|n| !n.is_empty()) {
            lines.push("**Notes**\n".into());
            fenced(&mut lines, &notes);
        }

        lines.push("</details>\n".into());
    }

    lines.join("\n")
}

/// Replace the generated section of `template` with `formula_list`
///
/// The end marker must follow the start marker.
///
/// # Example
/// ```rust
/// use formulary::readme::{render_readme, END_MARKER, START_MARKER};
///
/// let template = format!("# Formulas\n{START_MARKER}\nold\n{END_MARKER}\nFooter\n");
/// let readme = render_readme(&template, "new list\n").unwrap();
/// assert!(readme.contains("new list"));
/// assert!(!readme.contains("old"));
/// assert!(readme.ends_with("Footer\n"));
/// ```
pub fn render_readme(template: &str, formula_list: &str) -> Result<String, ReadmeError> {
    let (before, rest) = template
        .split_once(START_MARKER)
        .ok_or(ReadmeError::MissingMarkers)?;
    let (_, after) = rest
        .split_once(END_MARKER)
        .ok_or(ReadmeError::MissingMarkers)?;

    Ok(format!(
        "{before}{START_MARKER}\n{GENERATED_NOTE}\n\n{formula_list}\n{END_MARKER}{after}"
    ))
}
