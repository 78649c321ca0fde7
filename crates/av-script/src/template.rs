//! Read-modify-write templating of the solver control script.
//!
//! Two addressing modes are supported. `Positional` rewrites fixed line
//! indices, the way the sweep script has always been driven; with `verify`
//! set, each target line must already declare the variable it is about to
//! receive. `Named` finds the declaration by variable name instead and is
//! immune to lines being inserted above it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inputs::{ScriptVar, SweepInputs};
use crate::{ScriptError, ScriptResult};

/// Zero-based line index of every substitution point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineLayout {
    pub model_file: usize,
    pub alpha_start: usize,
    pub alpha_end: usize,
    pub alpha_npts: usize,
    pub mach: usize,
    pub x_cg: usize,
    pub y_cg: usize,
    pub z_cg: usize,
    pub ref_chord: usize,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            model_file: 10,
            alpha_start: 47,
            alpha_end: 52,
            alpha_npts: 57,
            mach: 62,
            x_cg: 68,
            y_cg: 73,
            z_cg: 78,
            ref_chord: 84,
        }
    }
}

impl LineLayout {
    pub fn index(&self, var: ScriptVar) -> usize {
        match var {
            ScriptVar::ModelFile => self.model_file,
            ScriptVar::AlphaStart => self.alpha_start,
            ScriptVar::AlphaEnd => self.alpha_end,
            ScriptVar::AlphaNpts => self.alpha_npts,
            ScriptVar::Mach => self.mach,
            ScriptVar::XCg => self.x_cg,
            ScriptVar::YCg => self.y_cg,
            ScriptVar::ZCg => self.z_cg,
            ScriptVar::RefChord => self.ref_chord,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TemplateMode {
    Positional {
        #[serde(default)]
        layout: LineLayout,
        #[serde(default)]
        verify: bool,
    },
    #[default]
    Named,
}

/// The control script as an ordered list of lines, terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepTemplate {
    lines: Vec<String>,
}

impl SweepTemplate {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn load(path: &Path) -> ScriptResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    /// Overwrite `path` with the current content.
    pub fn save(&self, path: &Path) -> ScriptResult<()> {
        std::fs::write(path, self.render()).map_err(|source| ScriptError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render(&self) -> String {
        self.lines.concat()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| strip_eol(l).0)
    }

    /// Apply every supplied value and return the indices of rewritten lines.
    ///
    /// All edits are resolved before any line is touched, so an error leaves
    /// the template unchanged.
    pub fn apply(&mut self, inputs: &SweepInputs, mode: &TemplateMode) -> ScriptResult<Vec<usize>> {
        let mut edits = Vec::new();
        for (var, literal) in inputs.assignments() {
            let index = match mode {
                TemplateMode::Positional { layout, verify } => {
                    let index = layout.index(var);
                    let Some(current) = self.line(index) else {
                        return Err(ScriptError::LineOutOfRange {
                            index,
                            len: self.len(),
                        });
                    };
                    if *verify && !declares(current, var) {
                        return Err(ScriptError::LayoutMismatch {
                            index,
                            expected: format!("{} {}", var.type_name(), var.name()),
                            found: current.trim().to_string(),
                        });
                    }
                    index
                }
                TemplateMode::Named => self.find_declaration(var)?,
            };
            let replacement = match mode {
                TemplateMode::Positional { .. } => positional_line(var, &literal),
                TemplateMode::Named => {
                    let current = self.line(index).unwrap_or_default();
                    let indent = &current[..current.len() - current.trim_start().len()];
                    format!("{indent}{} {} = {literal};", var.type_name(), var.name())
                }
            };
            edits.push((index, var, replacement));
        }

        let mut touched = Vec::with_capacity(edits.len());
        for (index, var, replacement) in edits {
            let eol = match strip_eol(&self.lines[index]).1 {
                "" => "\n",
                eol => eol,
            };
            let new_line = format!("{replacement}{eol}");
            debug!(line = index, var = var.name(), text = %replacement, "template edit");
            self.lines[index] = new_line;
            touched.push(index);
        }
        Ok(touched)
    }

    fn find_declaration(&self, var: ScriptVar) -> ScriptResult<usize> {
        self.lines
            .iter()
            .position(|l| declares(strip_eol(l).0, var))
            .ok_or_else(|| ScriptError::VariableNotFound {
                name: var.name().to_string(),
            })
    }
}

/// Rewrite the script at `path` in place.
pub fn template_file(
    path: &Path,
    inputs: &SweepInputs,
    mode: &TemplateMode,
) -> ScriptResult<Vec<usize>> {
    let mut template = SweepTemplate::load(path)?;
    let touched = template.apply(inputs, mode)?;
    template.save(path)?;
    Ok(touched)
}

fn positional_line(var: ScriptVar, literal: &str) -> String {
    match var {
        ScriptVar::ModelFile => format!("\t  string {} = {literal};", var.name()),
        _ => format!("    double {} = {literal};", var.name()),
    }
}

/// True when `line` is a declaration `<type> <name> = ...`.
fn declares(line: &str, var: ScriptVar) -> bool {
    let Some(rest) = line.trim_start().strip_prefix(var.type_name()) else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let Some(rest) = rest.trim_start().strip_prefix(var.name()) else {
        return false;
    };
    rest.trim_start().starts_with('=')
}

fn strip_eol(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\n', '\r']);
    (body, &line[body.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "void main()\n{\n    double alpha_i = 0.0;\n    double alpha_if = 3.0;\n\tstring fname = \"old.vsp3\";\r\n    double mach_i = 0.10;\n}";

    #[test]
    fn declaration_matching_is_exact() {
        assert!(declares("    double alpha_i = 1;", ScriptVar::AlphaStart));
        assert!(declares("double alpha_i=1;", ScriptVar::AlphaStart));
        assert!(!declares("    double alpha_if = 3.0;", ScriptVar::AlphaStart));
        assert!(!declares("    doublealpha_i = 1;", ScriptVar::AlphaStart));
        assert!(!declares("    // double alpha_i = 1;", ScriptVar::AlphaStart));
        assert!(!declares("    alpha_i = 1;", ScriptVar::AlphaStart));
    }

    #[test]
    fn named_mode_keeps_indent_and_line_ending() {
        let mut t = SweepTemplate::from_text(SCRIPT);
        let inputs = SweepInputs::default()
            .model_file("new.vsp3")
            .mach(0.17);
        let touched = t.apply(&inputs, &TemplateMode::Named).unwrap();
        assert_eq!(touched, vec![4, 5]);
        let text = t.render();
        assert!(text.contains("\tstring fname = \"new.vsp3\";\r\n"));
        assert!(text.contains("    double mach_i = 0.17;\n"));
        assert!(text.contains("    double alpha_if = 3.0;\n"));
    }

    #[test]
    fn named_mode_reports_missing_variable() {
        let mut t = SweepTemplate::from_text(SCRIPT);
        let err = t
            .apply(&SweepInputs::default().ref_chord(1.0), &TemplateMode::Named)
            .unwrap_err();
        assert!(matches!(err, ScriptError::VariableNotFound { ref name } if name == "chord_mgc"));
    }

    #[test]
    fn positional_out_of_range_leaves_template_untouched() {
        let mut t = SweepTemplate::from_text(SCRIPT);
        let before = t.clone();
        let inputs = SweepInputs::default().alpha_range(0.0, 10.0, 11);
        let err = t
            .apply(
                &inputs,
                &TemplateMode::Positional {
                    layout: LineLayout::default(),
                    verify: false,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ScriptError::LineOutOfRange { index: 47, len: 7 }));
        assert_eq!(t, before);
    }

    #[test]
    fn positional_verify_catches_drifted_layout() {
        let mut t = SweepTemplate::from_text(SCRIPT);
        let layout = LineLayout {
            alpha_start: 3,
            ..LineLayout::default()
        };
        let inputs = SweepInputs {
            alpha_start: Some(-4.0),
            ..SweepInputs::default()
        };
        let err = t
            .apply(&inputs, &TemplateMode::Positional { layout, verify: true })
            .unwrap_err();
        assert!(matches!(err, ScriptError::LayoutMismatch { index: 3, .. }));

        // Without verification the wrong line is silently overwritten.
        let touched = t
            .apply(&inputs, &TemplateMode::Positional { layout, verify: false })
            .unwrap();
        assert_eq!(touched, vec![3]);
        assert_eq!(t.line(3), Some("    double alpha_i = -4.0;"));
    }

    #[test]
    fn last_line_without_newline_gains_one() {
        let mut t = SweepTemplate::from_text("    double mach_i = 0.10;");
        t.apply(&SweepInputs::default().mach(0.3), &TemplateMode::Named)
            .unwrap();
        assert_eq!(t.render(), "    double mach_i = 0.30;\n");
    }
}
