//! Values substituted into the solver control script.

use serde::{Deserialize, Serialize};

/// One substitution point of the sweep script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptVar {
    ModelFile,
    AlphaStart,
    AlphaEnd,
    AlphaNpts,
    Mach,
    XCg,
    YCg,
    ZCg,
    RefChord,
}

impl ScriptVar {
    pub const ALL: [ScriptVar; 9] = [
        ScriptVar::ModelFile,
        ScriptVar::AlphaStart,
        ScriptVar::AlphaEnd,
        ScriptVar::AlphaNpts,
        ScriptVar::Mach,
        ScriptVar::XCg,
        ScriptVar::YCg,
        ScriptVar::ZCg,
        ScriptVar::RefChord,
    ];

    /// Variable name as declared in the script.
    pub fn name(self) -> &'static str {
        match self {
            ScriptVar::ModelFile => "fname",
            ScriptVar::AlphaStart => "alpha_i",
            ScriptVar::AlphaEnd => "alpha_f",
            ScriptVar::AlphaNpts => "alpha_npts",
            ScriptVar::Mach => "mach_i",
            ScriptVar::XCg => "x_cg",
            ScriptVar::YCg => "y_cg",
            ScriptVar::ZCg => "z_cg",
            ScriptVar::RefChord => "chord_mgc",
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ScriptVar::ModelFile => "string",
            _ => "double",
        }
    }
}

/// Parameter values for one solver run. `None` leaves the line alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_npts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mach: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_cg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_cg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_cg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_chord: Option<f64>,
}

impl SweepInputs {
    pub fn alpha_range(mut self, start: f64, end: f64, npts: u32) -> Self {
        self.alpha_start = Some(start);
        self.alpha_end = Some(end);
        self.alpha_npts = Some(npts);
        self
    }

    pub fn mach(mut self, mach: f64) -> Self {
        self.mach = Some(mach);
        self
    }

    pub fn cg(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_cg = Some(x);
        self.y_cg = Some(y);
        self.z_cg = Some(z);
        self
    }

    pub fn ref_chord(mut self, chord: f64) -> Self {
        self.ref_chord = Some(chord);
        self
    }

    pub fn model_file(mut self, file: impl Into<String>) -> Self {
        self.model_file = Some(file.into());
        self
    }

    /// Formatted right-hand side for `var`, if a value was supplied.
    pub fn literal(&self, var: ScriptVar) -> Option<String> {
        match var {
            ScriptVar::ModelFile => self.model_file.as_ref().map(|f| format!("\"{f}\"")),
            ScriptVar::AlphaStart => self.alpha_start.map(|v| format!("{v:?}")),
            ScriptVar::AlphaEnd => self.alpha_end.map(|v| format!("{v:?}")),
            ScriptVar::AlphaNpts => self.alpha_npts.map(|v| v.to_string()),
            ScriptVar::Mach => self.mach.map(|v| format!("{v:.2}")),
            ScriptVar::XCg => self.x_cg.map(|v| format!("{v:.3}")),
            ScriptVar::YCg => self.y_cg.map(|v| format!("{v:.3}")),
            ScriptVar::ZCg => self.z_cg.map(|v| format!("{v:.3}")),
            ScriptVar::RefChord => self.ref_chord.map(|v| format!("{v:.3}")),
        }
    }

    /// Supplied variables with their formatted values, in script order.
    pub fn assignments(&self) -> Vec<(ScriptVar, String)> {
        ScriptVar::ALL
            .iter()
            .filter_map(|&var| self.literal(var).map(|lit| (var, lit)))
            .collect()
    }
}
