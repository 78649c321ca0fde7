//! Modeling API rendered as an AngelScript program.
//!
//! The modeling tool runs `.vspscript` files through its script interpreter,
//! so every API call is emitted as one statement of a `main()` body. Running
//! the resulting script with the tool's `-script` flag builds and saves the
//! model.

use std::fmt::Write as _;
use std::path::Path;

use crate::api::{AnalysisInput, GeomId, GeomKind, ModelApi, ParmValue, ResultId, WingDriver, XSecShape};
use crate::{GeometryError, GeometryResult};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct ScriptModelApi {
    body: Vec<String>,
    geom_count: usize,
    input_count: usize,
    result_count: usize,
}

impl ScriptModelApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.body
    }

    /// Full script text, including the error drain at the end of `main`.
    pub fn render(&self) -> String {
        let mut out = String::from("void main()\n{\n");
        for stmt in &self.body {
            let _ = writeln!(out, "{INDENT}{stmt}");
        }
        out.push('\n');
        let _ = writeln!(out, "{INDENT}while ( GetNumTotalErrors() > 0 )");
        let _ = writeln!(out, "{INDENT}{{");
        let _ = writeln!(out, "{INDENT}{INDENT}ErrorObj err = PopLastError();");
        let _ = writeln!(out, "{INDENT}{INDENT}Print( err.GetErrorString() );");
        let _ = writeln!(out, "{INDENT}}}");
        out.push_str("}\n");
        out
    }

    pub fn write_to(&self, path: &Path) -> GeometryResult<()> {
        std::fs::write(path, self.render()).map_err(|source| GeometryError::ScriptWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    fn push(&mut self, stmt: String) {
        self.body.push(stmt);
    }
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn real(v: f64) -> String {
    // Debug keeps a decimal point on integral values.
    format!("{v:?}")
}

fn parm_literal(value: ParmValue) -> String {
    match value {
        ParmValue::Real(v) => real(v),
        ParmValue::Int(v) => format!("{v}"),
        ParmValue::Flag(_) => real(value.as_f64()),
    }
}

impl ModelApi for ScriptModelApi {
    fn clear_model(&mut self) -> GeometryResult<()> {
        self.push("ClearVSPModel();".to_string());
        Ok(())
    }

    fn add_geom(&mut self, kind: GeomKind) -> GeometryResult<GeomId> {
        let id = GeomId(format!("geom_{}", self.geom_count));
        self.geom_count += 1;
        self.push(format!(
            "string {id} = AddGeom( {} );",
            quote(kind.type_name())
        ));
        Ok(id)
    }

    fn set_driver_group(
        &mut self,
        geom: &GeomId,
        section: u32,
        drivers: [WingDriver; 3],
    ) -> GeometryResult<()> {
        self.push(format!(
            "SetDriverGroup( {geom}, {section}, {}, {}, {} );",
            drivers[0].constant_name(),
            drivers[1].constant_name(),
            drivers[2].constant_name()
        ));
        Ok(())
    }

    fn set_parm(
        &mut self,
        geom: &GeomId,
        name: &str,
        group: &str,
        value: ParmValue,
    ) -> GeometryResult<()> {
        self.push(format!(
            "SetParmValUpdate( {geom}, {}, {}, {} );",
            quote(name),
            quote(group),
            parm_literal(value)
        ));
        Ok(())
    }

    fn change_xsec_shape(
        &mut self,
        geom: &GeomId,
        surf_index: u32,
        xsec_index: u32,
        shape: XSecShape,
    ) -> GeometryResult<()> {
        self.push(format!(
            "ChangeXSecShape( GetXSecSurf( {geom}, {surf_index} ), {xsec_index}, {} );",
            shape.constant_name()
        ));
        Ok(())
    }

    fn update(&mut self) -> GeometryResult<()> {
        self.push("Update();".to_string());
        Ok(())
    }

    fn write_model(&mut self, file_name: &str) -> GeometryResult<()> {
        self.push(format!("WriteVSPFile( {}, SET_ALL );", quote(file_name)));
        Ok(())
    }

    fn read_model(&mut self, file_name: &str) -> GeometryResult<()> {
        self.push(format!("ReadVSPFile( {} );", quote(file_name)));
        Ok(())
    }

    fn set_analysis_defaults(&mut self, analysis: &str) -> GeometryResult<()> {
        self.push(format!("SetAnalysisInputDefaults( {} );", quote(analysis)));
        Ok(())
    }

    fn set_analysis_input(
        &mut self,
        analysis: &str,
        name: &str,
        value: AnalysisInput,
    ) -> GeometryResult<()> {
        let var = format!("input_{}", self.input_count);
        self.input_count += 1;
        let (decl, setter) = match value {
            AnalysisInput::Int(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                (
                    format!("array<int> {var} = {{ {} }};", items.join(", ")),
                    "SetIntAnalysisInput",
                )
            }
            AnalysisInput::IntConstant(constant) => (
                format!("array<int> {var} = {{ {constant} }};"),
                "SetIntAnalysisInput",
            ),
            AnalysisInput::Double(values) => {
                let items: Vec<String> = values.iter().copied().map(real).collect();
                (
                    format!("array<double> {var} = {{ {} }};", items.join(", ")),
                    "SetDoubleAnalysisInput",
                )
            }
            AnalysisInput::Str(values) => {
                let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
                (
                    format!("array<string> {var} = {{ {} }};", items.join(", ")),
                    "SetStringAnalysisInput",
                )
            }
        };
        self.push(decl);
        self.push(format!(
            "{setter}( {}, {}, {var} );",
            quote(analysis),
            quote(name)
        ));
        Ok(())
    }

    fn exec_analysis(&mut self, analysis: &str) -> GeometryResult<ResultId> {
        let id = format!("results_{}", self.result_count);
        self.result_count += 1;
        self.push(format!("string {id} = ExecAnalysis( {} );", quote(analysis)));
        Ok(ResultId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_statements_inside_main() {
        let mut api = ScriptModelApi::new();
        api.clear_model().unwrap();
        let wing = api.add_geom(GeomKind::Wing).unwrap();
        api.set_parm(&wing, "Span", "XSec_1", ParmValue::Real(7.5))
            .unwrap();
        api.set_parm(&wing, "Tess_W", "Shape", ParmValue::Int(33))
            .unwrap();
        api.write_model("case.vsp3").unwrap();

        let text = api.render();
        assert!(text.starts_with("void main()\n{\n"));
        assert!(text.contains("    string geom_0 = AddGeom( \"WING\" );\n"));
        assert!(text.contains("SetParmValUpdate( geom_0, \"Span\", \"XSec_1\", 7.5 );"));
        assert!(text.contains("SetParmValUpdate( geom_0, \"Tess_W\", \"Shape\", 33 );"));
        assert!(text.contains("WriteVSPFile( \"case.vsp3\", SET_ALL );"));
        assert!(text.trim_end().ends_with('}'));
    }

    #[test]
    fn integral_reals_keep_decimal_point() {
        assert_eq!(real(1.0), "1.0");
        assert_eq!(real(-2.0), "-2.0");
        assert_eq!(parm_literal(ParmValue::Flag(true)), "1.0");
        assert_eq!(parm_literal(ParmValue::Flag(false)), "0.0");
    }

    #[test]
    fn analysis_inputs_declare_arrays() {
        let mut api = ScriptModelApi::new();
        api.set_analysis_input(
            "VSPAEROSweep",
            "AnalysisMethod",
            AnalysisInput::IntConstant("VORTEX_LATTICE".to_string()),
        )
        .unwrap();
        api.set_analysis_input(
            "VSPAEROSweep",
            "AlphaStart",
            AnalysisInput::Double(vec![-4.0]),
        )
        .unwrap();
        let rid = api.exec_analysis("VSPAEROSweep").unwrap();
        assert_eq!(rid, ResultId("results_0".to_string()));

        let stmts = api.statements();
        assert_eq!(stmts[0], "array<int> input_0 = { VORTEX_LATTICE };");
        assert_eq!(
            stmts[1],
            "SetIntAnalysisInput( \"VSPAEROSweep\", \"AnalysisMethod\", input_0 );"
        );
        assert_eq!(stmts[2], "array<double> input_1 = { -4.0 };");
        assert_eq!(stmts[4], "string results_0 = ExecAnalysis( \"VSPAEROSweep\" );");
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }
}
