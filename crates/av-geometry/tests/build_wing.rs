use av_geometry::*;

fn six_series_wing() -> WingParameters {
    WingParameters {
        planform: Planform::SpanChords {
            span: 180.0 / 2.0 / 12.0,
            root_chord: 28.57 / 12.0,
            tip_chord: 11.43 / 12.0,
        },
        sweep_deg: 0.0,
        sweep_location: Some(0.25),
        dihedral_deg: Some(3.0),
        twist_deg: Some(-2.0),
        rotate_to_match_dihedral: Some(true),
        airfoil: Some(Airfoil::SixSeries {
            series: 2,
            thickness_chord: 0.10,
            ideal_cl: Some(0.2),
        }),
        mesh: MeshParameters::default(),
    }
}

#[test]
fn builder_sets_every_wing_parameter() {
    let mut api = RecordingModelApi::new();
    let builder = GeometryBuilder::new("validation_cs_10.vsp3");
    let wing = builder.build(&mut api, &six_series_wing()).unwrap();
    assert_eq!(wing, GeomId("geom_0".to_string()));

    assert_eq!(api.calls()[0], ApiCall::ClearModel);
    assert_eq!(api.parm("Span", "XSec_1"), Some(7.5));
    assert_eq!(api.parm("Twist", "XSec_1"), Some(-2.0));
    assert_eq!(api.parm("Dihedral", "XSec_1"), Some(3.0));
    assert_eq!(api.parm("RotateMatchDideralFlag", "XSec_1"), Some(1.0));
    assert_eq!(api.parm("Series", "XSecCurve_0"), Some(2.0));
    assert_eq!(api.parm("Series", "XSecCurve_1"), Some(2.0));
    assert_eq!(api.parm("IdealCl", "XSecCurve_1"), Some(0.2));
    assert_eq!(api.parm("Tess_W", "Shape"), Some(33.0));
    assert_eq!(api.parm("SectTess_U", "XSec_1"), Some(24.0));
    assert_eq!(api.parm("LECluster", "WingGeom"), Some(0.25));
    assert_eq!(api.written_models(), vec!["validation_cs_10.vsp3"]);

    let shape_changes = api
        .calls()
        .iter()
        .filter(|c| matches!(c, ApiCall::ChangeXSecShape { shape: XSecShape::SixSeries, .. }))
        .count();
    assert_eq!(shape_changes, 2);
}

#[test]
fn aspect_driver_sets_half_wing_values() {
    let params = WingParameters {
        planform: Planform::AspectTaperSpan {
            aspect_ratio: 4.0,
            taper: 0.75,
            total_span: 13.91 / 12.0,
        },
        sweep_deg: 0.0,
        sweep_location: Some(0.25),
        dihedral_deg: None,
        twist_deg: None,
        rotate_to_match_dihedral: None,
        airfoil: None,
        mesh: MeshParameters::default(),
    };
    let mut api = RecordingModelApi::new();
    GeometryBuilder::new("valcs_7.vsp3")
        .build(&mut api, &params)
        .unwrap();

    assert!(api.calls().iter().any(|c| matches!(
        c,
        ApiCall::SetDriverGroup {
            section: 1,
            drivers: [WingDriver::AspectRatio, WingDriver::Taper, WingDriver::Span],
            ..
        }
    )));
    assert_eq!(api.parm("Aspect", "XSec_1"), Some(2.0));
    assert_eq!(api.parm("Taper", "XSec_1"), Some(0.75));
    assert!((api.parm("Span", "XSec_1").unwrap() - 13.91 / 24.0).abs() < 1e-12);
    assert_eq!(api.parm("Twist", "XSec_1"), None);
}

#[test]
fn invalid_wing_issues_no_calls() {
    let mut params = six_series_wing();
    params.sweep_deg = 95.0;
    let mut api = RecordingModelApi::new();
    let err = GeometryBuilder::new("bad.vsp3")
        .build(&mut api, &params)
        .unwrap_err();
    assert!(matches!(err, GeometryError::InvalidParameter { field: "sweep_deg", .. }));
    assert!(api.calls().is_empty());
}

#[test]
fn script_backend_emits_runnable_program() {
    let mut api = ScriptModelApi::new();
    GeometryBuilder::new("validation_cs_10.vsp3")
        .build(&mut api, &six_series_wing())
        .unwrap();
    let text = api.render();
    assert!(text.contains("ChangeXSecShape( GetXSecSurf( geom_0, 0 ), 1, XS_SIX_SERIES );"));
    assert!(text.contains("SetParmValUpdate( geom_0, \"Twist\", \"XSec_1\", -2.0 );"));
    assert!(text.contains("WriteVSPFile( \"validation_cs_10.vsp3\", SET_ALL );"));
}

#[test]
fn wing_parameters_from_yaml() {
    let yaml = r#"
planform:
  driver: total_span
  total_span: 10.0
  root_chord: 1.0
  tip_chord: 1.0
sweep_deg: 35.0
airfoil:
  family: four_series
  thickness_chord: 0.09
mesh:
  spanwise_tess: 6
"#;
    let params: WingParameters = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(params.sweep_deg, 35.0);
    assert_eq!(params.mesh.spanwise_tess, Some(6));
    assert_eq!(params.mesh.chordwise_tess, None);
    assert_eq!(params.mesh.root_cluster, 1.0);
    assert_eq!(params.mesh.tip_cluster, 0.5);
    assert_eq!(params.planform.semi_span(), 5.0);
    params.validate().unwrap();
}
