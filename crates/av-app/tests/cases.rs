use std::path::{Path, PathBuf};

use av_app::{
    AnalysisDef, AppError, LoadNormalization, MomentAxis, ReferenceSet, SweepParameter, list_cases,
    load_case, validate_case,
};

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases")
}

#[test]
fn shipped_cases_load_and_validate() {
    let summaries = list_cases(&cases_dir()).unwrap();
    assert_eq!(summaries.len(), 10);
    for summary in &summaries {
        let case = load_case(&summary.path).unwrap();
        validate_case(&case).unwrap_or_else(|e| panic!("{}: {e}", summary.path.display()));
        assert_eq!(case.iterations().len(), summary.iterations);
    }
}

/// Every shipped reference resolves, except the taper ratio data sets,
/// which are supplied separately under `cases/data/`.
#[test]
fn shipped_case_references_resolve() {
    let dir = cases_dir();
    for summary in list_cases(&dir).unwrap() {
        let case = load_case(&summary.path).unwrap();
        let resolved = ReferenceSet::resolve(&case, &dir);
        if case.id == "valcs_7" && !dir.join("data/TR50.dat").exists() {
            let err = resolved.unwrap_err();
            assert!(matches!(err, AppError::Results(ref msg) if msg.contains("TR50.dat")), "{err}");
            continue;
        }
        let refs = resolved.unwrap_or_else(|e| panic!("{}: {e}", summary.path.display()));
        assert_eq!(refs.len(), case.references.len(), "{}", case.id);
    }
}

#[test]
fn slope_references_carry_their_own_band() {
    let case = load_case(&cases_dir().join("validation_cs_3.yaml")).unwrap();
    assert!(matches!(
        case.analyses[1],
        AnalysisDef::MomentCurve {
            against: MomentAxis::Alpha,
            ..
        }
    ));
    let refs = ReferenceSet::resolve(&case, &cases_dir()).unwrap();
    assert!(refs.get("cm_expected").unwrap().band.is_some());
    assert!(refs.get("cm_surfaces").unwrap().band.is_none());
    assert_eq!(refs.get("cl_surfaces").unwrap().scalar(), Some(2.767));
}

#[test]
fn swept_wing_cases_share_geometry() {
    let curve = load_case(&cases_dir().join("validation_cs_9_lift_curve.yaml")).unwrap();
    let slopes = load_case(&cases_dir().join("valcs_4.yaml")).unwrap();
    assert_eq!(curve.wing, slopes.wing);
    assert!(matches!(
        slopes.analyses[1],
        AnalysisDef::MomentCurve {
            against: MomentAxis::Cl,
            cl_grid: None,
            ..
        }
    ));

    let dist = load_case(&cases_dir().join("validation_cs_9_lift_dist.yaml")).unwrap();
    assert!(dist.needs_load_distribution());
    assert!(matches!(
        dist.analyses[0],
        AnalysisDef::LoadDistribution {
            loading: LoadNormalization::LiftNormalized,
            ..
        }
    ));
    assert_eq!(dist.iterations()[0].alpha_npts, 1);
}

#[test]
fn twisted_wing_case_compares_lift_and_moment() {
    let case = load_case(&cases_dir().join("validation_cs_10.yaml")).unwrap();
    let kinds: Vec<_> = case.analyses.iter().map(AnalysisDef::name).collect();
    assert_eq!(kinds, vec!["lift_curve", "moment_curve"]);

    let its = case.iterations();
    assert_eq!(its.len(), 2);
    assert_eq!(its[1].label, "wsh2");
    assert_eq!(its[1].wing.twist_deg, Some(-2.0));
    assert_eq!(its[0].alpha_npts, 18);
    assert_eq!(case.reference("cm_wsh2").unwrap().iteration.as_deref(), Some("wsh2"));
}

#[test]
fn load_distribution_case_overrides_alpha_per_iteration() {
    let case = load_case(&cases_dir().join("valcs_5.yaml")).unwrap();
    assert!(case.needs_load_distribution());
    let its = case.iterations();
    assert!((its[0].alpha_start - 13.6).abs() < 1e-9);
    assert!((its[1].alpha_end - 14.42292490118577).abs() < 1e-9);
    assert_eq!(its[1].alpha_npts, 1);
}

#[test]
fn tessellation_cases_sweep_integer_panel_counts() {
    let chordwise = load_case(&cases_dir().join("validation_cs_1_chordwise.yaml")).unwrap();
    let sweep = chordwise.sweep.as_ref().unwrap();
    assert_eq!(sweep.parameter, SweepParameter::ChordwiseTess);
    assert_eq!(sweep.values.first(), Some(&5.0));
    assert_eq!(sweep.values.last(), Some(&133.0));
    assert_eq!(chordwise.iterations()[2].wing.mesh.chordwise_tess, Some(21));

    let spanwise = load_case(&cases_dir().join("validation_cs_2_spanwise.yaml")).unwrap();
    let its = spanwise.iterations();
    assert_eq!(its.len(), 14);
    assert_eq!(its[13].wing.mesh.spanwise_tess, Some(54));
    assert_eq!(its[13].wing.mesh.chordwise_tess, Some(33));
}

#[test]
fn listing_skips_files_that_are_not_cases() {
    let dir = std::env::temp_dir().join("av_app_list_cases");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::copy(cases_dir().join("validation_cs_4.yaml"), dir.join("b.yaml")).unwrap();
    std::fs::copy(cases_dir().join("valcs_7.yaml"), dir.join("a.yml")).unwrap();
    std::fs::write(dir.join("broken.yaml"), "id: [unterminated").unwrap();
    std::fs::write(dir.join("notes.txt"), "not a case").unwrap();

    let cases = list_cases(&dir).unwrap();
    let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["valcs_7", "validation_cs_4"]);
    assert_eq!(cases[0].iterations, 3);
    assert_eq!(cases[1].analyses, vec!["lift_curve"]);
}
