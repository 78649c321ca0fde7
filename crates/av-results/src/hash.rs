//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hash of the case definition, the solver binary and the run mode.
///
/// Re-running an unchanged case overwrites its previous report.
pub fn compute_run_id<C: Serialize>(case: &C, solver: &str, dry_run: bool) -> String {
    let mut hasher = Sha256::new();

    let case_json = serde_json::to_string(case).unwrap_or_default();
    hasher.update(case_json.as_bytes());

    hasher.update(solver.as_bytes());
    hasher.update([u8::from(dry_run)]);

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Case {
        id: &'static str,
        mach: f64,
    }

    #[test]
    fn hash_stability() {
        let case = Case {
            id: "cs_10",
            mach: 0.17,
        };
        let hash1 = compute_run_id(&case, "vsp", false);
        let hash2 = compute_run_id(&case, "vsp", false);
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = Case {
            id: "cs_10",
            mach: 0.17,
        };
        let b = Case {
            id: "cs_10",
            mach: 0.2,
        };
        assert_ne!(compute_run_id(&a, "vsp", false), compute_run_id(&b, "vsp", false));
        assert_ne!(compute_run_id(&a, "vsp", false), compute_run_id(&a, "vsp", true));
        assert_ne!(compute_run_id(&a, "vsp", false), compute_run_id(&a, "/opt/vsp", false));
    }
}
