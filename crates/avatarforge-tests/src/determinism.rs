//! Determinism verification for solver and garment output.

use std::fmt;

use avatarforge_backend_garment::GarmentMesh;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First run whose output differed, with its hash.
    pub mismatch: Option<(usize, String)>,
}

impl fmt::Display for DeterminismResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mismatch {
            None => write!(f, "{} runs, hash {}", self.runs, self.hash),
            Some((run, hash)) => write!(
                f,
                "run {} produced {} instead of {} ({} runs)",
                run, hash, self.hash, self.runs
            ),
        }
    }
}

impl DeterminismResult {
    /// Panics with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        assert!(self.is_deterministic, "non-deterministic output: {}", self);
    }
}

/// Runs `generate_fn` `runs` times and compares the BLAKE3 hash of every
/// output against the first.
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = blake3::hash(generate_fn().as_ref()).to_hex().to_string();
    for run in 1..runs {
        let hash = blake3::hash(generate_fn().as_ref()).to_hex().to_string();
        if hash != reference {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                hash: reference,
                mismatch: Some((run, hash)),
            };
        }
    }
    DeterminismResult {
        is_deterministic: true,
        runs,
        hash: reference,
        mismatch: None,
    }
}

/// Name, material color and buffer hash of every garment, one line each.
pub fn garment_fingerprint(garments: &[GarmentMesh]) -> String {
    garments
        .iter()
        .map(|g| format!("{} {} {}\n", g.name, g.material.color, g.buffers.content_hash()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_output_is_deterministic() {
        let result = verify_determinism(|| vec![1u8, 2, 3], 3);
        result.assert_deterministic();
        assert_eq!(result.runs, 3);
    }

    #[test]
    fn test_changing_output_detected() {
        let counter = std::cell::Cell::new(0u8);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                vec![counter.get()]
            },
            3,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.mismatch.map(|(run, _)| run), Some(1));
    }
}
