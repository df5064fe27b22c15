//! Decides whether a generated file needs to be rewritten.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::Serialize;

/// The outcome of a staleness check, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StalenessDecision {
    pub up_to_date: bool,
    pub reason: String,
}

impl StalenessDecision {
    fn stale(reason: impl Into<String>) -> Self {
        Self {
            up_to_date: false,
            reason: reason.into(),
        }
    }

    fn fresh(reason: impl Into<String>) -> Self {
        Self {
            up_to_date: true,
            reason: reason.into(),
        }
    }
}

/// Last modification time of `path`, or `None` if it cannot be read.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// `output` is up to date when it exists, is at least as new as the source,
/// and `force` is off.
pub fn check(source_modified: SystemTime, output: &Path, force: bool) -> StalenessDecision {
    if force {
        return StalenessDecision::stale("forced");
    }
    let Some(output_modified) = modified_time(output) else {
        return StalenessDecision::stale(format!("{} does not exist", output.display()));
    };
    if output_modified >= source_modified {
        StalenessDecision::fresh(format!("{} is up to date", output.display()))
    } else {
        StalenessDecision::stale(format!("{} is older than its source", output.display()))
    }
}

/// Like [`check`], for a locale properties file that may be copied from an
/// override source.
///
/// If `target` already exists and is the override source itself, there is
/// nothing to copy and the target is up to date even when forced.
/// Otherwise the newer of `source_modified` and the override's own
/// modification time is used; a missing override counts as the epoch.
pub fn check_locale_override(
    source_modified: SystemTime,
    target: &Path,
    override_source: &Path,
    force: bool,
) -> StalenessDecision {
    if target.exists() && same_file(target, override_source) {
        return StalenessDecision::fresh(format!(
            "{} is its own override source",
            target.display()
        ));
    }
    let override_modified = modified_time(override_source).unwrap_or(UNIX_EPOCH);
    check(source_modified.max(override_modified), target, force)
}

/// Whether both paths resolve to the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, time::Duration};
    use tempfile::TempDir;

    fn touch(path: &Path, at: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(at).unwrap();
    }

    #[test]
    fn test_missing_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let decision = check(SystemTime::now(), &dir.path().join("Out.java"), false);
        assert!(!decision.up_to_date);
        assert!(decision.reason.contains("does not exist"));
    }

    #[test]
    fn test_older_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Out.java");
        let source_time = SystemTime::now();
        touch(&output, source_time - Duration::from_secs(60));
        assert!(!check(source_time, &output, false).up_to_date);
    }

    #[test]
    fn test_newer_or_equal_output_is_fresh() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Out.java");
        let source_time = SystemTime::now() - Duration::from_secs(60);
        touch(&output, source_time);
        assert!(check(source_time, &output, false).up_to_date);

        touch(&output, source_time + Duration::from_secs(5));
        assert!(check(source_time, &output, false).up_to_date);
    }

    #[test]
    fn test_force_is_always_stale() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Out.java");
        touch(&output, SystemTime::now());
        let decision = check(UNIX_EPOCH, &output, true);
        assert!(!decision.up_to_date);
        assert_eq!(decision.reason, "forced");
    }

    #[test]
    fn test_override_identity_is_up_to_date_even_when_forced() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Birthday_fr_FR.properties");
        touch(&target, UNIX_EPOCH + Duration::from_secs(10));
        let decision = check_locale_override(SystemTime::now(), &target, &target, true);
        assert!(decision.up_to_date);
    }

    #[test]
    fn test_newer_override_makes_target_stale() {
        let dir = TempDir::new().unwrap();
        let source_time = SystemTime::now() - Duration::from_secs(120);
        let target = dir.path().join("res_fr_FR.properties");
        let override_source = dir.path().join("src_fr_FR.properties");
        touch(&target, source_time + Duration::from_secs(10));
        touch(&override_source, source_time + Duration::from_secs(60));

        assert!(!check_locale_override(source_time, &target, &override_source, false).up_to_date);
    }

    #[test]
    fn test_missing_override_counts_as_epoch() {
        let dir = TempDir::new().unwrap();
        let source_time = SystemTime::now() - Duration::from_secs(120);
        let target = dir.path().join("res_fr_FR.properties");
        touch(&target, source_time);
        let missing = dir.path().join("missing_fr_FR.properties");

        assert!(check_locale_override(source_time, &target, &missing, false).up_to_date);
    }
}
