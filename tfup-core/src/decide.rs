// tfup-core/src/decide.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallDecision {
    Skip,
    Install,
}

/// Decide whether a resolved version needs installing.
///
/// Skip iff an installed version is present, equals the requested version
/// exactly (string equality after resolution, no range matching) and force
/// is false. A pure function with no side effects.
pub fn decide(requested: &str, installed: Option<&str>, force: bool) -> InstallDecision {
    match installed {
        Some(installed) if installed == requested && !force => InstallDecision::Skip,
        _ => InstallDecision::Install,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_version_without_force_skips() {
        assert_eq!(
            decide("1.7.5", Some("1.7.5"), false),
            InstallDecision::Skip
        );
    }

    #[test]
    fn differing_version_installs() {
        assert_eq!(
            decide("1.7.6", Some("1.7.5"), false),
            InstallDecision::Install
        );
    }

    #[test]
    fn absent_install_installs() {
        assert_eq!(decide("1.7.5", None, false), InstallDecision::Install);
    }

    #[test]
    fn force_always_installs() {
        assert_eq!(
            decide("1.7.5", Some("1.7.5"), true),
            InstallDecision::Install
        );
        assert_eq!(decide("1.7.5", None, true), InstallDecision::Install);
    }
}
