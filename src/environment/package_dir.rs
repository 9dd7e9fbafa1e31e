//! Package directory derivation.

use std::path::PathBuf;

use super::candidate::EnvironmentCandidate;
use super::platform::{Platform, PythonVersion};

/// Compute where `candidate` keeps its installed packages.
///
/// Pure: no filesystem access. The candidate's own declared version is used
/// when known; `fallback` (normally the running interpreter's version) only
/// fills in when the candidate has none. Windows layouts carry no version
/// segment, so they always resolve. On POSIX the result is `None` only when
/// neither version is available.
pub fn package_directory(
    candidate: &EnvironmentCandidate,
    platform: Platform,
    fallback: Option<PythonVersion>,
) -> Option<PathBuf> {
    let lib = platform.lib_dir(&candidate.path);
    match platform {
        Platform::Windows => Some(lib.join("site-packages")),
        Platform::Posix => {
            let version = candidate.version.or(fallback)?;
            Some(lib.join(version.lib_dir_name()).join("site-packages"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::candidate::CandidateSource;
    use std::path::Path;

    fn candidate(version: Option<PythonVersion>) -> EnvironmentCandidate {
        EnvironmentCandidate {
            path: PathBuf::from("/srv/app/rag_env"),
            active: false,
            exists: true,
            source: CandidateSource::Ancestor { depth: 0 },
            version,
        }
    }

    #[test]
    fn posix_uses_candidate_version() {
        let c = candidate(Some(PythonVersion::new(3, 10)));
        let dir = package_directory(&c, Platform::Posix, Some(PythonVersion::new(3, 12)));
        assert_eq!(
            dir.as_deref(),
            Some(Path::new("/srv/app/rag_env/lib/python3.10/site-packages"))
        );
    }

    #[test]
    fn posix_falls_back_to_running_version() {
        let c = candidate(None);
        let dir = package_directory(&c, Platform::Posix, Some(PythonVersion::new(3, 12)));
        assert_eq!(
            dir.as_deref(),
            Some(Path::new("/srv/app/rag_env/lib/python3.12/site-packages"))
        );
    }

    #[test]
    fn posix_without_any_version_is_none() {
        let c = candidate(None);
        assert_eq!(package_directory(&c, Platform::Posix, None), None);
    }

    #[test]
    fn windows_has_no_version_segment() {
        let c = candidate(Some(PythonVersion::new(3, 11)));
        let dir = package_directory(&c, Platform::Windows, None).unwrap();
        assert_eq!(dir, Path::new("/srv/app/rag_env").join("Lib").join("site-packages"));
    }

    #[test]
    fn identical_inputs_yield_identical_paths() {
        let c = candidate(None);
        let fallback = Some(PythonVersion::new(3, 11));
        let first = package_directory(&c, Platform::Posix, fallback);
        let second = package_directory(&c, Platform::Posix, fallback);
        assert_eq!(first, second);
    }
}
