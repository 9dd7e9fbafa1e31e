//! Front-end build checks.
//!
//! The server only serves what the front-end build produced, so a missing
//! asset shows up as a 404 long after startup. This checks the files up
//! front and lists the URLs the server would expose.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::FrontendSettings;

/// One expected asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetStatus {
    /// Path relative to the build directory.
    pub asset: PathBuf,
    /// Absolute path checked.
    pub path: PathBuf,
    /// Whether the file exists.
    pub exists: bool,
}

/// Result of checking a front-end build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontendReport {
    /// Build directory checked.
    pub dist_dir: PathBuf,
    /// Whether the build directory exists.
    pub dist_exists: bool,
    /// Each configured asset, in configured order.
    pub assets: Vec<AssetStatus>,
    /// Base URL the server listens on.
    pub base_url: String,
    /// Full URL of each configured endpoint.
    pub endpoints: Vec<String>,
}

impl FrontendReport {
    /// Whether every asset exists.
    pub fn complete(&self) -> bool {
        self.assets.iter().all(|a| a.exists)
    }

    /// Assets that are missing.
    pub fn missing(&self) -> impl Iterator<Item = &AssetStatus> {
        self.assets.iter().filter(|a| !a.exists)
    }
}

/// Check the front-end build under `project_root`.
pub fn check_frontend(project_root: &Path, settings: &FrontendSettings) -> FrontendReport {
    let dist_dir = project_root.join(&settings.dist_dir);

    let assets = settings
        .assets
        .iter()
        .map(|asset| {
            let path = dist_dir.join(asset);
            AssetStatus {
                asset: asset.clone(),
                exists: path.is_file(),
                path,
            }
        })
        .collect();

    let base_url = base_url(&settings.host, settings.port);
    let endpoints = settings
        .endpoints
        .iter()
        .map(|e| format!("{}{}", base_url, e))
        .collect();

    FrontendReport {
        dist_exists: dist_dir.is_dir(),
        dist_dir,
        assets,
        base_url,
        endpoints,
    }
}

/// `http://host:port`, bracketing IPv6 literals.
pub fn base_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build(root: &Path, files: &[&str]) {
        for f in files {
            let path = root.join("frontend/dist").join(f);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
    }

    #[test]
    fn complete_build() {
        let temp = TempDir::new().unwrap();
        build(
            temp.path(),
            &["index.html", "assets/styles.css", "assets/app.js"],
        );

        let report = check_frontend(temp.path(), &FrontendSettings::default());
        assert!(report.dist_exists);
        assert!(report.complete());
        assert_eq!(report.missing().count(), 0);
    }

    #[test]
    fn missing_asset_is_reported() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), &["index.html", "assets/styles.css"]);

        let report = check_frontend(temp.path(), &FrontendSettings::default());
        assert!(!report.complete());
        let missing: Vec<_> = report.missing().map(|a| a.asset.clone()).collect();
        assert_eq!(missing, vec![PathBuf::from("assets/app.js")]);
    }

    #[test]
    fn no_build_dir() {
        let temp = TempDir::new().unwrap();
        let report = check_frontend(temp.path(), &FrontendSettings::default());
        assert!(!report.dist_exists);
        assert_eq!(report.missing().count(), 3);
    }

    #[test]
    fn endpoints_use_host_and_port() {
        let temp = TempDir::new().unwrap();
        let report = check_frontend(temp.path(), &FrontendSettings::default());
        assert_eq!(report.base_url, "http://127.0.0.1:8000");
        assert_eq!(report.endpoints[0], "http://127.0.0.1:8000/health");
        assert_eq!(report.endpoints.len(), 4);
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        assert_eq!(base_url("::1", 8000), "http://[::1]:8000");
        assert_eq!(base_url("localhost", 3000), "http://localhost:3000");
    }
}
