//! Library integration tests.

use std::fs;
use std::path::PathBuf;

use ragenv::config::{EnvironmentSettings, Settings};
use ragenv::environment::{package_directory, EnvironmentLocator, Platform, SearchPath};
use ragenv::verify::{DependencyMetadata, ProbeOutcome, ProgressEvent, StaticProbe, Verifier};
use ragenv::RagEnvError;
use tempfile::TempDir;

fn no_vars(_: &str) -> Result<String, std::env::VarError> {
    Err(std::env::VarError::NotPresent)
}

#[test]
fn error_types_are_public() {
    let err = RagEnvError::InvalidDependencyName {
        name: "torch>=2".into(),
    };
    assert!(err.to_string().contains("torch>=2"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> ragenv::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use ragenv::cli::{Cli, Commands};

    let cli = Cli::parse_from(["ragenv", "check", "--json", "torch"]);
    if let Some(Commands::Check(args)) = cli.command {
        assert!(args.json);
        assert_eq!(args.modules, vec!["torch"]);
    } else {
        panic!("Expected Check command");
    }
}

#[test]
fn locate_then_verify_statically() {
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("app/src");
    fs::create_dir_all(&work).unwrap();
    let env = temp.path().join("app/.venv");
    fs::create_dir_all(env.join("lib/python3.10/site-packages/chromadb")).unwrap();
    fs::write(env.join("pyvenv.cfg"), "version = 3.10.12\n").unwrap();

    let locator = EnvironmentLocator::with_env(&EnvironmentSettings::default(), work, None, no_vars)
        .with_platform(Platform::Posix);
    let candidate = locator.locate().expect("environment should be found");
    assert_eq!(candidate.path, env);
    assert!(!candidate.active);

    let dir = package_directory(&candidate, Platform::Posix, None).unwrap();
    let probe = StaticProbe::new(&dir);
    let report = Verifier::new(&probe)
        .verify(&Settings::default().dependency_names(), |_| {})
        .unwrap();
    assert_eq!(report.missing, vec!["torch", "sentence_transformers"]);
}

#[test]
fn empty_search_finds_nothing() {
    let temp = TempDir::new().unwrap();
    let settings = EnvironmentSettings {
        home_path: None,
        ..Default::default()
    };
    let locator = EnvironmentLocator::with_env(&settings, temp.path().to_path_buf(), None, no_vars)
        .with_platform(Platform::Posix);
    assert!(locator.locate().is_none());
    assert!(!locator.is_active());
}

#[test]
fn progress_events_pair_up() {
    let probe = |name: &str| -> ragenv::Result<ProbeOutcome> {
        Ok(match name {
            "torch" => ProbeOutcome::Found(DependencyMetadata::default()),
            "chromadb" => ProbeOutcome::Broken {
                detail: "ImportError".into(),
            },
            _ => ProbeOutcome::NotFound,
        })
    };
    let mut events = Vec::new();
    let report = Verifier::new(&probe)
        .verify(&["torch", "chromadb", "faiss"], |event| match event {
            ProgressEvent::Started { name, .. } => events.push(format!("start {}", name)),
            ProgressEvent::Finished { result, .. } => {
                events.push(format!("end {} {}", result.name, result.found()))
            }
        })
        .unwrap();

    assert_eq!(
        events,
        vec![
            "start torch",
            "end torch true",
            "start chromadb",
            "end chromadb false",
            "start faiss",
            "end faiss false",
        ]
    );
    assert_eq!(report.missing, vec!["chromadb", "faiss"]);
    assert!(!report.all_found());
}

#[test]
fn search_path_push_pop() {
    let mut search = SearchPath::with_base("/opt/shared");
    let site = PathBuf::from("/srv/app/rag_env/lib/python3.11/site-packages");
    search.push(&site);
    assert!(search.contains(&site));
    assert_eq!(search.effective()[0], site);
    assert_eq!(search.pop(), Some(site.clone()));
    assert!(!search.contains(&site));
}
