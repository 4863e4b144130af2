/// Environment-driven configuration defaults
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;
use tourvoice_core::config::{resolve_beside_executable, CredentialSource};
use tourvoice_core::{NarrationConfig, VoiceConfig};

const NARRATION_VARS: &[&str] = &[
    "TOURVOICE_API_KEY_ENV",
    "TOURVOICE_LLM_BASE_URL",
    "TOURVOICE_LLM_MODEL",
    "TOURVOICE_LLM_REQUEST_TIMEOUT_MS",
    "TOURVOICE_NARRATION_DEADLINE_MS",
    "TOURVOICE_NARRATION_WORKERS",
    "TOURVOICE_AUDIT_LOG",
];

fn clear(vars: &[&str]) {
    for var in vars {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_narration_defaults() {
    clear(NARRATION_VARS);
    let cfg = NarrationConfig::default();

    assert_eq!(cfg.credential, CredentialSource::Env("GOOGLE_API_KEY".into()));
    assert_eq!(
        cfg.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(cfg.model, "gemini-2.0-flash");
    assert_eq!(cfg.deadline(), Duration::from_secs(90));
    assert_eq!(cfg.request_timeout(), Duration::from_secs(120));
    assert_eq!(cfg.pool_size, 2);
    assert_eq!(cfg.audit_log_path, Some(PathBuf::from("/tmp/locations.txt")));
}

#[test]
#[serial]
fn test_narration_env_overrides() {
    clear(NARRATION_VARS);
    std::env::set_var("TOURVOICE_API_KEY_ENV", "MY_GEMINI_KEY");
    std::env::set_var("TOURVOICE_NARRATION_DEADLINE_MS", "5000");
    std::env::set_var("TOURVOICE_NARRATION_WORKERS", "4");
    std::env::set_var("TOURVOICE_AUDIT_LOG", "");

    let cfg = NarrationConfig::default();
    assert_eq!(cfg.credential, CredentialSource::Env("MY_GEMINI_KEY".into()));
    assert_eq!(cfg.deadline(), Duration::from_secs(5));
    assert_eq!(cfg.pool_size, 4);
    assert_eq!(cfg.audit_log_path, None);

    clear(NARRATION_VARS);
}

#[test]
#[serial]
fn test_invalid_numbers_fall_back_to_defaults() {
    clear(NARRATION_VARS);
    std::env::set_var("TOURVOICE_NARRATION_DEADLINE_MS", "soon");
    std::env::set_var("TOURVOICE_NARRATION_WORKERS", "0");

    let cfg = NarrationConfig::default();
    assert_eq!(cfg.deadline(), Duration::from_secs(90));
    assert_eq!(cfg.pool_size, 2);

    clear(NARRATION_VARS);
}

#[test]
#[serial]
fn test_voice_paths_and_espeak_override() {
    let dir = tempfile::tempdir().unwrap();
    let espeak = dir.path().join("espeak-ng");
    std::fs::write(&espeak, b"#!/bin/sh\n").unwrap();
    let model = dir.path().join("kokoro-v1.0.onnx");

    std::env::set_var("KOKORO_MODEL_PATH", &model);
    std::env::remove_var("KOKORO_VOICES_PATH");
    std::env::set_var("ESPEAK_BIN", &espeak);

    let cfg = VoiceConfig::default();
    assert_eq!(cfg.model_path, model);
    assert_eq!(
        cfg.voices_path,
        resolve_beside_executable(&PathBuf::from("voices-v1.0.bin"))
    );
    assert_eq!(cfg.espeak_bin, Some(espeak));
    assert_eq!(cfg.default_voice, "am_liam");
    assert_eq!(cfg.language, "en-us");

    std::env::remove_var("KOKORO_MODEL_PATH");
    std::env::remove_var("ESPEAK_BIN");
}

#[test]
#[serial]
fn test_espeak_found_on_search_path() {
    let dir = tempfile::tempdir().unwrap();
    let espeak = dir.path().join("espeak-ng");
    std::fs::write(&espeak, b"#!/bin/sh\n").unwrap();

    let saved_path = std::env::var_os("PATH");
    let search = std::env::join_paths([PathBuf::from("/nonexistent/bin"), dir.path().to_path_buf()])
        .unwrap();
    std::env::remove_var("ESPEAK_BIN");
    std::env::set_var("PATH", &search);

    let cfg = VoiceConfig::default();

    match saved_path {
        Some(p) => std::env::set_var("PATH", p),
        None => std::env::remove_var("PATH"),
    }
    assert_eq!(cfg.espeak_bin, Some(espeak));
}

#[test]
#[serial]
fn test_missing_espeak_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let saved_path = std::env::var_os("PATH");
    std::env::remove_var("ESPEAK_BIN");
    std::env::set_var("PATH", dir.path());

    let cfg = VoiceConfig::default();

    match saved_path {
        Some(p) => std::env::set_var("PATH", p),
        None => std::env::remove_var("PATH"),
    }
    assert_eq!(cfg.espeak_bin, None);
}

#[test]
fn test_relative_paths_resolve_next_to_executable() {
    let resolved = resolve_beside_executable(&PathBuf::from("voices-v1.0.bin"));
    let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
    assert_eq!(resolved, exe_dir.join("voices-v1.0.bin"));

    let absolute = PathBuf::from("/opt/kokoro/voices-v1.0.bin");
    assert_eq!(resolve_beside_executable(&absolute), absolute);
}
