use anyhow::Result;
use speech_stream::{CredentialProvider, EnvCredentials, SpeechError, StaticCredential};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_env_credentials_missing_variable() {
    let provider = EnvCredentials::with_env_files("SPEECH_STREAM_TEST_UNSET_KEY", Vec::new());

    let err = provider.credential().unwrap_err();

    assert!(matches!(err, SpeechError::MissingCredential(_)));
    assert!(err.to_string().contains("SPEECH_STREAM_TEST_UNSET_KEY"));
}

#[test]
fn test_env_credentials_loaded_from_env_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let env_file = temp_dir.path().join(".env");
    fs::write(&env_file, "SPEECH_STREAM_TEST_FILE_KEY=sk-from-file\n")?;

    let provider = EnvCredentials::with_env_files(
        "SPEECH_STREAM_TEST_FILE_KEY",
        vec![temp_dir.path().join("missing.env"), env_file],
    );

    assert_eq!(provider.credential()?, "sk-from-file");

    Ok(())
}

#[test]
fn test_env_credentials_pick_up_edited_env_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let env_file = temp_dir.path().join(".env");
    fs::write(&env_file, "SPEECH_STREAM_TEST_ROTATED_KEY=sk-first\n")?;

    let provider =
        EnvCredentials::with_env_files("SPEECH_STREAM_TEST_ROTATED_KEY", vec![env_file.clone()]);
    assert_eq!(provider.credential()?, "sk-first");

    // Rotated key replaces the value loaded on the previous call
    fs::write(&env_file, "SPEECH_STREAM_TEST_ROTATED_KEY=sk-second\n")?;
    assert_eq!(provider.credential()?, "sk-second");

    Ok(())
}

#[test]
fn test_env_credentials_reject_blank_value() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let env_file = temp_dir.path().join(".env");
    fs::write(&env_file, "SPEECH_STREAM_TEST_BLANK_KEY=\n")?;

    let provider = EnvCredentials::with_env_files("SPEECH_STREAM_TEST_BLANK_KEY", vec![env_file]);

    assert!(matches!(
        provider.credential(),
        Err(SpeechError::MissingCredential(_))
    ));

    Ok(())
}

#[test]
fn test_static_credential() {
    assert_eq!(StaticCredential::new("sk-123").credential().unwrap(), "sk-123");
    assert!(matches!(
        StaticCredential::new("").credential(),
        Err(SpeechError::MissingCredential(_))
    ));
}

#[test]
fn test_static_credential_debug_hides_key() {
    let debug = format!("{:?}", StaticCredential::new("sk-secret"));

    assert!(!debug.contains("sk-secret"));
}
