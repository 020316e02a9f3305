//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

#[fixture]
fn full_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn env_with(vars: &[(&'static str, &str)]) -> MockEnv {
    let vars: HashMap<&'static str, String> = vars
        .iter()
        .map(|(name, value)| (*name, (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn release_vars(key: &NamedTempFile) -> Vec<(&'static str, String)> {
    vec![
        (KEY_FILE_ENV, key.path().display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]
}

fn release_env(key: &NamedTempFile, overrides: &[(&'static str, Option<&str>)]) -> MockEnv {
    let mut vars = release_vars(key);
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        if let Some(value) = value {
            vars.push((*name, (*value).to_owned()));
        }
    }
    let borrowed: Vec<(&'static str, &str)> =
        vars.iter().map(|(name, value)| (*name, value.as_str())).collect();
    env_with(&borrowed)
}

fn release_error(env: &MockEnv) -> SessionConfigError {
    match session_settings_from_env(env, BuildMode::Release) {
        Ok(_) => panic!("release settings should be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_complete_settings(full_key: NamedTempFile) {
    let env = release_env(&full_key, &[]);
    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggles(full_key: NamedTempFile, #[case] missing: &'static str) {
    let env = release_env(&full_key, &[(missing, None)]);
    let err = release_error(&env);
    assert!(
        matches!(err, SessionConfigError::MissingEnv { name } if name == missing),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(COOKIE_SECURE_ENV, "")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "2")]
fn release_rejects_malformed_toggles(
    full_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let env = release_env(&full_key, &[(name, Some(value))]);
    let err = release_error(&env);
    assert!(
        matches!(&err, SessionConfigError::InvalidEnv { name: got, value: raw, .. }
            if *got == name && raw == value),
        "unexpected error: {err}"
    );
}

#[rstest]
fn release_rejects_ephemeral_keys(full_key: NamedTempFile) {
    let env = release_env(&full_key, &[(ALLOW_EPHEMERAL_ENV, Some("yes"))]);
    assert!(matches!(
        release_error(&env),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(full_key: NamedTempFile) {
    let env = release_env(
        &full_key,
        &[(COOKIE_SECURE_ENV, Some("0")), (SAMESITE_ENV, Some("None"))],
    );
    assert!(matches!(
        release_error(&env),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_rejects_unreadable_and_short_keys() {
    let dir = tempfile::tempdir().expect("create temporary directory");
    let absent = dir.path().join("session_key").display().to_string();
    let placeholder = key_file(SESSION_KEY_MIN_LEN);
    let env = release_env(&placeholder, &[(KEY_FILE_ENV, Some(absent.as_str()))]);
    assert!(matches!(
        release_error(&env),
        SessionConfigError::KeyRead { .. }
    ));

    let short = key_file(32);
    let env = release_env(&short, &[]);
    assert!(matches!(
        release_error(&env),
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("create temporary directory");
    let absent = dir.path().join("session_key").display().to_string();
    let env = env_with(&[(KEY_FILE_ENV, absent.as_str())]);

    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("lax", SameSite::Lax)]
#[case("STRICT", SameSite::Strict)]
#[case("bogus", SameSite::Lax)]
fn debug_parses_same_site_case_insensitively(
    full_key: NamedTempFile,
    #[case] raw: &str,
    #[case] expected: SameSite,
) {
    let path = full_key.path().display().to_string();
    let env = env_with(&[(KEY_FILE_ENV, path.as_str()), (SAMESITE_ENV, raw)]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn debug_tolerates_insecure_same_site_none(full_key: NamedTempFile) {
    let path = full_key.path().display().to_string();
    let env = env_with(&[
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "no"),
        (SAMESITE_ENV, "None"),
    ]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn derived_keys_are_stable_for_the_same_file(full_key: NamedTempFile) {
    let first = session_settings_from_env(&release_env(&full_key, &[]), BuildMode::Release)
        .expect("first load");
    let second = session_settings_from_env(&release_env(&full_key, &[]), BuildMode::Release)
        .expect("second load");
    assert_eq!(first.key.master(), second.key.master());
}
