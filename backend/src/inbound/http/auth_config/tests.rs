//! Unit tests for auth configuration parsing.

use std::collections::HashMap;
use std::io::Write as _;

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

fn secret_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp secret");
    file.write_all(&vec![b's'; len]).expect("write temp secret");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn path_of(file: &NamedTempFile) -> String {
    file.path()
        .to_str()
        .expect("temporary path should be valid UTF-8")
        .to_owned()
}

#[fixture]
fn valid_secret() -> NamedTempFile {
    secret_file(TOKEN_SECRET_MIN_LEN)
}

fn release_vars(secret_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (SECRET_FILE_ENV, secret_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_explicit_settings(valid_secret: NamedTempFile) {
    let env = mock_env(release_vars(path_of(&valid_secret)));
    let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert_eq!(settings.secret.len(), TOKEN_SECRET_MIN_LEN);
    assert_eq!(
        settings.cookies,
        CookiePolicy {
            secure: true,
            same_site: SameSite::Strict
        }
    );
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(valid_secret: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(path_of(&valid_secret));
    vars.remove(missing);
    let env = mock_env(vars);

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("missing {missing} must fail");
    };
    assert!(matches!(err, AuthConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sideways")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_invalid_values(
    valid_secret: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(path_of(&valid_secret));
    vars.insert(name, value.to_owned());
    let env = mock_env(vars);

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("invalid {name} must fail");
    };
    assert!(matches!(err, AuthConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_short_secret() {
    let short = secret_file(TOKEN_SECRET_MIN_LEN - 1);
    let env = mock_env(release_vars(path_of(&short)));

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("short secret must fail");
    };
    assert!(matches!(
        err,
        AuthConfigError::SecretTooShort { length, .. } if length == TOKEN_SECRET_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_secret_file() {
    let env = mock_env(release_vars("/nonexistent/auth_secret".to_owned()));

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("unreadable secret must fail");
    };
    assert!(matches!(err, AuthConfigError::SecretRead { .. }));
}

#[rstest]
fn release_rejects_ephemeral_secret(valid_secret: NamedTempFile) {
    let mut vars = release_vars(path_of(&valid_secret));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());
    let env = mock_env(vars);

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("ephemeral secret must fail in release");
    };
    assert!(matches!(err, AuthConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_insecure_same_site_none(valid_secret: NamedTempFile) {
    let mut vars = release_vars(path_of(&valid_secret));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let env = mock_env(vars);

    let Err(err) = auth_settings_from_env(&env, BuildMode::Release) else {
        panic!("SameSite=None without Secure must fail");
    };
    assert!(matches!(err, AuthConfigError::InsecureSameSiteNone));
}

#[rstest]
fn debug_falls_back_to_defaults_and_ephemeral_secret() {
    let env = mock_env(HashMap::from([(
        SECRET_FILE_ENV,
        "/nonexistent/auth_secret".to_owned(),
    )]));

    let settings = auth_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");

    assert_eq!(settings.cookies, CookiePolicy::default());
    assert_eq!(settings.secret.len(), EPHEMERAL_SECRET_LEN);
}

#[rstest]
fn debug_accepts_short_secret() {
    let short = secret_file(4);
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, path_of(&short))]));

    let settings = auth_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.secret.len(), 4);
}

#[rstest]
#[case("YES", Some(true))]
#[case("n", Some(false))]
#[case("2", None)]
fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
