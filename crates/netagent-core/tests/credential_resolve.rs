mod common;

use common::{record, unique_temp_dir, write_file, CleanupDir};
use netagent_core::config::InstallerConfig;
use netagent_core::credentials::{CredentialField, PartialCredentials};
use netagent_core::resolver::CredentialResolver;
use netagent_core::url::DEFAULT_SERVICE_URL;

const LEGACY_CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <appSettings>
    <add key="TeamServerUrl" value="https://legacy.example.com/Contrast/" />
    <add key="TeamServerApiKey" value="legacy-api" />
    <add value="legacy-service" key="TeamServerServiceKey"/>
    <add key="TeamServerUserName" value="agent&amp;legacy" />
  </appSettings>
</configuration>
"#;

struct Layout {
    _cleanup: CleanupDir,
    install_dir: std::path::PathBuf,
    data_dir: std::path::PathBuf,
}

fn layout(prefix: &str) -> Layout {
    let root = unique_temp_dir(prefix);
    let install_dir = root.join("install");
    let data_dir = root.join("data");
    std::fs::create_dir_all(&install_dir).expect("install dir");
    std::fs::create_dir_all(&data_dir).expect("data dir");
    Layout {
        _cleanup: CleanupDir(root),
        install_dir,
        data_dir,
    }
}

fn explicit(api_key: Option<&str>) -> PartialCredentials {
    PartialCredentials {
        api_key: api_key.map(str::to_string),
        ..PartialCredentials::default()
    }
}

#[test]
fn explicit_complete_without_prior_uses_default_url() {
    let config = InstallerConfig::default();
    let input = PartialCredentials {
        api_key: Some("k".into()),
        service_key: Some("s".into()),
        user_name: Some("u".into()),
        api_url: None,
    };
    let creds = CredentialResolver::new(&config)
        .resolve(&input, None)
        .expect("complete");
    assert_eq!(creds.api_url(), DEFAULT_SERVICE_URL);
    assert_eq!(creds.api_key(), "k");
    assert_eq!(creds.service_key(), "s");
    assert_eq!(creds.user_name(), "u");
}

#[test]
fn no_prior_and_no_explicit_is_incomplete() {
    let config = InstallerConfig::default();
    let err = CredentialResolver::new(&config)
        .resolve(&PartialCredentials::default(), None)
        .expect_err("incomplete");
    assert_eq!(
        err.missing,
        vec![
            CredentialField::ApiKey,
            CredentialField::ServiceKey,
            CredentialField::UserName
        ]
    );
}

#[test]
fn blank_explicit_values_count_as_missing() {
    let config = InstallerConfig::default();
    let input = PartialCredentials {
        api_key: Some("k".into()),
        service_key: Some("  ".into()),
        user_name: Some(String::new()),
        api_url: None,
    };
    let err = CredentialResolver::new(&config)
        .resolve(&input, None)
        .expect_err("incomplete");
    assert_eq!(
        err.missing,
        vec![CredentialField::ServiceKey, CredentialField::UserName]
    );
}

#[test]
fn explicit_values_are_never_overwritten_by_structured_file() {
    let l = layout("netagent-resolve-yaml");
    write_file(
        &l.data_dir.join("contrast_security.yaml"),
        "api:\n  url: https://yaml.example.com\n  api_key: from-yaml\n  service_key: Y\n  user_name: Z\n",
    );
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let creds = CredentialResolver::new(&config)
        .resolve(&explicit(Some("X")), Some(&prior))
        .expect("complete");
    assert_eq!(creds.api_key(), "X");
    assert_eq!(creds.service_key(), "Y");
    assert_eq!(creds.user_name(), "Z");
    assert_eq!(creds.api_url(), "https://yaml.example.com");
}

#[test]
fn legacy_file_fills_fields_structured_file_lacks() {
    let l = layout("netagent-resolve-layered");
    write_file(
        &l.data_dir.join("contrast_security.yaml"),
        "# agent config\napi:\n  url: \"https://yaml.example.com/Contrast\"\n",
    );
    write_file(&l.install_dir.join("DotnetAgentService.exe.config"), LEGACY_CONFIG);
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let creds = CredentialResolver::new(&config)
        .resolve(&PartialCredentials::default(), Some(&prior))
        .expect("complete");
    assert_eq!(creds.api_url(), "https://yaml.example.com");
    assert_eq!(creds.api_key(), "legacy-api");
    assert_eq!(creds.service_key(), "legacy-service");
    assert_eq!(creds.user_name(), "agent&legacy");
}

#[test]
fn legacy_file_alone_is_enough() {
    let l = layout("netagent-resolve-legacy");
    write_file(&l.install_dir.join("DotnetAgentService.exe.config"), LEGACY_CONFIG);
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let creds = CredentialResolver::new(&config)
        .resolve(&PartialCredentials::default(), Some(&prior))
        .expect("complete");
    assert_eq!(creds.api_url(), "https://legacy.example.com");
    assert_eq!(creds.api_key(), "legacy-api");
}

#[test]
fn malformed_files_leave_fields_unset() {
    let l = layout("netagent-resolve-malformed");
    write_file(
        &l.data_dir.join("contrast_security.yaml"),
        "{{{ not yaml\napi_key:\nservice_key: '' \n",
    );
    write_file(&l.install_dir.join("DotnetAgentService.exe.config"), "<configuration><add key=");
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let err = CredentialResolver::new(&config)
        .resolve(&explicit(Some("X")), Some(&prior))
        .expect_err("incomplete");
    assert_eq!(
        err.missing,
        vec![CredentialField::ServiceKey, CredentialField::UserName]
    );
}

#[test]
fn prior_without_config_files_is_incomplete() {
    let l = layout("netagent-resolve-empty");
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let err = CredentialResolver::new(&config)
        .resolve(&PartialCredentials::default(), Some(&prior))
        .expect_err("incomplete");
    assert_eq!(err.missing.len(), 3);
    assert!(err.to_string().contains("api-key"));
}

struct CleanupFile(std::path::PathBuf);

impl Drop for CleanupFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn record_without_directories_never_reads_working_directory() {
    let cwd = std::env::current_dir().expect("cwd");
    let tag = uuid::Uuid::new_v4();
    let config = InstallerConfig {
        structured_config_file: format!("netagent-cwd-{tag}.yaml"),
        legacy_config_file: format!("netagent-cwd-{tag}.config"),
        ..InstallerConfig::default()
    };
    let yaml = cwd.join(&config.structured_config_file);
    let legacy = cwd.join(&config.legacy_config_file);
    let _cleanup_yaml = CleanupFile(yaml.clone());
    let _cleanup_legacy = CleanupFile(legacy.clone());
    write_file(
        &yaml,
        "api:\n  api_key: cwd-api\n  service_key: cwd-svc\n  user_name: cwd-user\n",
    );
    write_file(&legacy, LEGACY_CONFIG);

    let resolver = CredentialResolver::new(&config);
    for prior in [
        record("1.0.0", std::path::Path::new(""), std::path::Path::new("")),
        record("1.0.0", std::path::Path::new("."), std::path::Path::new(".")),
    ] {
        let err = resolver
            .resolve(&PartialCredentials::default(), Some(&prior))
            .expect_err("incomplete");
        assert_eq!(err.missing.len(), 3);
    }
}

#[test]
fn yaml_comments_and_trailing_comments_are_ignored() {
    let l = layout("netagent-resolve-comments");
    write_file(
        &l.data_dir.join("contrast_security.yaml"),
        "api:\n  # api_key: commented-out\n  api_key: real-key # inline\n  service_key: 's k'\n  user_name: \"u\"\n",
    );
    let prior = record("1.0.0", &l.install_dir, &l.data_dir);
    let config = InstallerConfig::default();

    let creds = CredentialResolver::new(&config)
        .resolve(&PartialCredentials::default(), Some(&prior))
        .expect("complete");
    assert_eq!(creds.api_key(), "real-key");
    assert_eq!(creds.service_key(), "s k");
    assert_eq!(creds.user_name(), "u");
}

#[test]
fn debug_output_redacts_secrets() {
    let config = InstallerConfig::default();
    let input = PartialCredentials {
        api_key: Some("secret-api".into()),
        service_key: Some("secret-service".into()),
        user_name: Some("u".into()),
        api_url: None,
    };
    let creds = CredentialResolver::new(&config)
        .resolve(&input, None)
        .expect("complete");
    let printed = format!("{creds:?} {input:?}");
    assert!(!printed.contains("secret-api"));
    assert!(!printed.contains("secret-service"));
}
