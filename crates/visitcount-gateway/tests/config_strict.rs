#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use visitcount_core::response::FieldName;
use visitcount_gateway::config::{self, StoreBackend};

fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |k: &str| {
        pairs
            .iter()
            .find(|(name, _)| *name == k)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
store:
  table: "visitors"
response:
  feild_name: cnt # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
store:
  table: "visitors"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.path, "/v1/visits");
    assert_eq!(cfg.store.backend, StoreBackend::Memory);
    assert_eq!(cfg.response.field_name, FieldName::Count);
    assert!(cfg.response.include_cors);
}

#[test]
fn missing_table_is_fatal() {
    let err = config::load_from_str("version: 1\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert!(err.to_string().contains("TABLE_NAME"));
}

#[test]
fn table_name_env_overrides_yaml() {
    let yaml = r#"
version: 1
store:
  table: "from-yaml"
"#;
    let cfg = config::load_from_str_with(yaml, env_of(&[("TABLE_NAME", "from-env")]))
        .expect("must parse");
    assert_eq!(cfg.store.table.as_deref(), Some("from-env"));
}

#[test]
fn defaults_apply_without_config_file() {
    let cfg = config::load_with(env_of(&[("TABLE_NAME", "visitors")])).expect("must load");
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.store.table_name().unwrap(), "visitors");
}

#[test]
fn invalid_table_names_rejected() {
    for bad in ["ab", "has space", "slash/name"] {
        let yaml = format!("version: 1\nstore:\n  table: \"{bad}\"\n");
        assert!(config::load_from_str(&yaml).is_err(), "{bad} must be rejected");
    }
    let long = "t".repeat(256);
    assert!(config::load_from_str(&format!("version: 1\nstore:\n  table: {long}\n")).is_err());
}

#[test]
fn server_section_validated() {
    let bad_listen = "version: 1\nserver:\n  listen: \"nope\"\nstore:\n  table: visitors\n";
    assert!(config::load_from_str(bad_listen).is_err());

    let bad_path = "version: 1\nserver:\n  path: \"visits\"\nstore:\n  table: visitors\n";
    assert!(config::load_from_str(bad_path).is_err());

    let ops_path = "version: 1\nserver:\n  path: \"/metrics\"\nstore:\n  table: visitors\n";
    assert!(config::load_from_str(ops_path).is_err());

    for bad in ["/v1/:", "/v1/*", "/v1/:id", "/v1/{x}", "/v1/*rest", "/v1//visits"] {
        let yaml = format!("version: 1\nserver:\n  path: \"{bad}\"\nstore:\n  table: visitors\n");
        let err = config::load_from_str(&yaml).expect_err(bad);
        assert_eq!(err.client_code().as_str(), "CONFIG", "{bad}");
    }

    let nested = "version: 1\nserver:\n  path: \"/api/v2/visit-count\"\nstore:\n  table: visitors\n";
    assert!(config::load_from_str(nested).is_ok());
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\nstore:\n  table: visitors\n")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn cnt_variant_without_cors() {
    let yaml = r#"
version: 1
store:
  backend: file
  table: visitors
  data_dir: /var/lib/visitcount
response:
  field_name: cnt
  include_cors: false
"#;
    let cfg = config::load_from_str(yaml).expect("must parse");
    let contract = cfg.response.contract();
    assert_eq!(contract.field_name, FieldName::Cnt);
    assert!(!contract.include_cors);
    assert_eq!(cfg.store.backend, StoreBackend::File);
}

#[test]
fn config_file_named_by_env() {
    let path = std::env::temp_dir().join(format!("visitcount-cfg-{}.yaml", std::process::id()));
    std::fs::write(
        &path,
        "version: 1\nserver:\n  path: \"/api/count\"\nresponse:\n  field_name: cnt\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().into_owned();

    let cfg = config::load_with(|k: &str| match k {
        "VISITCOUNT_CONFIG" => Some(path_str.clone()),
        "TABLE_NAME" => Some("visitors".to_string()),
        _ => None,
    })
    .expect("must load");
    assert_eq!(cfg.server.path, "/api/count");
    assert_eq!(cfg.response.field_name, FieldName::Cnt);
    let _ = std::fs::remove_file(&path);

    let missing = config::load_with(|k: &str| match k {
        "VISITCOUNT_CONFIG" => Some("/nonexistent/visitcount.yaml".to_string()),
        "TABLE_NAME" => Some("visitors".to_string()),
        _ => None,
    });
    assert!(missing.is_err());
}
