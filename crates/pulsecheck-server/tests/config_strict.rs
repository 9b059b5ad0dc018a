#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pulsecheck_core::PulseCheckError;
use pulsecheck_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:3000"
  shutdwn_grace_ms: 15000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, PulseCheckError::InvalidConfig(_)));
}

#[test]
fn ok_minimal_config_gets_defaults() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen, "0.0.0.0:3000");
    assert_eq!(cfg.server.shutdown_grace_ms, 15_000);
    assert!(cfg.server.static_dir.is_none());
    assert_eq!(cfg.app.name, "pulsecheck");
    assert_eq!(cfg.app.environment, "development");
    assert_eq!(cfg.app.instance, "localhost");
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, PulseCheckError::InvalidConfig(_)));
}

#[test]
fn grace_window_range_enforced() {
    let bad = r#"
version: 1
server:
  shutdown_grace_ms: 100
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, PulseCheckError::InvalidConfig(_)));
}

#[test]
fn listen_addr_is_typed_once_validated() {
    let cfg = config::load_from_str(
        "version: 1\nserver:\n  listen: \"127.0.0.1:8080\"\n",
    )
    .unwrap();
    assert_eq!(
        cfg.server.listen_addr().unwrap(),
        "127.0.0.1:8080".parse::<std::net::SocketAddr>().unwrap()
    );
}

#[test]
fn env_overrides_port_env_and_instance() {
    let mut cfg = config::load_from_str("version: 1\n").unwrap();
    config::apply_env_overrides(&mut cfg, |name| match name {
        "PORT" => Some("8081".into()),
        "APP_ENV" => Some("production".into()),
        "INSTANCE" => Some("pod-7".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(cfg.server.listen, "0.0.0.0:8081");
    assert_eq!(cfg.app.environment, "production");
    assert_eq!(cfg.app.instance, "pod-7");
}

#[test]
fn bad_port_override_rejected() {
    let mut cfg = config::load_from_str("version: 1\n").unwrap();
    let err = config::apply_env_overrides(&mut cfg, |name| {
        (name == "PORT").then(|| "not-a-port".to_string())
    })
    .expect_err("must fail");
    assert!(matches!(err, PulseCheckError::InvalidConfig(_)));
}
