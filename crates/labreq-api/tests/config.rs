use std::collections::HashMap;

use labreq_api::config::{ApiConfig, AuthKey, ConfigError, StoreBackend};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_with_only_a_secret() {
    let config = ApiConfig::from_lookup(lookup(&[("LABREQ_AUTH_HS256_SECRET", "s3cret")])).unwrap();
    assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(
        config.store,
        StoreBackend::S3 {
            bucket: "labreq".to_string(),
            region: None
        }
    );
    assert_eq!(config.auth_key, AuthKey::Hs256Secret("s3cret".to_string()));
    assert!(config.issuer.is_none());
    assert!(config.verifier().is_ok());
}

#[test]
fn explicit_values_are_used() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("LABREQ_STORE", "memory"),
        ("LABREQ_LISTEN_ADDR", "127.0.0.1:9000"),
        ("LABREQ_AUTH_HS256_SECRET", "s3cret"),
        ("LABREQ_AUTH_ISSUER", "https://issuer.example"),
        ("LABREQ_AUTH_AUDIENCE", ""),
    ]))
    .unwrap();
    assert_eq!(config.store, StoreBackend::Memory);
    assert_eq!(config.listen_addr.port(), 9000);
    assert_eq!(config.issuer.as_deref(), Some("https://issuer.example"));
    assert!(config.audience.is_none());
}

#[test]
fn missing_key_and_bad_values_are_errors() {
    assert!(matches!(
        ApiConfig::from_lookup(lookup(&[])),
        Err(ConfigError::MissingAuthKey)
    ));
    assert!(matches!(
        ApiConfig::from_lookup(lookup(&[
            ("LABREQ_AUTH_HS256_SECRET", "s"),
            ("LABREQ_STORE", "firestore"),
        ])),
        Err(ConfigError::UnknownStore(s)) if s == "firestore"
    ));
    assert!(matches!(
        ApiConfig::from_lookup(lookup(&[
            ("LABREQ_AUTH_HS256_SECRET", "s"),
            ("LABREQ_LISTEN_ADDR", "not an address"),
        ])),
        Err(ConfigError::ListenAddr { .. })
    ));
}

#[test]
fn bad_public_key_fails_verifier_construction() {
    let config = ApiConfig::from_lookup(lookup(&[(
        "LABREQ_AUTH_PUBLIC_KEY_PEM",
        "-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----",
    )]))
    .unwrap();
    assert!(matches!(config.auth_key, AuthKey::Rs256Pem(_)));
    assert!(matches!(config.verifier(), Err(ConfigError::Auth(_))));
}
