use jsonwebtoken::{EncodingKey, Header, encode};
use labreq_auth::error::AuthError;
use labreq_auth::jwt::{IdentityClaims, TokenVerifier, bearer_token};

const SECRET: &[u8] = b"test-secret";

fn token(sub: &str, exp_offset: i64, secret: &[u8]) -> String {
    let now = jiff::Timestamp::now().as_second();
    let claims = IdentityClaims {
        sub: sub.to_string(),
        exp: (now + exp_offset) as u64,
        iat: Some(now as u64),
        email: Some("clinician@example.org".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

#[test]
fn valid_token_yields_user() {
    let verifier = TokenVerifier::hs256(SECRET, None, None);
    let user = verifier.verify(&token("uid-123", 3600, SECRET)).unwrap();
    assert_eq!(user.uid, "uid-123");
    assert_eq!(user.email.as_deref(), Some("clinician@example.org"));
}

#[test]
fn expired_token_is_rejected() {
    let verifier = TokenVerifier::hs256(SECRET, None, None);
    let err = verifier.verify(&token("uid-123", -3600, SECRET)).unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
}

#[test]
fn wrong_signature_is_rejected() {
    let verifier = TokenVerifier::hs256(SECRET, None, None);
    let err = verifier
        .verify(&token("uid-123", 3600, b"other-secret"))
        .unwrap_err();
    assert!(matches!(err, AuthError::Jwt(_)));
}

#[test]
fn issuer_mismatch_is_rejected() {
    let verifier = TokenVerifier::hs256(SECRET, Some("https://issuer.example"), None);
    assert!(verifier.verify(&token("uid-123", 3600, SECRET)).is_err());
}

#[test]
fn empty_token_is_missing() {
    let verifier = TokenVerifier::hs256(SECRET, None, None);
    assert!(matches!(verifier.verify(""), Err(AuthError::MissingToken)));
}

#[test]
fn bearer_header_parsing() {
    assert_eq!(bearer_token("Bearer abc.def").unwrap(), "abc.def");
    assert!(bearer_token("Basic abc").is_err());
    assert!(bearer_token("Bearer ").is_err());
    assert!(bearer_token("Bearerabc").is_err());
}

#[test]
fn bearer_scheme_is_case_insensitive() {
    assert_eq!(bearer_token("bearer abc.def").unwrap(), "abc.def");
    assert_eq!(bearer_token("BEARER  abc.def ").unwrap(), "abc.def");
}

#[test]
fn bad_pem_is_a_config_error() {
    let err = TokenVerifier::rs256_pem(b"not a key", None, None).err().unwrap();
    assert!(matches!(err, AuthError::Config(_)));
}
