use std::net::SocketAddr;

use labreq_auth::jwt::TokenVerifier;
use thiserror::Error;

const DEFAULT_BUCKET: &str = "labreq";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown store backend {0:?}, expected \"s3\" or \"memory\"")]
    UnknownStore(String),

    #[error("invalid listen address {value:?}: {reason}")]
    ListenAddr { value: String, reason: String },

    #[error("no token key configured: set LABREQ_AUTH_PUBLIC_KEY_PEM or LABREQ_AUTH_HS256_SECRET")]
    MissingAuthKey,

    #[error(transparent)]
    Auth(#[from] labreq_auth::error::AuthError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    S3 { bucket: String, region: Option<String> },
    /// Process-local store. Records are lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthKey {
    Rs256Pem(String),
    Hs256Secret(String),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub store: StoreBackend,
    pub auth_key: AuthKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let listen = var("LABREQ_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen
            .parse::<SocketAddr>()
            .map_err(|e: std::net::AddrParseError| ConfigError::ListenAddr {
                value: listen.clone(),
                reason: e.to_string(),
            })?;

        let store = match var("LABREQ_STORE").as_deref().unwrap_or("s3") {
            "s3" => StoreBackend::S3 {
                bucket: var("LABREQ_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                region: var("AWS_REGION"),
            },
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        let auth_key = match (
            var("LABREQ_AUTH_PUBLIC_KEY_PEM"),
            var("LABREQ_AUTH_HS256_SECRET"),
        ) {
            (Some(pem), _) => AuthKey::Rs256Pem(pem),
            (None, Some(secret)) => AuthKey::Hs256Secret(secret),
            (None, None) => return Err(ConfigError::MissingAuthKey),
        };

        Ok(Self {
            listen_addr,
            store,
            auth_key,
            issuer: var("LABREQ_AUTH_ISSUER"),
            audience: var("LABREQ_AUTH_AUDIENCE"),
        })
    }

    pub fn verifier(&self) -> Result<TokenVerifier, ConfigError> {
        let issuer = self.issuer.as_deref();
        let audience = self.audience.as_deref();
        Ok(match &self.auth_key {
            AuthKey::Rs256Pem(pem) => TokenVerifier::rs256_pem(pem.as_bytes(), issuer, audience)?,
            AuthKey::Hs256Secret(secret) => {
                TokenVerifier::hs256(secret.as_bytes(), issuer, audience)
            }
        })
    }
}
