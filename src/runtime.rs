//! Process-start assembly.
//!
//! Turns a validated [`ShroudConfig`](crate::config::ShroudConfig) into a
//! role-appropriate [`PrecompileSet`]: opens the require store at the
//! configured path, wires up the matching half of the require protocol,
//! and hands back the precompile surface the host embeds.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, ShroudConfig};
use shroud_fhe::ClientKey;
use shroud_oracle::{
    OracleRole, RedbRequireStore, RequireProtocol, RequirePublisher, RequireVerifier, SigningKey,
    StoreError, VerifyingKey,
};
use shroud_precompiles::PrecompileSet;
use shroud_registry::CiphertextRegistry;

/// Runtime assembly errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid oracle public key: {0}")]
    InvalidOracleKey(String),

    #[error("Configured mode is {configured}, cannot build {requested} runtime")]
    RoleMismatch {
        configured: OracleRole,
        requested: OracleRole,
    },
}

/// Assembles the oracle-side precompile surface.
///
/// The caller supplies the key material: the FHE client key used for
/// condition decryption and sealing, and the ed25519 key require
/// records are signed with. Key distribution is the host's problem.
pub fn build_oracle(
    config: &ShroudConfig,
    client_key: ClientKey,
    signing_key: SigningKey,
) -> Result<PrecompileSet, RuntimeError> {
    if config.oracle.mode != OracleRole::Oracle {
        return Err(RuntimeError::RoleMismatch {
            configured: config.oracle.mode,
            requested: OracleRole::Oracle,
        });
    }

    let store = Arc::new(RedbRequireStore::open(&config.oracle.store_path)?);
    let publisher = RequirePublisher::new(
        store,
        Arc::new(client_key.clone()),
        signing_key,
        config.oracle.require_retry_count,
    );

    info!(store = %config.oracle.store_path.display(), "Oracle runtime assembled");

    Ok(PrecompileSet::new(
        Arc::new(CiphertextRegistry::default()),
        RequireProtocol::Oracle(publisher),
    )
    .with_client_key(client_key))
}

/// Assembles the node-side precompile surface from configuration alone.
///
/// Nodes hold no FHE key material; the only trust input is the oracle
/// public key from configuration.
pub fn build_node(config: &ShroudConfig) -> Result<PrecompileSet, RuntimeError> {
    if config.oracle.mode != OracleRole::Node {
        return Err(RuntimeError::RoleMismatch {
            configured: config.oracle.mode,
            requested: OracleRole::Node,
        });
    }

    let oracle_key = parse_oracle_key(config)?;
    let store = Arc::new(RedbRequireStore::open(&config.oracle.store_path)?);
    let verifier = RequireVerifier::new(store, oracle_key, config.oracle.require_retry_count);

    info!(store = %config.oracle.store_path.display(), "Node runtime assembled");

    Ok(PrecompileSet::new(
        Arc::new(CiphertextRegistry::default()),
        RequireProtocol::Node(verifier),
    ))
}

fn parse_oracle_key(config: &ShroudConfig) -> Result<VerifyingKey, RuntimeError> {
    let hex_key = config.oracle.oracle_public_key.as_deref().ok_or_else(|| {
        RuntimeError::InvalidOracleKey("no oracle_public_key configured".to_string())
    })?;

    let decoded =
        hex::decode(hex_key).map_err(|e| RuntimeError::InvalidOracleKey(e.to_string()))?;
    let bytes: [u8; 32] = decoded.as_slice().try_into().map_err(|_| {
        RuntimeError::InvalidOracleKey(format!("expected 32 bytes, got {}", decoded.len()))
    })?;

    VerifyingKey::from_bytes(&bytes).map_err(|e| RuntimeError::InvalidOracleKey(e.to_string()))
}
