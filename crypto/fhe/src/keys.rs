//! FHE Key Management
//!
//! - ClientKey: For encryption and decryption (held by the oracle)
//! - ServerKey: For homomorphic operations (held by every executing node)
//!
//! TFHE-rs requires the server key to be installed in the process before
//! any homomorphic operation runs; `set_server_key` does that.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tfhe::{generate_keys, ConfigBuilder};
use tfhe::{ClientKey as TfheClientKey, ServerKey as TfheServerKey};

use crate::{FHEConfig, FHEError, FHEResult};

/// Global server key storage for homomorphic operations
static GLOBAL_SERVER_KEY: OnceCell<Arc<RwLock<Option<TfheServerKey>>>> = OnceCell::new();

fn get_global_server_key() -> &'static Arc<RwLock<Option<TfheServerKey>>> {
    GLOBAL_SERVER_KEY.get_or_init(|| Arc::new(RwLock::new(None)))
}

/// Set the server key for homomorphic operations
pub fn set_server_key(key: &ServerKey) {
    let global = get_global_server_key();
    let mut guard = global.write();
    *guard = Some(key.inner.clone());

    // Also set in TFHE-rs global context
    tfhe::set_server_key(key.inner.clone());
}

/// Clear the global server key
pub fn clear_server_key() {
    let global = get_global_server_key();
    let mut guard = global.write();
    *guard = None;
}

/// Client key for encryption and decryption
///
/// Must be kept secret; in the branch protocol only the oracle holds it.
#[derive(Clone)]
pub struct ClientKey {
    pub(crate) inner: TfheClientKey,
}

impl ClientKey {
    /// Generate a new client key
    pub fn generate(_config: &FHEConfig) -> FHEResult<Self> {
        let tfhe_config = ConfigBuilder::default().build();
        let (client_key, _server_key) = generate_keys(tfhe_config);

        Ok(Self { inner: client_key })
    }

    /// Derive the server key from this client key
    pub fn derive_server_key(&self) -> ServerKey {
        ServerKey {
            inner: TfheServerKey::new(&self.inner),
        }
    }

    /// Get reference to inner TFHE key
    pub fn inner(&self) -> &TfheClientKey {
        &self.inner
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FHEResult<Vec<u8>> {
        bincode::serialize(&self.inner)
            .map_err(|e| FHEError::SerializationError(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> FHEResult<Self> {
        let inner: TfheClientKey = bincode::deserialize(bytes)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKey").finish_non_exhaustive()
    }
}

/// Server key for homomorphic operations
///
/// Can be shared with every node to enable computation on encrypted data.
#[derive(Clone)]
pub struct ServerKey {
    pub(crate) inner: TfheServerKey,
}

impl ServerKey {
    /// Set this as the global server key for operations
    pub fn set_global(&self) {
        set_server_key(self);
    }

    /// Serialize to bytes (WARNING: server keys are large)
    pub fn to_bytes(&self) -> FHEResult<Vec<u8>> {
        bincode::serialize(&self.inner)
            .map_err(|e| FHEError::SerializationError(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> FHEResult<Self> {
        let inner: TfheServerKey = bincode::deserialize(bytes)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl std::fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerKey").finish_non_exhaustive()
    }
}

/// Complete key pair for FHE operations
#[derive(Clone)]
pub struct KeyPair {
    /// Client key (secret)
    pub client: ClientKey,
    /// Server key (can be shared)
    pub server: ServerKey,
}

impl KeyPair {
    /// Generate a new key pair
    ///
    /// WARNING: Key generation is slow (~10-30 seconds)
    pub fn generate(_config: &FHEConfig) -> FHEResult<Self> {
        let tfhe_config = ConfigBuilder::default().build();
        let (client_key, server_key) = generate_keys(tfhe_config);

        Ok(Self {
            client: ClientKey { inner: client_key },
            server: ServerKey { inner: server_key },
        })
    }

    /// Set the server key globally for operations
    pub fn set_server_key(&self) {
        self.server.set_global();
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").finish_non_exhaustive()
    }
}
