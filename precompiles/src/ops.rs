//! Precompile entry points.

use std::sync::Arc;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::encoding::length_prefixed;
use crate::errors::{PrecompileError, PrecompileResult};
use crate::operands::resolve_binary_operands;
use shroud_fhe::{CipherKind, Ciphertext, ClientKey, FHEOps, FHEResult};
use shroud_oracle::{OracleRole, RequireProtocol};
use shroud_registry::{CiphertextRegistry, Handle};
use shroud_sealed::seal_for_user;

/// Call data layout for sealing: handle (32) || recipient x25519 key (32).
const SEAL_INPUT_LEN: usize = Handle::LEN + 32;

/// The precompile surface for one deployment.
///
/// Holds the shared ciphertext registry, the role-specific require
/// protocol, and (on oracle deployments) the client key used for
/// sealing. Built once at process start; between calls the only state
/// it carries is the registry it feeds.
pub struct PrecompileSet {
    registry: Arc<CiphertextRegistry>,
    require: RequireProtocol,
    client_key: Option<ClientKey>,
}

impl PrecompileSet {
    pub fn new(registry: Arc<CiphertextRegistry>, require: RequireProtocol) -> Self {
        Self {
            registry,
            require,
            client_key: None,
        }
    }

    /// Attaches the client key that backs `seal_output`. Node
    /// deployments never hold one; sealing on a node fails with
    /// [`PrecompileError::ClientKeyNotSet`].
    pub fn with_client_key(mut self, client_key: ClientKey) -> Self {
        self.client_key = Some(client_key);
        self
    }

    /// Which side of the require protocol this deployment runs.
    pub fn role(&self) -> OracleRole {
        self.require.role()
    }

    /// The registry backing this set. Exposed for result lookup and for
    /// the host's size-based collection hints.
    pub fn registry(&self) -> &CiphertextRegistry {
        &self.registry
    }

    /// Ingests a user-provided ciphertext: payload bytes followed by a
    /// single kind tag byte. The ciphertext becomes visible at the
    /// caller's depth and its 32-byte handle is returned.
    ///
    /// This is the only entry path for ciphertexts arriving in
    /// transaction calldata; computed results enter through the
    /// arithmetic entry points instead.
    pub fn verify_ciphertext(
        &self,
        ctx: &dyn ExecutionContext,
        input: &[u8],
    ) -> PrecompileResult<Vec<u8>> {
        if input.len() < 2 {
            return Err(PrecompileError::MalformedInput {
                expected: 2,
                got: input.len(),
            });
        }
        let (payload, kind_tag) = input.split_at(input.len() - 1);
        let kind = CipherKind::try_from(kind_tag[0])?;

        let depth = ctx.call_depth();
        let handle = self
            .registry
            .import_at_depth(Ciphertext::new(payload.to_vec(), kind), depth);

        debug!(handle = %handle, %kind, depth, "Verified user ciphertext");
        Ok(handle.as_bytes().to_vec())
    }

    /// Homomorphic addition over two verified handles.
    pub fn add(&self, ctx: &dyn ExecutionContext, input: &[u8]) -> PrecompileResult<Vec<u8>> {
        self.homomorphic_binary(ctx, input, "add", FHEOps::add)
    }

    /// Homomorphic subtraction over two verified handles.
    pub fn sub(&self, ctx: &dyn ExecutionContext, input: &[u8]) -> PrecompileResult<Vec<u8>> {
        self.homomorphic_binary(ctx, input, "sub", FHEOps::sub)
    }

    /// Homomorphic less-than-or-equal. The result is a Bool-kind
    /// ciphertext, which makes this the usual producer of `require`
    /// conditions.
    pub fn lte(&self, ctx: &dyn ExecutionContext, input: &[u8]) -> PrecompileResult<Vec<u8>> {
        self.homomorphic_binary(ctx, input, "lte", FHEOps::le)
    }

    fn homomorphic_binary(
        &self,
        ctx: &dyn ExecutionContext,
        input: &[u8],
        op_name: &'static str,
        op: fn(&Ciphertext, &Ciphertext) -> FHEResult<Ciphertext>,
    ) -> PrecompileResult<Vec<u8>> {
        let depth = ctx.call_depth();
        let (lhs, rhs) = resolve_binary_operands(&self.registry, input, depth)?;

        if lhs.kind() != rhs.kind() {
            return Err(PrecompileError::TypeMismatch {
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            });
        }

        // Operands are our own Arc copies; no registry guard is held
        // while the FHE work runs.
        let result = op(&lhs, &rhs)?;
        let handle = self.registry.import_at_depth(result, depth);

        debug!(op = op_name, handle = %handle, depth, "Interned homomorphic result");
        Ok(handle.as_bytes().to_vec())
    }

    /// Resolves an encrypted branch condition. Input is the 32-byte
    /// handle of a visible condition ciphertext.
    ///
    /// On the oracle this decrypts and publishes a signed record; on
    /// nodes it verifies the published record. Oracle-side errors are
    /// fatal ([`PrecompileError::is_fatal`]); node-side verification
    /// failures come back as `Ok(false)`.
    pub fn require(&self, ctx: &dyn ExecutionContext, input: &[u8]) -> PrecompileResult<bool> {
        let handle = Handle::from_slice(input).ok_or(PrecompileError::MalformedInput {
            expected: Handle::LEN,
            got: input.len(),
        })?;

        let condition = self
            .registry
            .get_verified(&handle, ctx.call_depth())
            .ok_or(PrecompileError::UnknownHandle(handle))?;

        let value = self.require.evaluate_condition(&condition)?;
        debug!(handle = %handle, value, role = %self.require.role(), "Require resolved");
        Ok(value)
    }

    /// Decrypts a visible ciphertext and re-encrypts it to a user's
    /// X25519 public key. Input is handle (32) || user key (32); output
    /// is the length-prefixed sealed blob.
    ///
    /// The decrypted value never leaves this function unencrypted.
    pub fn seal_output(
        &self,
        ctx: &dyn ExecutionContext,
        input: &[u8],
    ) -> PrecompileResult<Vec<u8>> {
        if input.len() != SEAL_INPUT_LEN {
            return Err(PrecompileError::MalformedInput {
                expected: SEAL_INPUT_LEN,
                got: input.len(),
            });
        }
        let mut handle_bytes = [0u8; Handle::LEN];
        handle_bytes.copy_from_slice(&input[..Handle::LEN]);
        let handle = Handle::from_bytes(handle_bytes);
        let user_key = &input[Handle::LEN..];

        let ciphertext = self
            .registry
            .get_verified(&handle, ctx.call_depth())
            .ok_or(PrecompileError::UnknownHandle(handle))?;

        let client_key = self
            .client_key
            .as_ref()
            .ok_or(PrecompileError::ClientKeyNotSet)?;

        let value = match ciphertext.kind() {
            CipherKind::Uint64 => ciphertext.decrypt_u64(client_key)?,
            CipherKind::Bool => ciphertext.decrypt_bool(client_key)? as u64,
        };

        let sealed = seal_for_user(value, user_key)?;
        debug!(handle = %handle, "Sealed output for user key");
        Ok(length_prefixed(&sealed))
    }
}

impl std::fmt::Debug for PrecompileSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrecompileSet")
            .field("role", &self.require.role())
            .field("registry_len", &self.registry.len())
            .field("has_client_key", &self.client_key.is_some())
            .finish()
    }
}
