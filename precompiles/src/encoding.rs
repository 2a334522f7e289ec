//! Output encoding for variable-length precompile returns.

/// Width of the big-endian length word prefixed to variable-length
/// returns. Matches the 32-byte word size of the host VM's ABI.
pub const LENGTH_PREFIX_SIZE: usize = 32;

/// Wraps a payload in a 32-byte big-endian length prefix.
///
/// Fixed-size returns (handles) go back raw; anything variable-length
/// (sealed outputs) is prefixed so the VM can slice it without guessing.
pub fn length_prefixed(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; LENGTH_PREFIX_SIZE];
    out[LENGTH_PREFIX_SIZE - 8..].copy_from_slice(&(payload.len() as u64).to_be_bytes());
    out.extend_from_slice(payload);
    out
}
