//! Binary operand resolution from precompile call data.

use std::sync::Arc;

use crate::errors::{PrecompileError, PrecompileResult};
use shroud_fhe::Ciphertext;
use shroud_registry::{CiphertextRegistry, Depth, Handle};

/// Call data layout for binary operations:
/// lhs handle (32) || rhs handle (32) || operator byte (1).
pub const BINARY_OPERAND_LEN: usize = 2 * Handle::LEN + 1;

/// Which operand of a binary operation failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Lhs,
    Rhs,
}

impl std::fmt::Display for OperandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSide::Lhs => write!(f, "left"),
            OperandSide::Rhs => write!(f, "right"),
        }
    }
}

/// Resolves both operand handles of a binary operation to their
/// canonical ciphertexts.
///
/// Both handles must name ciphertexts visible at `depth`. The left
/// operand is checked first, so call data with two bad handles reports
/// the left one. The trailing operator byte is the dispatcher's
/// concern; it is length-checked here and otherwise ignored.
///
/// Resolution is a pure read: no registry state changes on any path.
pub fn resolve_binary_operands(
    registry: &CiphertextRegistry,
    input: &[u8],
    depth: Depth,
) -> PrecompileResult<(Arc<Ciphertext>, Arc<Ciphertext>)> {
    if input.len() != BINARY_OPERAND_LEN {
        return Err(PrecompileError::MalformedInput {
            expected: BINARY_OPERAND_LEN,
            got: input.len(),
        });
    }

    let mut lhs_bytes = [0u8; Handle::LEN];
    lhs_bytes.copy_from_slice(&input[..Handle::LEN]);
    let mut rhs_bytes = [0u8; Handle::LEN];
    rhs_bytes.copy_from_slice(&input[Handle::LEN..2 * Handle::LEN]);

    let lhs = registry
        .get_verified(&Handle::from_bytes(lhs_bytes), depth)
        .ok_or(PrecompileError::UnverifiedHandle {
            side: OperandSide::Lhs,
        })?;
    let rhs = registry
        .get_verified(&Handle::from_bytes(rhs_bytes), depth)
        .ok_or(PrecompileError::UnverifiedHandle {
            side: OperandSide::Rhs,
        })?;

    Ok((lhs, rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_fhe::CipherKind;

    fn ct(fill: u8) -> Ciphertext {
        Ciphertext::new(vec![fill; 16], CipherKind::Uint64)
    }

    fn call_data(lhs: &Handle, rhs: &Handle, op: u8) -> Vec<u8> {
        let mut input = Vec::with_capacity(BINARY_OPERAND_LEN);
        input.extend_from_slice(lhs.as_bytes());
        input.extend_from_slice(rhs.as_bytes());
        input.push(op);
        input
    }

    #[test]
    fn test_resolves_both_operands() {
        let registry = CiphertextRegistry::default();
        let lhs = registry.import_at_depth(ct(1), 0);
        let rhs = registry.import_at_depth(ct(2), 0);

        let input = call_data(&lhs, &rhs, 0x01);
        let (a, b) = resolve_binary_operands(&registry, &input, 0).unwrap();

        // Canonical instances come straight out of the registry.
        assert!(Arc::ptr_eq(&a, &registry.lookup(&lhs).unwrap()));
        assert!(Arc::ptr_eq(&b, &registry.lookup(&rhs).unwrap()));
    }

    #[test]
    fn test_operator_byte_is_not_interpreted() {
        let registry = CiphertextRegistry::default();
        let lhs = registry.import_at_depth(ct(1), 0);
        let rhs = registry.import_at_depth(ct(2), 0);

        for op in [0x00, 0x7F, 0xFF] {
            let input = call_data(&lhs, &rhs, op);
            assert!(resolve_binary_operands(&registry, &input, 0).is_ok());
        }
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        let registry = CiphertextRegistry::default();

        for len in [0, 1, 32, 64, 66, 130] {
            let input = vec![0u8; len];
            let err = resolve_binary_operands(&registry, &input, 0).unwrap_err();
            match err {
                PrecompileError::MalformedInput { expected, got } => {
                    assert_eq!(expected, BINARY_OPERAND_LEN);
                    assert_eq!(got, len);
                }
                other => panic!("expected MalformedInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_lhs_reported_first() {
        let registry = CiphertextRegistry::default();
        let unknown_a = Handle::from_bytes([0xAA; 32]);
        let unknown_b = Handle::from_bytes([0xBB; 32]);

        // Both sides bad; the left one is named.
        let input = call_data(&unknown_a, &unknown_b, 0);
        let err = resolve_binary_operands(&registry, &input, 0).unwrap_err();

        assert!(matches!(
            err,
            PrecompileError::UnverifiedHandle {
                side: OperandSide::Lhs
            }
        ));
    }

    #[test]
    fn test_unknown_rhs_attributed_to_rhs() {
        let registry = CiphertextRegistry::default();
        let lhs = registry.import_at_depth(ct(1), 0);
        let unknown = Handle::from_bytes([0xCC; 32]);

        let input = call_data(&lhs, &unknown, 0);
        let err = resolve_binary_operands(&registry, &input, 0).unwrap_err();

        assert!(matches!(
            err,
            PrecompileError::UnverifiedHandle {
                side: OperandSide::Rhs
            }
        ));
    }

    #[test]
    fn test_visibility_is_depth_scoped() {
        let registry = CiphertextRegistry::default();
        let lhs = registry.import_at_depth(ct(1), 0);
        let rhs = registry.import_at_depth(ct(2), 0);

        let input = call_data(&lhs, &rhs, 0);
        assert!(resolve_binary_operands(&registry, &input, 0).is_ok());

        // Registered, but not visible one frame down.
        let err = resolve_binary_operands(&registry, &input, 1).unwrap_err();
        assert!(matches!(
            err,
            PrecompileError::UnverifiedHandle {
                side: OperandSide::Lhs
            }
        ));
    }

    #[test]
    fn test_same_handle_serves_both_sides() {
        let registry = CiphertextRegistry::default();
        let a = registry.import_at_depth(ct(7), 0);

        // Transaction input used as both operands at the entry depth.
        let input = call_data(&a, &a, 0x02);
        assert!(resolve_binary_operands(&registry, &input, 0).is_ok());

        // The nested frame never imported it.
        let err = resolve_binary_operands(&registry, &input, 1).unwrap_err();
        assert!(matches!(
            err,
            PrecompileError::UnverifiedHandle {
                side: OperandSide::Lhs
            }
        ));

        registry.import_at_depth(ct(7), 1);
        assert!(resolve_binary_operands(&registry, &input, 1).is_ok());
    }

    #[test]
    fn test_failed_resolution_has_no_side_effects() {
        let registry = CiphertextRegistry::default();
        let lhs = registry.import_at_depth(ct(1), 0);
        let rhs = registry.import_at_depth(ct(2), 1);

        // rhs is only visible at depth 1, so resolution at depth 0 fails.
        let input = call_data(&lhs, &rhs, 0);
        assert!(resolve_binary_operands(&registry, &input, 0).is_err());

        assert!(!registry.is_visible(&rhs, 0));
        assert!(registry.is_visible(&rhs, 1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(OperandSide::Lhs.to_string(), "left");
        assert_eq!(OperandSide::Rhs.to_string(), "right");
    }
}
