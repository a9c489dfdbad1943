use crate::model::{EnumId, GlobalEnv, StructId};

/// Maximum number of data bits a single cell can hold. A struct used as a
/// mapping key must fit into one cell.
pub const CELL_BIT_LENGTH: usize = 1023;

/// Resolved type of an expression or declaration, as computed by the
/// upstream type checker. This pass only queries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int(u16),
    Uint(u16),
    /// `bytesN` with `N` in 1..=32.
    FixedBytes(u8),
    Enum(EnumId),
    Struct(StructId),
    /// Dynamically sized `bytes`.
    Bytes,
    Str,
    Array(Box<Type>),
    TvmSlice,
    TvmCell,
    Mapping(Box<Type>, Box<Type>),
}

impl Type {
    /// Whether this type belongs to the categories allowed as fields of a
    /// struct-typed mapping key: integer, boolean, fixed bytes, or enum.
    pub fn is_numeric_like(&self) -> bool {
        matches!(
            self,
            Type::Bool | Type::Int(_) | Type::Uint(_) | Type::FixedBytes(_) | Type::Enum(_)
        )
    }

    /// Number of bits this type occupies in a cell, or `None` if it has no
    /// fixed serialized width (non-numeric-like types).
    pub fn bit_width(&self, env: &GlobalEnv) -> Option<usize> {
        match self {
            Type::Bool => Some(1),
            Type::Int(bits) | Type::Uint(bits) => Some(*bits as usize),
            Type::FixedBytes(len) => Some(8 * *len as usize),
            Type::Enum(id) => Some(bits_for_variant_count(env.get_enum(*id).variant_count())),
            _ => None,
        }
    }

    /// `bytes` and `string` are the only array types that index-range
    /// access is defined for.
    pub fn is_byte_array_or_string(&self) -> bool {
        matches!(self, Type::Bytes | Type::Str)
    }
}

/// Smallest bit width able to encode `count` distinct enum variants.
pub fn bits_for_variant_count(count: usize) -> usize {
    let mut bits = 1;
    while (1usize << bits) < count {
        bits += 1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_count_widths() {
        assert_eq!(bits_for_variant_count(1), 1);
        assert_eq!(bits_for_variant_count(2), 1);
        assert_eq!(bits_for_variant_count(3), 2);
        assert_eq!(bits_for_variant_count(4), 2);
        assert_eq!(bits_for_variant_count(5), 3);
        assert_eq!(bits_for_variant_count(256), 8);
        assert_eq!(bits_for_variant_count(257), 9);
    }

    #[test]
    fn numeric_like_categories() {
        assert!(Type::Bool.is_numeric_like());
        assert!(Type::Uint(512).is_numeric_like());
        assert!(Type::FixedBytes(32).is_numeric_like());
        assert!(!Type::TvmSlice.is_numeric_like());
        assert!(!Type::Bytes.is_numeric_like());
        assert!(!Type::Array(Box::new(Type::Uint(8))).is_numeric_like());
    }
}
