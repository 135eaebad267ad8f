//! ABI schemas for module payloads.
//!
//! A [`ModuleSchema`] is the ordered list of ABI types a module's on-chain
//! decoder expects. Payloads are packed with standard parameter encoding
//! (the same layout as `abi.decode(data, (...))` on the contract side).

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::Bytes;

use crate::{Error, Result};

/// ABI primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    Uint256,
    Uint40,
    Uint16,
    Address,
    Bool,
    Bytes,
    String,
}

impl AbiType {
    /// Canonical Solidity type name.
    pub fn tag(&self) -> &'static str {
        match self {
            AbiType::Uint256 => "uint256",
            AbiType::Uint40 => "uint40",
            AbiType::Uint16 => "uint16",
            AbiType::Address => "address",
            AbiType::Bool => "bool",
            AbiType::Bytes => "bytes",
            AbiType::String => "string",
        }
    }

    pub fn to_dyn(&self) -> DynSolType {
        match self {
            AbiType::Uint256 => DynSolType::Uint(256),
            AbiType::Uint40 => DynSolType::Uint(40),
            AbiType::Uint16 => DynSolType::Uint(16),
            AbiType::Address => DynSolType::Address,
            AbiType::Bool => DynSolType::Bool,
            AbiType::Bytes => DynSolType::Bytes,
            AbiType::String => DynSolType::String,
        }
    }

    /// Whether `value` can be encoded as this type without truncation.
    fn accepts(&self, value: &DynSolValue) -> bool {
        match (self, value) {
            (AbiType::Uint256 | AbiType::Uint40 | AbiType::Uint16, DynSolValue::Uint(v, bits)) => {
                let width = match self {
                    AbiType::Uint256 => 256,
                    AbiType::Uint40 => 40,
                    _ => 16,
                };
                *bits == width && v.bit_len() <= width
            }
            (AbiType::Address, DynSolValue::Address(_)) => true,
            (AbiType::Bool, DynSolValue::Bool(_)) => true,
            (AbiType::Bytes, DynSolValue::Bytes(_)) => true,
            (AbiType::String, DynSolValue::String(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for AbiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Named, ordered parameter layout of a module payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSchema {
    fields: &'static [(&'static str, AbiType)],
}

impl ModuleSchema {
    /// Schema of a module that takes no payload.
    pub const EMPTY: ModuleSchema = ModuleSchema { fields: &[] };

    pub const fn new(fields: &'static [(&'static str, AbiType)]) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &'static [(&'static str, AbiType)] {
        self.fields
    }

    pub fn types(&self) -> impl Iterator<Item = AbiType> + '_ {
        self.fields.iter().map(|(_, ty)| *ty)
    }

    /// Solidity type tags in order, e.g. `["address", "uint256"]`.
    pub fn type_tags(&self) -> Vec<&'static str> {
        self.types().map(|ty| ty.tag()).collect()
    }

    /// Position of a named field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| *field == name)
    }

    /// Pack `params` according to this schema.
    pub fn encode(&self, params: &[DynSolValue]) -> Result<Bytes> {
        if params.len() != self.fields.len() {
            return Err(Error::SchemaMismatch {
                message: format!(
                    "expected {} parameters ({}), got {}",
                    self.fields.len(),
                    self.type_tags().join(","),
                    params.len()
                ),
            });
        }

        for ((name, ty), value) in self.fields.iter().zip(params) {
            if !ty.accepts(value) {
                return Err(Error::SchemaMismatch {
                    message: format!("parameter `{}` is not a valid {}: {:?}", name, ty, value),
                });
            }
        }

        if params.is_empty() {
            return Ok(Bytes::new());
        }

        let encoded = DynSolValue::Tuple(params.to_vec()).abi_encode_params();
        Ok(Bytes::from(encoded))
    }

    /// Unpack a payload produced by [`ModuleSchema::encode`] (or by the contract).
    pub fn decode(&self, data: &[u8]) -> Result<Vec<DynSolValue>> {
        if self.fields.is_empty() {
            if !data.is_empty() {
                return Err(Error::SchemaMismatch {
                    message: format!("expected empty payload, got {} bytes", data.len()),
                });
            }
            return Ok(Vec::new());
        }

        let tuple = DynSolType::Tuple(self.types().map(|ty| ty.to_dyn()).collect());
        match tuple.abi_decode_params(data)? {
            DynSolValue::Tuple(values) => Ok(values),
            other => Err(Error::SchemaMismatch {
                message: format!("decoded non-tuple value {:?}", other),
            }),
        }
    }
}

impl std::fmt::Display for ModuleSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.type_tags().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    const PAIR: ModuleSchema =
        ModuleSchema::new(&[("currency", AbiType::Address), ("amount", AbiType::Uint256)]);

    const WITH_STRING: ModuleSchema =
        ModuleSchema::new(&[("uri", AbiType::String), ("flag", AbiType::Bool)]);

    #[test]
    fn test_static_encoding_layout() {
        let currency = Address::repeat_byte(0x11);
        let encoded = PAIR
            .encode(&[
                DynSolValue::Address(currency),
                DynSolValue::Uint(U256::from(1000u64), 256),
            ])
            .unwrap();

        assert_eq!(encoded.len(), 64);
        // address left-padded to 32 bytes
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..32], currency.as_slice());
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(1000u64));
    }

    #[test]
    fn test_dynamic_encoding_uses_head_tail() {
        let encoded = WITH_STRING
            .encode(&[
                DynSolValue::String("ipfs://abc".to_string()),
                DynSolValue::Bool(true),
            ])
            .unwrap();

        // head: offset, bool; tail: length, padded data
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(64u64));
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(1u64));
        assert_eq!(U256::from_be_slice(&encoded[64..96]), U256::from(10u64));
        assert_eq!(encoded.len(), 128);

        let decoded = WITH_STRING.decode(&encoded).unwrap();
        assert_eq!(decoded[0], DynSolValue::String("ipfs://abc".to_string()));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = PAIR
            .encode(&[DynSolValue::Address(Address::ZERO)])
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let err = PAIR
            .encode(&[
                DynSolValue::Uint(U256::from(1u64), 256),
                DynSolValue::Address(Address::ZERO),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_narrow_uint_overflow_rejected() {
        const FEE: ModuleSchema = ModuleSchema::new(&[("referralFee", AbiType::Uint16)]);

        assert!(FEE
            .encode(&[DynSolValue::Uint(U256::from(70_000u64), 16)])
            .is_err());
        assert!(FEE
            .encode(&[DynSolValue::Uint(U256::from(250u64), 16)])
            .is_ok());
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(ModuleSchema::EMPTY.encode(&[]).unwrap(), Bytes::new());
        assert!(ModuleSchema::EMPTY.decode(&[]).unwrap().is_empty());
        assert!(ModuleSchema::EMPTY.decode(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_display_and_position() {
        assert_eq!(PAIR.to_string(), "(address,uint256)");
        assert_eq!(PAIR.position("amount"), Some(1));
        assert_eq!(PAIR.position("recipient"), None);
    }
}
