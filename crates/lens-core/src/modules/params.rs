//! Typed module parameters.
//!
//! These convert to and from the positional values a [`ModuleSchema`]
//! encodes, so callers never hand-assemble value lists.
//!
//! [`ModuleSchema`]: super::ModuleSchema

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};

use super::kind::ModuleKind;
use super::schema::ModuleSchema;
use crate::{Error, Result};

/// Fee terms shared by the fee-charging collect modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeTerms {
    pub amount: U256,
    pub currency: Address,
    pub recipient: Address,
    /// Referral fee in basis points.
    pub referral_fee: u16,
    pub follower_only: bool,
}

impl FeeTerms {
    fn values(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Uint(self.amount, 256),
            DynSolValue::Address(self.currency),
            DynSolValue::Address(self.recipient),
            DynSolValue::Uint(U256::from(self.referral_fee), 16),
            DynSolValue::Bool(self.follower_only),
        ]
    }
}

/// Initialization parameters for a collect module attached to a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectModuleInit {
    Free { follower_only: bool },
    Fee(FeeTerms),
    LimitedFee { collect_limit: U256, terms: FeeTerms },
    TimedFee(FeeTerms),
    LimitedTimedFee { collect_limit: U256, terms: FeeTerms },
    Revert,
}

impl CollectModuleInit {
    pub fn kind(&self) -> ModuleKind {
        match self {
            CollectModuleInit::Free { .. } => ModuleKind::FreeCollect,
            CollectModuleInit::Fee(_) => ModuleKind::FeeCollect,
            CollectModuleInit::LimitedFee { .. } => ModuleKind::LimitedFeeCollect,
            CollectModuleInit::TimedFee(_) => ModuleKind::TimedFeeCollect,
            CollectModuleInit::LimitedTimedFee { .. } => ModuleKind::LimitedTimedFeeCollect,
            CollectModuleInit::Revert => ModuleKind::RevertCollect,
        }
    }

    /// Values in the order of `self.kind().init_schema()`.
    pub fn to_params(&self) -> Vec<DynSolValue> {
        match self {
            CollectModuleInit::Free { follower_only } => vec![DynSolValue::Bool(*follower_only)],
            CollectModuleInit::Fee(terms) | CollectModuleInit::TimedFee(terms) => terms.values(),
            CollectModuleInit::LimitedFee {
                collect_limit,
                terms,
            }
            | CollectModuleInit::LimitedTimedFee {
                collect_limit,
                terms,
            } => {
                let mut values = vec![DynSolValue::Uint(*collect_limit, 256)];
                values.extend(terms.values());
                values
            }
            CollectModuleInit::Revert => Vec::new(),
        }
    }
}

/// Initialization parameters for a follow module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowModuleInit {
    Fee {
        amount: U256,
        currency: Address,
        recipient: Address,
    },
    Revert,
}

impl FollowModuleInit {
    pub fn kind(&self) -> ModuleKind {
        match self {
            FollowModuleInit::Fee { .. } => ModuleKind::FeeFollow,
            FollowModuleInit::Revert => ModuleKind::RevertFollow,
        }
    }

    pub fn to_params(&self) -> Vec<DynSolValue> {
        match self {
            FollowModuleInit::Fee {
                amount,
                currency,
                recipient,
            } => vec![
                DynSolValue::Uint(*amount, 256),
                DynSolValue::Address(*currency),
                DynSolValue::Address(*recipient),
            ],
            FollowModuleInit::Revert => Vec::new(),
        }
    }
}

/// Currency and amount a fee-charging module expects the caller to pay.
///
/// This is both the validate payload `(address currency, uint256 amount)`
/// and the input to the allowance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub currency: Address,
    pub amount: U256,
}

impl FeeQuote {
    pub fn to_params(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.currency),
            DynSolValue::Uint(self.amount, 256),
        ]
    }

    /// Pull `currency` and `amount` out of values decoded with `schema`.
    pub fn from_named(schema: &ModuleSchema, values: &[DynSolValue]) -> Result<Self> {
        let currency = named(schema, values, "currency")?
            .as_address()
            .ok_or_else(|| mismatch("currency is not an address"))?;
        let (amount, _) = named(schema, values, "amount")?
            .as_uint()
            .ok_or_else(|| mismatch("amount is not an unsigned integer"))?;

        Ok(Self { currency, amount })
    }
}

fn named<'a>(
    schema: &ModuleSchema,
    values: &'a [DynSolValue],
    field: &str,
) -> Result<&'a DynSolValue> {
    schema
        .position(field)
        .and_then(|index| values.get(index))
        .ok_or_else(|| mismatch(&format!("schema {} has no `{}` field", schema, field)))
}

fn mismatch(message: &str) -> Error {
    Error::SchemaMismatch {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> FeeTerms {
        FeeTerms {
            amount: U256::from(1000u64),
            currency: Address::repeat_byte(0xcc),
            recipient: Address::repeat_byte(0xee),
            referral_fee: 250,
            follower_only: false,
        }
    }

    #[test]
    fn test_collect_init_matches_its_schema() {
        let inits = [
            CollectModuleInit::Free {
                follower_only: true,
            },
            CollectModuleInit::Fee(terms()),
            CollectModuleInit::LimitedFee {
                collect_limit: U256::from(10u64),
                terms: terms(),
            },
            CollectModuleInit::TimedFee(terms()),
            CollectModuleInit::LimitedTimedFee {
                collect_limit: U256::from(10u64),
                terms: terms(),
            },
            CollectModuleInit::Revert,
        ];

        for init in inits {
            let schema = init.kind().init_schema();
            let params = init.to_params();
            let encoded = schema.encode(&params).unwrap();
            assert_eq!(schema.decode(&encoded).unwrap(), params, "{}", init.kind());
        }
    }

    #[test]
    fn test_follow_init_matches_its_schema() {
        let init = FollowModuleInit::Fee {
            amount: U256::from(5u64),
            currency: Address::repeat_byte(1),
            recipient: Address::repeat_byte(2),
        };
        let schema = init.kind().init_schema();
        assert_eq!(schema.encode(&init.to_params()).unwrap().len(), 96);
        assert!(FollowModuleInit::Revert.to_params().is_empty());
    }

    #[test]
    fn test_fee_quote_from_publication_data() {
        let kind = ModuleKind::LimitedTimedFeeCollect;
        let schema = kind.publication_data_schema().unwrap();
        let values = vec![
            DynSolValue::Uint(U256::from(100u64), 256),
            DynSolValue::Uint(U256::from(3u64), 256),
            DynSolValue::Uint(U256::from(1000u64), 256),
            DynSolValue::Address(Address::repeat_byte(0xee)),
            DynSolValue::Address(Address::repeat_byte(0xcc)),
            DynSolValue::Uint(U256::from(0u64), 16),
            DynSolValue::Bool(true),
            DynSolValue::Uint(U256::from(1_700_000_000u64), 40),
        ];

        let quote = FeeQuote::from_named(&schema, &values).unwrap();
        assert_eq!(quote.currency, Address::repeat_byte(0xcc));
        assert_eq!(quote.amount, U256::from(1000u64));
    }

    #[test]
    fn test_fee_quote_missing_field() {
        let schema = ModuleKind::FreeCollect.init_schema();
        let err = FeeQuote::from_named(&schema, &[DynSolValue::Bool(true)]).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }
}
