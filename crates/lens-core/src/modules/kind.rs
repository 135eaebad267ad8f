//! Known Lens modules and their payload layouts.
//!
//! Every layout below mirrors the module contract's `abi.decode` call for
//! the corresponding hook. Reordering a field breaks every payload built
//! for that module.

use super::schema::AbiType::{Address, Bool, Uint16, Uint256, Uint40};
use super::schema::ModuleSchema;

const FREE_COLLECT_INIT: ModuleSchema = ModuleSchema::new(&[("followerOnly", Bool)]);

const FEE_COLLECT_INIT: ModuleSchema = ModuleSchema::new(&[
    ("amount", Uint256),
    ("currency", Address),
    ("recipient", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
]);

const LIMITED_FEE_COLLECT_INIT: ModuleSchema = ModuleSchema::new(&[
    ("collectLimit", Uint256),
    ("amount", Uint256),
    ("currency", Address),
    ("recipient", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
]);

const FEE_FOLLOW_INIT: ModuleSchema = ModuleSchema::new(&[
    ("amount", Uint256),
    ("currency", Address),
    ("recipient", Address),
]);

/// Validate payload shared by every fee-charging module.
const FEE_VALIDATE: ModuleSchema =
    ModuleSchema::new(&[("currency", Address), ("amount", Uint256)]);

const FEE_COLLECT_PUBLICATION: ModuleSchema = ModuleSchema::new(&[
    ("amount", Uint256),
    ("recipient", Address),
    ("currency", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
]);

const LIMITED_FEE_COLLECT_PUBLICATION: ModuleSchema = ModuleSchema::new(&[
    ("collectLimit", Uint256),
    ("currentCollects", Uint256),
    ("amount", Uint256),
    ("recipient", Address),
    ("currency", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
]);

const TIMED_FEE_COLLECT_PUBLICATION: ModuleSchema = ModuleSchema::new(&[
    ("amount", Uint256),
    ("recipient", Address),
    ("currency", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
    ("endTimestamp", Uint40),
]);

const LIMITED_TIMED_FEE_COLLECT_PUBLICATION: ModuleSchema = ModuleSchema::new(&[
    ("collectLimit", Uint256),
    ("currentCollects", Uint256),
    ("amount", Uint256),
    ("recipient", Address),
    ("currency", Address),
    ("referralFee", Uint16),
    ("followerOnly", Bool),
    ("endTimestamp", Uint40),
]);

/// Which hub hook a module plugs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    Collect,
    Follow,
}

/// Which payload of a module is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Passed once when the module is attached (post / setFollowModule).
    Init,
    /// Passed on every collect / follow.
    Validate,
}

/// Every module the registry knows how to encode for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    FreeCollect,
    FeeCollect,
    LimitedFeeCollect,
    TimedFeeCollect,
    LimitedTimedFeeCollect,
    RevertCollect,
    FeeFollow,
    RevertFollow,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 8] = [
        ModuleKind::FreeCollect,
        ModuleKind::FeeCollect,
        ModuleKind::LimitedFeeCollect,
        ModuleKind::TimedFeeCollect,
        ModuleKind::LimitedTimedFeeCollect,
        ModuleKind::RevertCollect,
        ModuleKind::FeeFollow,
        ModuleKind::RevertFollow,
    ];

    /// Contract name of the module.
    pub fn name(&self) -> &'static str {
        match self {
            ModuleKind::FreeCollect => "FreeCollectModule",
            ModuleKind::FeeCollect => "FeeCollectModule",
            ModuleKind::LimitedFeeCollect => "LimitedFeeCollectModule",
            ModuleKind::TimedFeeCollect => "TimedFeeCollectModule",
            ModuleKind::LimitedTimedFeeCollect => "LimitedTimedFeeCollectModule",
            ModuleKind::RevertCollect => "RevertCollectModule",
            ModuleKind::FeeFollow => "FeeFollowModule",
            ModuleKind::RevertFollow => "RevertFollowModule",
        }
    }

    pub fn category(&self) -> ModuleCategory {
        match self {
            ModuleKind::FeeFollow | ModuleKind::RevertFollow => ModuleCategory::Follow,
            _ => ModuleCategory::Collect,
        }
    }

    pub fn init_schema(&self) -> ModuleSchema {
        match self {
            ModuleKind::FreeCollect => FREE_COLLECT_INIT,
            ModuleKind::FeeCollect | ModuleKind::TimedFeeCollect => FEE_COLLECT_INIT,
            ModuleKind::LimitedFeeCollect | ModuleKind::LimitedTimedFeeCollect => {
                LIMITED_FEE_COLLECT_INIT
            }
            ModuleKind::FeeFollow => FEE_FOLLOW_INIT,
            ModuleKind::RevertCollect | ModuleKind::RevertFollow => ModuleSchema::EMPTY,
        }
    }

    pub fn validate_schema(&self) -> ModuleSchema {
        if self.charges_fee() {
            FEE_VALIDATE
        } else {
            ModuleSchema::EMPTY
        }
    }

    pub fn schema(&self, payload: PayloadKind) -> ModuleSchema {
        match payload {
            PayloadKind::Init => self.init_schema(),
            PayloadKind::Validate => self.validate_schema(),
        }
    }

    /// Layout returned by the module's `getPublicationData(profileId, pubId)`.
    ///
    /// Only fee-charging collect modules expose one.
    pub fn publication_data_schema(&self) -> Option<ModuleSchema> {
        match self {
            ModuleKind::FeeCollect => Some(FEE_COLLECT_PUBLICATION),
            ModuleKind::LimitedFeeCollect => Some(LIMITED_FEE_COLLECT_PUBLICATION),
            ModuleKind::TimedFeeCollect => Some(TIMED_FEE_COLLECT_PUBLICATION),
            ModuleKind::LimitedTimedFeeCollect => Some(LIMITED_TIMED_FEE_COLLECT_PUBLICATION),
            _ => None,
        }
    }

    pub fn charges_fee(&self) -> bool {
        matches!(
            self,
            ModuleKind::FeeCollect
                | ModuleKind::LimitedFeeCollect
                | ModuleKind::TimedFeeCollect
                | ModuleKind::LimitedTimedFeeCollect
                | ModuleKind::FeeFollow
        )
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_collect_layouts() {
        assert_eq!(
            ModuleKind::FeeCollect.init_schema().type_tags(),
            vec!["uint256", "address", "address", "uint16", "bool"]
        );
        assert_eq!(
            ModuleKind::FeeCollect.validate_schema().type_tags(),
            vec!["address", "uint256"]
        );
    }

    #[test]
    fn test_limited_variants_prefix_collect_limit() {
        for kind in [ModuleKind::LimitedFeeCollect, ModuleKind::LimitedTimedFeeCollect] {
            assert_eq!(kind.init_schema().position("collectLimit"), Some(0));
            assert_eq!(kind.init_schema().len(), 6);
        }
    }

    #[test]
    fn test_publication_data_exposes_currency_and_amount() {
        for kind in ModuleKind::ALL {
            if let Some(schema) = kind.publication_data_schema() {
                assert!(kind.charges_fee());
                assert!(schema.position("currency").is_some(), "{}", kind);
                assert!(schema.position("amount").is_some(), "{}", kind);
            }
        }
    }

    #[test]
    fn test_free_and_revert_modules_take_no_validate_payload() {
        assert!(ModuleKind::FreeCollect.validate_schema().is_empty());
        assert!(ModuleKind::RevertCollect.init_schema().is_empty());
        assert!(ModuleKind::RevertFollow.validate_schema().is_empty());
        assert!(ModuleKind::FreeCollect.publication_data_schema().is_none());
    }

    #[test]
    fn test_categories() {
        assert_eq!(ModuleKind::FeeFollow.category(), ModuleCategory::Follow);
        assert_eq!(ModuleKind::TimedFeeCollect.category(), ModuleCategory::Collect);
    }
}
