//! Solidity interfaces used to build calldata.
//!
//! Struct layouts follow the hub's `DataTypes` library. Only the functions
//! the client calls are declared.

use alloy_sol_types::sol;

sol! {
    /// Signature attached to every `*WithSig` entry point.
    #[derive(Debug, PartialEq, Eq)]
    struct EIP712Signature {
        uint8 v;
        bytes32 r;
        bytes32 s;
        uint256 deadline;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PostData {
        uint256 profileId;
        string contentURI;
        address collectModule;
        bytes collectModuleInitData;
        address referenceModule;
        bytes referenceModuleInitData;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PostWithSigData {
        uint256 profileId;
        string contentURI;
        address collectModule;
        bytes collectModuleInitData;
        address referenceModule;
        bytes referenceModuleInitData;
        EIP712Signature sig;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CollectWithSigData {
        address collector;
        uint256 profileId;
        uint256 pubId;
        bytes data;
        EIP712Signature sig;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CreateProfileData {
        address to;
        string handle;
        string imageURI;
        address followModule;
        bytes followModuleInitData;
        string followNFTURI;
    }

    /// Profile record as stored by the hub.
    #[derive(Debug, PartialEq, Eq)]
    struct ProfileStruct {
        uint256 pubCount;
        address followModule;
        address followNFT;
        string handle;
        string imageURI;
        string followNFTURI;
    }

    interface ILensHub {
        function sigNonces(address signer) external view returns (uint256);

        function post(PostData vars) external returns (uint256);
        function postWithSig(PostWithSigData vars) external returns (uint256);
        function collect(uint256 profileId, uint256 pubId, bytes data) external returns (uint256);
        function collectWithSig(CollectWithSigData vars) external returns (uint256);
        function setFollowModule(uint256 profileId, address followModule, bytes followModuleInitData) external;
        function setDefaultProfile(uint256 profileId) external;
        function burn(uint256 tokenId) external;

        function getCollectModule(uint256 profileId, uint256 pubId) external view returns (address);
        function getFollowModule(uint256 profileId) external view returns (address);
        function getReferenceModule(uint256 profileId, uint256 pubId) external view returns (address);
        function getCollectNFT(uint256 profileId, uint256 pubId) external view returns (address);
        function getProfileIdByHandle(string handle) external view returns (uint256);
        function getProfile(uint256 profileId) external view returns (ProfileStruct);

        function isProfileCreatorWhitelisted(address profileCreator) external view returns (bool);
        function isCollectModuleWhitelisted(address collectModule) external view returns (bool);
        function isFollowModuleWhitelisted(address followModule) external view returns (bool);
        function isReferenceModuleWhitelisted(address referenceModule) external view returns (bool);
    }

    interface IProfileCreationProxy {
        function proxyCreateProfile(CreateProfileData vars) external;
    }

    /// Fee-charging collect modules. The return layout differs per module and
    /// is decoded with the module's publication-data schema.
    interface IFeeCollectModule {
        function getPublicationData(uint256 profileId, uint256 pubId) external view;
    }

    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
    }

    /// Hub revert reasons that mean the signature was rejected.
    error SignatureInvalid();
    error SignatureExpired();
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolCall, SolError};

    #[test]
    fn test_selectors_match_known_signatures() {
        // allowance(address,address) / approve(address,uint256) are fixed ERC-20 selectors
        assert_eq!(IERC20::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(IERC721::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_with_sig_tuples() {
        assert_eq!(
            ILensHub::postWithSigCall::SIGNATURE,
            "postWithSig((uint256,string,address,bytes,address,bytes,(uint8,bytes32,bytes32,uint256)))"
        );
        assert_eq!(
            ILensHub::collectWithSigCall::SIGNATURE,
            "collectWithSig((address,uint256,uint256,bytes,(uint8,bytes32,bytes32,uint256)))"
        );
        assert_eq!(SignatureInvalid::SIGNATURE, "SignatureInvalid()");
        assert_eq!(ILensHub::getProfileCall::SIGNATURE, "getProfile(uint256)");
    }
}
