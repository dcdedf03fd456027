//! Contract bindings for the game, NFT and token contracts

use ethers::prelude::abigen;

abigen!(
    TotemGame,
    r#"[
        struct GameParamsData { uint256 signupReward; uint256 mintPrice; }
        struct TimeWindowsData { uint256 firstStart; uint256 secondStart; uint256 thirdStart; }
        struct ActionConfigData { uint256 cost; uint256 cooldown; uint256 maxDaily; uint256 minHappiness; uint256 happinessChange; uint256 experienceGain; bool useTimeWindows; bool increasesHappiness; bool enabled; }
        function getGameConfiguration() external view returns (GameParamsData memory params, TimeWindowsData memory windows, ActionConfigData[] memory configs)
        function getActionTracking(uint256 tokenId, uint8 action) external view returns (uint256 lastUsed, uint256 dailyUses, uint256 dayStartTime)
        function hasAccount(address user) external view returns (bool)
    ]"#,
);

abigen!(
    TotemNft,
    r#"[
        function tokensOfOwner(address owner) external view returns (uint256[])
        function attributes(uint256 tokenId) external view returns (uint8 species, uint8 color, uint8 rarity, uint256 happiness, uint256 experience, uint256 stage, uint256 lastFed, bool isStaked, string displayName)
    ]"#,
);

abigen!(
    TotemToken,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
    ]"#,
);
