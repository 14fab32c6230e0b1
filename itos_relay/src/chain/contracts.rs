//! ABI bindings for the external contracts.
//!
//! The escrow's administrative surface (`releaseFunds`, refunds, buyback) is
//! declared so those calls decode when present; the relay never drives them.

use ethers::prelude::abigen;

abigen!(
    TestUsdc,
    r#"[
        function approve(address spender, uint256 amount) external returns (bool)
        function balanceOf(address account) external view returns (uint256)
        function transfer(address to, uint256 amount) external returns (bool)
        function faucet(uint256 amount) external
    ]"#
);

abigen!(
    ProjectEscrow,
    r#"[
        function invest(uint256 usdcAmount) external
        function getInvestorInfo(address investor) external view returns (uint256, uint256, uint256, uint256, string)
        function getEscrowInfo() external view returns (uint256, uint256, uint256, uint256, uint256, uint256, bool, bool, bool, bool)
        function calculateParticipations(uint256 usdcHuman) external view returns (uint256)
        function releaseFunds(address recipient) external
        function enableRefunds() external
        function claimRefund() external
        function enableBuyback(uint256 buybackPriceHuman) external
        function claimBuyback(uint256 tokenParts) external
    ]"#
);

abigen!(
    PropertyToken,
    r#"[
        function balanceOf(address account) external view returns (uint256)
        function transfer(address to, uint256 amount) external returns (bool)
        function getProjectInfo() external view returns (string, string, string, uint256, uint256, uint8, uint256, uint256)
        function distributeParticipations(address to, uint256 amount) external
        function burnFromManager(address account, uint256 amount) external
    ]"#
);
