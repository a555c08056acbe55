//! System-wide constants for the root-chain exit game.

/// Spacing between operator block numbers. Deposit blocks fill the gaps.
pub const BLOCK_INTERVAL: u64 = 1000;

/// Depth of every child-chain transaction tree.
pub const MERKLE_DEPTH: usize = 16;

/// Size of a single tree node / digest in bytes.
pub const HASH_LEN: usize = 32;

/// Length in bytes of a membership proof (one sibling per level).
pub const PROOF_LEN: usize = MERKLE_DEPTH * HASH_LEN;

/// Minimum challenge period: one week, in seconds.
pub const MIN_EXIT_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest challenge period a configuration may ask for (one year).
pub const MAX_EXIT_PERIOD_SECS: u64 = 365 * 24 * 60 * 60;

/// Default exit bond, expressed as `units * 10^-EXIT_BOND_SCALE`.
pub const DEFAULT_EXIT_BOND_UNITS: i64 = 1_234_567_890;

/// Decimal scale of [`DEFAULT_EXIT_BOND_UNITS`].
pub const DEFAULT_EXIT_BOND_SCALE: u32 = 18;

/// Tag of the base ledger's native asset. Its exit queue always exists.
pub const NATIVE_ASSET: &str = "ETH";

/// Multiplier for the block number inside a packed output position.
pub const BLOCK_OFFSET: u64 = 1_000_000_000;

/// Multiplier for the transaction index inside a packed output position.
pub const TX_OFFSET: u64 = 10_000;

/// Number of input slots in a child-chain transaction.
pub const TX_INPUTS: usize = 2;

/// Number of output slots in a child-chain transaction.
pub const TX_OUTPUTS: usize = 4;

/// Length of a raw ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
