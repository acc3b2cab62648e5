//! Rank tiers derived from a user's XP total.
//!
//! [`rank_of`] is the single source of truth for rank. Every transaction that
//! changes `users.xp` calls it and writes the result back to the cached
//! `users.rank` column before committing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Thresholds (inclusive lower bounds)
// ---------------------------------------------------------------------------

/// XP at which a user reaches [`RankTier::Shichibukai`].
pub const SHICHIBUKAI_XP: i64 = 10_000;
/// XP at which a user reaches [`RankTier::YonkoCommander`].
pub const YONKO_COMMANDER_XP: i64 = 25_000;
/// XP at which a user reaches [`RankTier::Yonko`].
pub const YONKO_XP: i64 = 50_000;
/// XP at which a user reaches [`RankTier::PirateKing`].
pub const PIRATE_KING_XP: i64 = 100_000;

/// A named band of XP magnitude. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    #[serde(rename = "SUPERNOVA")]
    Supernova,
    #[serde(rename = "SHICHIBUKAI")]
    Shichibukai,
    #[serde(rename = "YONKO COMMANDER")]
    YonkoCommander,
    #[serde(rename = "YONKO")]
    Yonko,
    #[serde(rename = "PIRATE KING")]
    PirateKing,
}

impl RankTier {
    /// The tier every new account starts in.
    pub const NOVICE: RankTier = RankTier::Supernova;

    /// Every tier, highest first.
    const DESCENDING: [RankTier; 5] = [
        Self::PirateKing,
        Self::Yonko,
        Self::YonkoCommander,
        Self::Shichibukai,
        Self::Supernova,
    ];

    /// Label stored in `users.rank` and shown to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supernova => "SUPERNOVA",
            Self::Shichibukai => "SHICHIBUKAI",
            Self::YonkoCommander => "YONKO COMMANDER",
            Self::Yonko => "YONKO",
            Self::PirateKing => "PIRATE KING",
        }
    }

    /// Minimum XP required for this tier.
    pub fn min_xp(self) -> i64 {
        match self {
            Self::Supernova => 0,
            Self::Shichibukai => SHICHIBUKAI_XP,
            Self::YonkoCommander => YONKO_COMMANDER_XP,
            Self::Yonko => YONKO_XP,
            Self::PirateKing => PIRATE_KING_XP,
        }
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an XP total to its rank tier. Highest qualifying tier wins.
///
/// Negative input cannot occur for a stored user but is treated as zero so
/// the function stays total.
pub fn rank_of(xp: i64) -> RankTier {
    RankTier::DESCENDING
        .into_iter()
        .find(|tier| xp >= tier.min_xp())
        .unwrap_or(RankTier::NOVICE)
}

/// Returns the tier to persist when a cached label no longer matches `xp`.
///
/// `None` means the cached label is already correct.
pub fn resync(cached: &str, xp: i64) -> Option<RankTier> {
    let fresh = rank_of(xp);
    (cached != fresh.as_str()).then_some(fresh)
}
