//! The one XP mutation path shared by every settlement.

use studyquest_core::rank::{rank_of, RankTier};
use studyquest_core::types::DbId;

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerTx;

/// Outcome of applying an XP delta inside a transaction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct XpGrant {
    pub xp_total: i64,
    pub rank: RankTier,
    pub rank_changed: bool,
}

/// Lock the user's row as the first write of a settlement.
pub(crate) async fn lock_account(tx: &mut dyn LedgerTx, user_id: DbId) -> LedgerResult<()> {
    if tx.lock_user(user_id).await? {
        Ok(())
    } else {
        Err(LedgerError::UserNotFound(user_id))
    }
}

/// Add `delta` XP as a relative update, then recompute the rank from the new
/// total and write it back if it changed.
pub(crate) async fn grant_xp(
    tx: &mut dyn LedgerTx,
    user_id: DbId,
    delta: i64,
) -> LedgerResult<XpGrant> {
    let xp_total = tx
        .add_xp(user_id, delta)
        .await?
        .ok_or(LedgerError::UserNotFound(user_id))?;

    let rank = rank_of(xp_total);
    let rank_changed = tx.set_rank(user_id, rank.as_str()).await?;
    if rank_changed {
        tracing::info!(user_id, xp_total, rank = %rank, "Rank changed");
    }

    Ok(XpGrant {
        xp_total,
        rank,
        rank_changed,
    })
}
