use chrono::{DateTime, Utc};
use crease_store::StoreTx;
use crease_types::{CreditSource, PlayerStats, StatsCredit};
use tracing::debug;

use crate::error::StatsResult;

/// Applies and reverses journaled statistics credits.
///
/// Every credit is keyed by its [`CreditSource`]. Applying a source that is
/// already journaled does nothing, so a repeated trigger cannot count twice;
/// reverting subtracts exactly the journaled lines and drops the entry.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Apply `credit` once. Returns `false` when the source was already
    /// applied.
    pub fn apply(
        tx: &mut dyn StoreTx,
        credit: StatsCredit,
        at: DateTime<Utc>,
    ) -> StatsResult<bool> {
        if tx.get_credit(&credit.source)?.is_some() {
            debug!(source = ?credit.source, "credit already applied");
            return Ok(false);
        }
        for (player, line) in &credit.lines {
            let mut stats = tx
                .get_stats(player)?
                .unwrap_or_else(|| PlayerStats::zeroed(player.clone()));
            stats.apply(line);
            stats.last_updated = Some(at);
            tx.put_stats(stats)?;
        }
        debug!(source = ?credit.source, players = credit.lines.len(), "credit applied");
        tx.put_credit(credit)?;
        Ok(true)
    }

    /// Reverse a previously applied source. Returns `false` when nothing
    /// was journaled under it.
    pub fn revert(
        tx: &mut dyn StoreTx,
        source: &CreditSource,
        at: DateTime<Utc>,
    ) -> StatsResult<bool> {
        let Some(credit) = tx.remove_credit(source)? else {
            return Ok(false);
        };
        for (player, line) in &credit.lines {
            // A player removed from the registry took its figures with it.
            if let Some(mut stats) = tx.get_stats(player)? {
                stats.revert(line);
                stats.last_updated = Some(at);
                tx.put_stats(stats)?;
            }
        }
        debug!(source = ?source, players = credit.lines.len(), "credit reverted");
        Ok(true)
    }
}
