use raffle_core::{DrawError, EligibleUser, ExclusionSet, WinnerList};
use std::collections::HashSet;
use tracing::{debug, info};

/// Deduplicates the eligible names, keeping first-admission order, and drops
/// every excluded name.
pub fn eligible_pool(eligible: &[EligibleUser], exclusions: &ExclusionSet) -> Vec<EligibleUser> {
    let mut seen = HashSet::new();
    let pool: Vec<EligibleUser> = eligible
        .iter()
        .filter(|user| seen.insert(user.name()))
        .filter(|user| !exclusions.contains(user.name()))
        .cloned()
        .collect();

    debug!(
        "Pool: {} eligible entries, {} after dedup and exclusion",
        eligible.len(),
        pool.len()
    );
    pool
}

/// Draws `winner_count` distinct winners uniformly without replacement.
pub fn draw_winners(
    eligible: &[EligibleUser],
    exclusions: &ExclusionSet,
    winner_count: usize,
    rng: &mut fastrand::Rng,
) -> Result<WinnerList, DrawError> {
    let mut pool = eligible_pool(eligible, exclusions);

    if pool.len() < winner_count {
        return Err(DrawError::InsufficientPool {
            available: pool.len(),
            requested: winner_count,
        });
    }

    // Partial Fisher-Yates: the first `winner_count` slots end up holding a
    // uniform sample.
    for i in 0..winner_count {
        let j = rng.usize(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(winner_count);

    info!("Drew {} winner(s)", pool.len());
    Ok(WinnerList(pool))
}
