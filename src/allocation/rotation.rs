/// Selects the stations that are open in `block` (1-based)
///
/// The pool is rotated left by `((block - 1) * active_per_block) % pool.len()`
/// and the first `active_per_block` stations are taken, so consecutive blocks
/// walk through the whole pool. If the pool is not larger than
/// `active_per_block`, every station is open in every block.
pub fn active_stations(pool: &[String], block: u32, active_per_block: usize) -> Vec<String> {
    if pool.len() <= active_per_block {
        return pool.to_vec();
    }

    let offset = (block.saturating_sub(1) as usize * active_per_block) % pool.len();
    pool.iter()
        .cycle()
        .skip(offset)
        .take(active_per_block)
        .cloned()
        .collect()
}
