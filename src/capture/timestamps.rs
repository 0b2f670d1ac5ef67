//! Sample-offset planning.
//!
//! Pure computation of the time offsets at which frames are extracted:
//! the duration is divided into `sample_count + 2` equal chunks and the
//! interior chunk boundaries are emitted, so samples never land on the very
//! start or end of the video.

use framevault_common::{Error, Result};

/// Compute `sample_count` evenly spaced interior offsets for a video of
/// `duration_secs` seconds.
///
/// Offsets are strictly between `0` and `duration_secs`, strictly
/// increasing, and identical for identical inputs.
///
/// # Errors
///
/// Returns `InvalidInput` when `duration_secs` is zero, negative, or not
/// finite. A `sample_count` of zero yields an empty plan.
pub fn plan_timestamps(sample_count: u32, duration_secs: f64) -> Result<Vec<f64>> {
    if sample_count == 0 {
        return Ok(Vec::new());
    }

    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(Error::invalid_input(format!(
            "cannot sample a video of duration {}s",
            duration_secs
        )));
    }

    let chunks = f64::from(sample_count) + 2.0;
    let interval = duration_secs / chunks;

    Ok((2..=u64::from(sample_count) + 1)
        .map(|chunk_index| interval * chunk_index as f64)
        .collect())
}
