/// Returns the quantile from a sorted slice
///
/// Uses linear interpolation between the two closest ranks, so `q = 0` and
/// `q = 1` return the minimum and maximum.
///
/// # Arguments
///
/// * `ss` - The sorted slice
/// * `q` - The quantile to calculate, in `[0, 1]`
///
/// # Returns
///
/// * `Option<f64>` - The quantile, or `None` if the slice is empty
#[inline]
pub fn quantile_from_sorted_slice(ss: &[f64], q: f64) -> Option<f64> {
    let last = ss.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lower_index = (pos as usize).min(last);
    let upper_index = if pos > lower_index as f64 {
        (lower_index + 1).min(last)
    } else {
        lower_index
    };

    if lower_index == upper_index {
        Some(ss[lower_index])
    } else {
        let lower_value = ss[lower_index];
        let upper_value = ss[upper_index];
        let weight = pos - lower_index as f64;

        Some(lower_value + weight * (upper_value - lower_value))
    }
}
