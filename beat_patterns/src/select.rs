use rand::Rng;

/// Draws an index with probability proportional to its weight.
///
/// Non-positive weights are never drawn. Returns `None` when nothing carries
/// weight, leaving the fallback to the caller.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().copied().filter(|w| *w > 0.0).sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let select = rng.gen_range(0.0..total);
    let mut sum = 0.0;
    let mut last_drawable = None;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        sum += w;
        last_drawable = Some(i);
        if sum > select {
            return Some(i);
        }
    }
    // rounding at the top of the range
    last_drawable
}
