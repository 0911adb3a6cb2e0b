//! Differencing and its inverse.

/// Apply `order` rounds of first differencing.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut out = data.to_vec();
    for _ in 0..order {
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Undo `order` rounds of differencing for values that continue `history`.
///
/// `steps` are on the `order`-times differenced scale; the result is on the
/// scale of `history` and continues right after its last value.
pub fn integrate(history: &[f64], steps: &[f64], order: usize) -> Vec<f64> {
    if order == 0 || history.is_empty() {
        return steps.to_vec();
    }

    // Last observed value at each differencing level 0..order-1.
    let mut anchors = Vec::with_capacity(order);
    let mut level = history.to_vec();
    for _ in 0..order {
        match level.last() {
            Some(&v) => anchors.push(v),
            None => anchors.push(0.0),
        }
        level = difference(&level, 1);
    }

    let mut out = steps.to_vec();
    for &anchor in anchors.iter().rev() {
        let mut acc = anchor;
        for v in out.iter_mut() {
            acc += *v;
            *v = acc;
        }
    }
    out
}
