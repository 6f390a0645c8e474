use std::fmt::{Debug, Display};
use num_traits::Float;

/// Numeric type usable as an edge weight and distance.
///
/// Any floating point type works (`f32`, `f64`, `OrderedFloat<f64>`); unreachable
/// vertices carry `W::infinity()`.
pub trait Weight: Float + Debug + Display + Send + Sync + 'static {}

impl<W> Weight for W where W: Float + Debug + Display + Send + Sync + 'static {}

/// Formats a distance for step descriptions, rendering infinity as `∞`
pub fn format_distance<W: Weight>(distance: W) -> String {
    if distance.is_infinite() {
        "∞".to_string()
    } else {
        format!("{}", distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn formats_infinity_as_symbol() {
        assert_eq!(format_distance(f64::INFINITY), "∞");
        assert_eq!(format_distance(4.5_f64), "4.5");
        assert_eq!(format_distance(OrderedFloat(2.0_f64)), "2");
    }
}
