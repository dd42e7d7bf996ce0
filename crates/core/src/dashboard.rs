//! Month helpers for the dashboard's yearly series.

/// Three-letter English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short name of a 1-based month, or `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// Spread sparse `(month, value)` rows over all twelve months.
///
/// Months without a row get `T::default()`. Rows with an out-of-range month
/// are dropped.
pub fn fill_months<T: Clone + Default>(rows: impl IntoIterator<Item = (u32, T)>) -> [T; 12] {
    let mut months: [T; 12] = std::array::from_fn(|_| T::default());
    for (month, value) in rows {
        if (1..=12).contains(&month) {
            months[(month - 1) as usize] = value;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), Some("Jan"));
        assert_eq!(month_name(12), Some("Dec"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn fill_months_defaults_missing() {
        let filled = fill_months([(2u32, 5i64), (11, 7)]);
        assert_eq!(filled[0], 0);
        assert_eq!(filled[1], 5);
        assert_eq!(filled[10], 7);
        assert_eq!(filled.iter().sum::<i64>(), 12);
    }

    #[test]
    fn fill_months_ignores_bad_months() {
        let filled = fill_months([(0u32, 1i64), (13, 1)]);
        assert!(filled.iter().all(|v| *v == 0));
    }
}
