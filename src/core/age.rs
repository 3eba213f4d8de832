use chrono::NaiveDate;

use crate::config::DAYS_PER_MONTH;

/// Whole months between `birth_date` and `on`, as `floor(days / 30.44)`.
///
/// A birth date after `on` yields 0.
pub fn age_in_months(birth_date: NaiveDate, on: NaiveDate) -> u32 {
    age_in_months_with(birth_date, on, DAYS_PER_MONTH)
}

pub fn age_in_months_with(birth_date: NaiveDate, on: NaiveDate, days_per_month: f64) -> u32 {
    let days = (on - birth_date).num_days();
    if days <= 0 || days_per_month <= 0.0 {
        return 0;
    }
    (days as f64 / days_per_month).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(date(2024, 1, 1), date(2024, 1, 1), 0 ; "newborn")]
    #[test_case(date(2024, 1, 1), date(2024, 1, 31), 0 ; "thirty days is not a month")]
    #[test_case(date(2024, 1, 1), date(2024, 2, 1), 1 ; "thirty one days")]
    #[test_case(date(2024, 1, 1), date(2025, 1, 1), 12 ; "one year")]
    #[test_case(date(2024, 6, 1), date(2024, 1, 1), 0 ; "birth after evaluation date")]
    fn months_are_floored(birth: NaiveDate, on: NaiveDate, expected: u32) {
        assert_eq!(age_in_months(birth, on), expected);
    }
}
