use chrono::{Duration, NaiveDate};

/// Reporting window for statistics queries. Storage filters on these bounds
/// with an overlap test, so a record straddling the boundary is matched and
/// contributes its full duration, never a clipped one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl Period {
    /// Inclusive [first, last] day of the period. `None` for out-of-range
    /// month or quarter numbers.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Period::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some((first, month_end(year, month)?))
            }
            Period::Quarter { year, quarter } => {
                if !(1..=4).contains(&quarter) {
                    return None;
                }
                let start_month = (quarter - 1) * 3 + 1;
                let first = NaiveDate::from_ymd_opt(year, start_month, 1)?;
                Some((first, month_end(year, start_month + 2)?))
            }
            Period::Year { year } => {
                let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
                Some((first, last))
            }
        }
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    Some(NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_cover_first_to_last_day() {
        let p = Period::Month {
            year: 2024,
            month: 3,
        };
        assert_eq!(p.bounds(), Some((date(2024, 3, 1), date(2024, 3, 31))));
    }

    #[test]
    fn february_respects_leap_years() {
        let leap = Period::Month {
            year: 2024,
            month: 2,
        };
        assert_eq!(leap.bounds(), Some((date(2024, 2, 1), date(2024, 2, 29))));

        let common = Period::Month {
            year: 2023,
            month: 2,
        };
        assert_eq!(common.bounds(), Some((date(2023, 2, 1), date(2023, 2, 28))));
    }

    #[test]
    fn quarters_are_three_month_blocks() {
        let q2 = Period::Quarter {
            year: 2024,
            quarter: 2,
        };
        assert_eq!(q2.bounds(), Some((date(2024, 4, 1), date(2024, 6, 30))));

        let q4 = Period::Quarter {
            year: 2024,
            quarter: 4,
        };
        assert_eq!(q4.bounds(), Some((date(2024, 10, 1), date(2024, 12, 31))));
    }

    #[test]
    fn year_runs_january_through_december() {
        let p = Period::Year { year: 2024 };
        assert_eq!(p.bounds(), Some((date(2024, 1, 1), date(2024, 12, 31))));
    }

    #[test]
    fn out_of_range_month_and_quarter_are_rejected() {
        assert_eq!(
            Period::Month {
                year: 2024,
                month: 13
            }
            .bounds(),
            None
        );
        assert_eq!(
            Period::Month {
                year: 2024,
                month: 0
            }
            .bounds(),
            None
        );
        assert_eq!(
            Period::Quarter {
                year: 2024,
                quarter: 5
            }
            .bounds(),
            None
        );
        assert_eq!(
            Period::Quarter {
                year: 2024,
                quarter: 0
            }
            .bounds(),
            None
        );
    }
}
