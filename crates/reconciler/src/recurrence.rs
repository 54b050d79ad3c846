use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// 周期工单开始时间的固定时刻
pub const START_HOUR: u32 = 8;

/// 计算过程中发生的日期回退
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFallback {
    /// 目标日不在 1..=31 内，改用 1 号
    InvalidDay { requested: u32 },
    /// 目标月份没有该日，改用当月最后一天
    MonthEnd { requested: u32, used: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub at: NaiveDateTime,
    pub fallback: Option<DayFallback>,
}

/// 下一次周期开始时间的计算工具
pub struct RecurrenceScheduler;

impl RecurrenceScheduler {
    /// 参考时间所在月份的下一个月中，取目标日 08:00:00
    pub fn next_occurrence(reference: NaiveDateTime, target_day_of_month: u32) -> Occurrence {
        let (day, mut fallback) = if (1..=31).contains(&target_day_of_month) {
            (target_day_of_month, None)
        } else {
            (
                1,
                Some(DayFallback::InvalidDay {
                    requested: target_day_of_month,
                }),
            )
        };

        let first_of_next = first_day_of_next_month(reference.date());
        let date = match first_of_next.with_day(day) {
            Some(date) => date,
            None => {
                let last = last_day_of_month(first_of_next);
                fallback = Some(DayFallback::MonthEnd {
                    requested: day,
                    used: last.day(),
                });
                last
            }
        };

        Occurrence {
            at: date.and_time(start_time()),
            fallback,
        }
    }
}

fn start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn first_day_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first_day_of_next_month(first).pred_opt().unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn test_day_31_falls_back_to_end_of_february() {
        let occurrence = RecurrenceScheduler::next_occurrence(dt(2025, 1, 15, 14, 20), 31);
        assert_eq!(occurrence.at, dt(2025, 2, 28, 8, 0));
        assert_eq!(
            occurrence.fallback,
            Some(DayFallback::MonthEnd {
                requested: 31,
                used: 28
            })
        );
    }

    #[test]
    fn test_day_31_in_31_day_month() {
        let occurrence = RecurrenceScheduler::next_occurrence(dt(2025, 2, 10, 23, 59), 31);
        assert_eq!(occurrence.at, dt(2025, 3, 31, 8, 0));
        assert_eq!(occurrence.fallback, None);
    }

    #[test]
    fn test_leap_february() {
        let occurrence = RecurrenceScheduler::next_occurrence(dt(2024, 1, 31, 7, 0), 30);
        assert_eq!(occurrence.at, dt(2024, 2, 29, 8, 0));
        assert!(matches!(
            occurrence.fallback,
            Some(DayFallback::MonthEnd { used: 29, .. })
        ));
    }

    #[test]
    fn test_30_day_month() {
        let occurrence = RecurrenceScheduler::next_occurrence(dt(2025, 3, 1, 0, 0), 31);
        assert_eq!(occurrence.at, dt(2025, 4, 30, 8, 0));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let occurrence = RecurrenceScheduler::next_occurrence(dt(2025, 12, 20, 10, 0), 10);
        assert_eq!(occurrence.at, dt(2026, 1, 10, 8, 0));
        assert_eq!(occurrence.fallback, None);
    }

    #[test]
    fn test_invalid_day_uses_first() {
        for day in [0, 32, 99] {
            let occurrence = RecurrenceScheduler::next_occurrence(dt(2025, 6, 5, 12, 0), day);
            assert_eq!(occurrence.at, dt(2025, 7, 1, 8, 0));
            assert_eq!(
                occurrence.fallback,
                Some(DayFallback::InvalidDay { requested: day })
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let reference = dt(2025, 8, 17, 16, 45);
        assert_eq!(
            RecurrenceScheduler::next_occurrence(reference, 15),
            RecurrenceScheduler::next_occurrence(reference, 15)
        );
    }
}
