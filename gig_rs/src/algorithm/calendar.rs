use chrono::{Datelike, NaiveDate};

use super::{BandAvailability, DateCoverage};
use crate::{DateKey, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: DateKey,

    // 誰も参加できない日は None
    pub coverage: Option<DateCoverage>,
}

impl CalendarDay {
    pub fn is_available(&self) -> bool {
        self.coverage.as_ref().map_or(false, |x| x.is_available)
    }
}

/// ひと月分の参加可否
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    days: Vec<CalendarDay>,
}

impl MonthCalendar {
    pub fn new(year: i32, month: u32, availability: &BandAvailability) -> Result<Self> {
        let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Err(Error::InvalidDateKey(format!("{year}-{month:02}")));
        };

        let days = first_day
            .iter_days()
            .take_while(|date| date.month() == month)
            .map(|date| {
                let date = DateKey::from(date);
                CalendarDay {
                    date,
                    coverage: availability.get(&date).cloned(),
                }
            })
            .collect();

        Ok(Self {
            year,
            month,
            first_day,
            days,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// 日曜始まりのグリッドで 1 日の前に置く空白の数
    pub fn leading_blank_days(&self) -> u32 {
        self.first_day.weekday().num_days_from_sunday()
    }

    pub fn prev_month(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }

    pub fn next_month(&self) -> (i32, u32) {
        if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        }
    }
}

/// アバター用の頭文字。1 文字目を大文字、2 文字目を小文字にする
pub fn display_initials(name: Option<&str>) -> String {
    let name = name.filter(|x| !x.is_empty()).unwrap_or("Unknown");
    let mut chars = name.chars();
    let mut initials = String::new();
    if let Some(first) = chars.next() {
        initials.extend(first.to_uppercase());
    }
    if let Some(second) = chars.next() {
        initials.extend(second.to_lowercase());
    }
    initials
}
