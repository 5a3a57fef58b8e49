use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const FORMAT: &str = "%Y-%m-%d";

/// `yyyy-MM-dd` 形式の日付キー
///
/// 取り込み時に検証するので、集計側では比較と集合演算しかしない
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct DateKey {
    date: NaiveDate,
}

impl DateKey {
    pub fn parse(value: &str) -> Result<Self> {
        // chrono は桁数の足りない "2024-5-1" も受け付けるので長さも見る
        if value.len() != 10 {
            return Err(Error::InvalidDateKey(value.to_string()));
        }

        let Ok(date) = NaiveDate::parse_from_str(value, FORMAT) else {
            return Err(Error::InvalidDateKey(value.to_string()));
        };

        // 数字の前の空白も読み飛ばされるので、書き戻して一致するものだけ通す
        if date.format(FORMAT).to_string() != value {
            return Err(Error::InvalidDateKey(value.to_string()));
        }

        Ok(Self { date })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(FORMAT))
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        DateKey::parse(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::DateKey;
    use crate::Error;

    #[test]
    fn parse_iso() {
        let key = DateKey::parse("2024-05-01").unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 5);
        assert_eq!(key.day(), 1);
        assert_eq!(key.to_string(), "2024-05-01");
    }

    #[test]
    fn reject_malformed() {
        for value in [
            "",
            "2024-5-1",
            "2024-13-01",
            "2024-02-30",
            "01/05/2024",
            "hoge",
            " 2024-5-01",
            "2024-05- 1",
            "2024- 5-01",
        ] {
            let result = DateKey::parse(value);
            assert!(
                matches!(result, Err(Error::InvalidDateKey(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn chronological_order() {
        let earlier = DateKey::parse("2023-12-31").unwrap();
        let later = DateKey::parse("2024-01-01").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn deserialize_rejects_malformed() {
        let result = serde_json::from_str::<DateKey>("\"2024-99-01\"");
        assert!(result.is_err());

        let key = serde_json::from_str::<DateKey>("\"2024-05-01\"").unwrap();
        assert_eq!(key, DateKey::from_ymd(2024, 5, 1).unwrap());
    }
}
