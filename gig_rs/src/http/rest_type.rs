use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    Band, BandId, DateKey, Instrument, InstrumentId, Member, MemberId, Result, Roster,
};

/// バンドのドキュメントに埋め込まれた名簿の 1 行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRefType {
    pub id: String,

    #[serde(default)]
    pub instruments: Vec<String>,
}

/// `bands/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct BandType {
    pub name: String,

    #[serde(default)]
    pub members: Vec<RosterRefType>,

    // 古いドキュメントには代役のフィールドがない
    #[serde(default)]
    pub substitutes: Vec<RosterRefType>,
}

impl BandType {
    pub fn into_band(self, id: BandId) -> Band {
        let convert = |x: RosterRefType| {
            let instrument_ids: Vec<InstrumentId> =
                x.instruments.into_iter().map(InstrumentId::from).collect();
            (MemberId::from(x.id), instrument_ids)
        };

        Band {
            id,
            name: self.name,
            roster: Roster::from_lists(
                self.members.into_iter().map(convert),
                self.substitutes.into_iter().map(convert),
            ),
        }
    }
}

/// `members/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberType {
    pub name: String,

    #[serde(default)]
    pub instruments: Vec<String>,
}

impl MemberType {
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            name: self.name,
            instrument_ids: self.instruments.into_iter().map(InstrumentId::from).collect(),
        }
    }
}

/// `members/{id}/availability` の 1 件
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityType {
    pub date: String,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl AvailabilityType {
    /// 参加可能な日付の集合に変換する
    ///
    /// `available: false` は書き込まれない想定だが、あれば参加不可として扱う。
    /// 不正な日付がひとつでもあればエラー
    pub fn into_dates(documents: Vec<AvailabilityType>) -> Result<BTreeSet<DateKey>> {
        let mut dates = BTreeSet::default();
        for document in documents {
            let date = DateKey::parse(&document.date)?;
            if !document.available {
                log::debug!("ignoring negative availability entry {date}");
                continue;
            }
            dates.insert(date);
        }
        Ok(dates)
    }
}

/// `instruments` の 1 件
#[derive(Debug, Serialize, Deserialize)]
pub struct InstrumentType {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub category: Option<String>,
}

impl From<InstrumentType> for Instrument {
    fn from(value: InstrumentType) -> Self {
        Self {
            id: InstrumentId::from(value.id),
            name: value.name,
            category: value.category.unwrap_or_default(),
        }
    }
}
