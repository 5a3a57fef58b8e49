use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{DateKey, Error, InstrumentId, MemberId, Result, Roster, RosterEntry};

/// メンバー ID → 参加可能日
pub type AvailabilityTable = HashMap<MemberId, BTreeSet<DateKey>>;

/// ある日付の集計結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCoverage {
    pub date: DateKey,

    // バンドとして演奏できるか
    pub is_available: bool,

    // 参加できる正規メンバー (名簿順)
    pub available_members: Vec<MemberId>,

    // 参加できる代役 (名簿順)
    pub available_substitutes: Vec<MemberId>,
}

impl DateCoverage {
    /// 正規メンバー、代役の順で参加者を列挙
    pub fn attendees(&self) -> Vec<MemberId> {
        self.available_members
            .iter()
            .chain(self.available_substitutes.iter())
            .cloned()
            .collect()
    }
}

/// 誰かひとりでも参加できる日付ごとの集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandAvailability {
    coverage_table: BTreeMap<DateKey, DateCoverage>,
}

impl BandAvailability {
    pub fn get(&self, date: &DateKey) -> Option<&DateCoverage> {
        self.coverage_table.get(date)
    }

    pub fn iter(&self) -> btree_map::Values<'_, DateKey, DateCoverage> {
        self.coverage_table.values()
    }

    /// バンドとして演奏できる日付 (昇順)
    pub fn available_dates(&self) -> impl Iterator<Item = &DateKey> {
        self.coverage_table
            .values()
            .filter(|x| x.is_available)
            .map(|x| &x.date)
    }

    pub fn len(&self) -> usize {
        self.coverage_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coverage_table.is_empty()
    }
}

pub struct AvailabilityAggregator;

impl AvailabilityAggregator {
    /// 名簿と参加可能日からバンドの参加可否を日付ごとに判定します
    ///
    /// 名簿に載っている全員分の参加可能日が `availability` に必要
    /// (空集合でもよい)。ひとりでも欠けていたら何も返さずにエラー
    pub fn aggregate(
        primary_members: &[RosterEntry],
        substitutes: &[RosterEntry],
        availability: &AvailabilityTable,
    ) -> Result<BandAvailability> {
        let primary_members = Self::attach_dates(primary_members, availability)?;

        // 正規メンバーにもいる人は代役から外す
        let primary_ids: HashSet<&MemberId> = primary_members
            .iter()
            .map(|(entry, _dates)| &entry.member_id)
            .collect();
        let substitutes: Vec<_> = Self::attach_dates(substitutes, availability)?
            .into_iter()
            .filter(|(entry, _dates)| !primary_ids.contains(&entry.member_id))
            .collect();

        // 誰かが参加できる日付の和集合
        let candidate_dates: BTreeSet<&DateKey> = primary_members
            .iter()
            .chain(substitutes.iter())
            .flat_map(|(_entry, dates)| dates.iter())
            .collect();

        let mut coverage_table = BTreeMap::default();
        for date in candidate_dates {
            let (present, missing): (Vec<_>, Vec<_>) = primary_members
                .iter()
                .partition(|(_entry, dates)| dates.contains(date));

            // 欠席者が担当している楽器
            let uncovered_instruments: BTreeSet<&InstrumentId> = missing
                .iter()
                .flat_map(|(entry, _dates)| entry.instrument_ids.iter())
                .collect();

            let available_substitutes: Vec<&RosterEntry> = substitutes
                .iter()
                .filter(|(_entry, dates)| dates.contains(date))
                .map(|(entry, _dates)| *entry)
                .collect();

            // 代役が演奏できる楽器
            let substitute_instruments: BTreeSet<&InstrumentId> = available_substitutes
                .iter()
                .flat_map(|entry| entry.instrument_ids.iter())
                .collect();

            let all_covered = uncovered_instruments.is_subset(&substitute_instruments);
            let is_available = present.len() == primary_members.len() || all_covered;

            coverage_table.insert(
                *date,
                DateCoverage {
                    date: *date,
                    is_available,
                    available_members: present
                        .iter()
                        .map(|(entry, _dates)| entry.member_id.clone())
                        .collect(),
                    available_substitutes: available_substitutes
                        .iter()
                        .map(|entry| entry.member_id.clone())
                        .collect(),
                },
            );
        }

        Ok(BandAvailability { coverage_table })
    }

    pub fn aggregate_roster(
        roster: &Roster,
        availability: &AvailabilityTable,
    ) -> Result<BandAvailability> {
        let primary_members: Vec<RosterEntry> = roster.primary_members().cloned().collect();
        let substitutes: Vec<RosterEntry> = roster.substitutes().cloned().collect();
        Self::aggregate(&primary_members, &substitutes, availability)
    }

    fn attach_dates<'a>(
        entries: &'a [RosterEntry],
        availability: &'a AvailabilityTable,
    ) -> Result<Vec<(&'a RosterEntry, &'a BTreeSet<DateKey>)>> {
        // 同じメンバーが重複していたら最初のエントリだけ使う
        entries
            .iter()
            .unique_by(|entry| &entry.member_id)
            .map(|entry| {
                let Some(dates) = availability.get(&entry.member_id) else {
                    return Err(Error::MissingAvailabilityData {
                        member_id: entry.member_id.clone(),
                    });
                };
                Ok((entry, dates))
            })
            .collect()
    }
}
