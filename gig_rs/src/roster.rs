use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{BandId, InstrumentId, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Substitute,
}

/// バンド内でそのメンバーが担当する楽器
///
/// メンバー自身の楽器一覧とは独立したスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member_id: MemberId,
    pub role: Role,
    pub instrument_ids: BTreeSet<InstrumentId>,
}

impl RosterEntry {
    pub fn new<T>(member_id: MemberId, role: Role, instrument_ids: T) -> Self
    where
        T: IntoIterator<Item = InstrumentId>,
    {
        Self {
            member_id,
            role,
            instrument_ids: instrument_ids.into_iter().collect(),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.role == Role::Primary
    }
}

/// メンバー ID ごとにひとつだけエントリを持つ名簿
///
/// 正規メンバーと代役を同じリストで管理するので、両方に同時に載ることはない
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 正規メンバーと代役の 2 つのリストから名簿を作る
    ///
    /// 両方に載っている場合は先に現れた方 (正規メンバー) を採用する
    pub fn from_lists<T, U>(members: T, substitutes: U) -> Self
    where
        T: IntoIterator<Item = (MemberId, Vec<InstrumentId>)>,
        U: IntoIterator<Item = (MemberId, Vec<InstrumentId>)>,
    {
        let mut roster = Self::new();
        let lists = members
            .into_iter()
            .map(|x| (Role::Primary, x))
            .chain(substitutes.into_iter().map(|x| (Role::Substitute, x)));
        for (role, (member_id, instrument_ids)) in lists {
            if let Some(existing) = roster.role_of(&member_id) {
                log::warn!(
                    "member {} listed twice on roster, keeping {:?} and dropping {:?}",
                    member_id,
                    existing,
                    role
                );
                continue;
            }

            roster
                .entries
                .push(RosterEntry::new(member_id, role, instrument_ids));
        }
        roster
    }

    /// 既存のエントリがあればその場で置き換え、なければ末尾に追加
    pub fn assign<T>(&mut self, member_id: MemberId, role: Role, instrument_ids: T)
    where
        T: IntoIterator<Item = InstrumentId>,
    {
        let entry = RosterEntry::new(member_id, role, instrument_ids);
        match self
            .entries
            .iter_mut()
            .find(|x| x.member_id == entry.member_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, member_id: &MemberId) -> Option<RosterEntry> {
        let index = self
            .entries
            .iter()
            .position(|x| &x.member_id == member_id)?;
        Some(self.entries.remove(index))
    }

    pub fn entry(&self, member_id: &MemberId) -> Option<&RosterEntry> {
        self.entries.iter().find(|x| &x.member_id == member_id)
    }

    pub fn role_of(&self, member_id: &MemberId) -> Option<Role> {
        self.entry(member_id).map(|x| x.role)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn primary_members(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(|x| x.is_primary())
    }

    pub fn substitutes(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(|x| !x.is_primary())
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> {
        self.entries.iter().map(|x| &x.member_id)
    }

    pub fn contains(&self, member_id: &MemberId) -> bool {
        self.entry(member_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub id: BandId,
    pub name: String,
    pub roster: Roster,
}

impl Band {
    pub fn new(name: &str) -> Self {
        Self {
            id: BandId::generate(),
            name: name.to_string(),
            roster: Roster::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub instrument_ids: BTreeSet<InstrumentId>,
}

impl Member {
    pub fn new<T>(name: &str, instrument_ids: T) -> Self
    where
        T: IntoIterator<Item = InstrumentId>,
    {
        Self {
            id: MemberId::generate(),
            name: name.to_string(),
            instrument_ids: instrument_ids.into_iter().collect(),
        }
    }

    /// 同名判定用のキー。小文字化して空白をすべて取り除く
    pub fn normalized_name(name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Member, Role, Roster};
    use crate::{InstrumentId, MemberId};

    fn ids(values: &[&str]) -> Vec<InstrumentId> {
        values.iter().map(|x| InstrumentId::from(*x)).collect()
    }

    #[test]
    fn assign_keeps_single_role() {
        let mut roster = Roster::new();
        let ana = MemberId::from("ana");
        roster.assign(ana.clone(), Role::Primary, ids(&["guitar"]));
        roster.assign(ana.clone(), Role::Substitute, ids(&["bass"]));

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.role_of(&ana), Some(Role::Substitute));
        assert_eq!(roster.primary_members().count(), 0);
        assert_eq!(roster.substitutes().count(), 1);
    }

    // 役割を変えても名簿上の並びは変わらない
    #[test]
    fn assign_replaces_in_place() {
        let mut roster = Roster::new();
        roster.assign(MemberId::from("ana"), Role::Primary, ids(&["guitar"]));
        roster.assign(MemberId::from("beto"), Role::Primary, ids(&["bass"]));
        roster.assign(MemberId::from("ana"), Role::Substitute, ids(&["guitar"]));

        let order: Vec<&str> = roster.member_ids().map(|x| x.as_str()).collect();
        assert_eq!(order, vec!["ana", "beto"]);
    }

    #[test]
    fn from_lists_drops_duplicate() {
        let roster = Roster::from_lists(
            vec![(MemberId::from("ana"), ids(&["guitar"]))],
            vec![
                (MemberId::from("ana"), ids(&["bass"])),
                (MemberId::from("cora"), ids(&["bass"])),
            ],
        );

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.role_of(&MemberId::from("ana")), Some(Role::Primary));
        assert_eq!(roster.role_of(&MemberId::from("cora")), Some(Role::Substitute));
    }

    #[test]
    fn remove() {
        let mut roster = Roster::new();
        roster.assign(MemberId::from("ana"), Role::Primary, ids(&["guitar"]));
        assert!(roster.remove(&MemberId::from("ana")).is_some());
        assert!(roster.remove(&MemberId::from("ana")).is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn normalized_name() {
        assert_eq!(Member::normalized_name("Ana  María"), "anamaría");
        assert_eq!(Member::normalized_name(" BETO\t"), "beto");
    }
}
