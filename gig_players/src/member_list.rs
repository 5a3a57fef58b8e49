use std::collections::BTreeSet;

use gig_rs::{InstrumentId, Member};

use crate::{RosterSheet, SheetError};

pub struct MemberList {
    members: Vec<Member>,

    instrument_filter: BTreeSet<InstrumentId>,
}

impl MemberList {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            instrument_filter: Default::default(),
        }
    }

    pub fn from_csv(data: &str) -> Result<Self, SheetError> {
        let sheet = RosterSheet::from_csv("", data)?;
        Ok(Self::new(sheet.members))
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn filter(&self) -> &BTreeSet<InstrumentId> {
        &self.instrument_filter
    }

    pub fn add_filter(&mut self, filter: InstrumentId) {
        self.instrument_filter.insert(filter);
    }

    pub fn remove_filter(&mut self, filter: &InstrumentId) {
        self.instrument_filter.remove(filter);
    }

    pub fn clear_instrument_filter(&mut self) {
        self.instrument_filter.clear();
    }

    /// フィルターのどれかを担当できるメンバー。フィルターが空なら全員
    pub fn filtered(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|member| {
            self.instrument_filter.is_empty()
                || !member.instrument_ids.is_disjoint(&self.instrument_filter)
        })
    }
}
