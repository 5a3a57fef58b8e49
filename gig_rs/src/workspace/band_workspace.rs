use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;

use super::{fetch_availability_table, CalendarWatcher};
use crate::{
    algorithm::{
        AvailabilityAggregator, AvailabilityTable, BandAvailability, BookableDate, Event,
        EventDraft, EventPlanner, MonthCalendar,
    },
    resolve_names,
    store::{IAvailabilityStore, IDirectoryStore, IEventStore},
    Band, BandId, DateKey, Error, EventId, InstrumentId, Member, MemberId, Result, Role,
};

/// 名簿表示用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMemberView {
    pub member_id: MemberId,
    pub name: String,
    pub role: Role,
    pub instrument_names: Vec<String>,
}

/// バンド単位の操作をまとめたもの
pub struct BandWorkspace<D, A, E>
where
    D: IDirectoryStore + 'static,
    A: IAvailabilityStore + 'static,
    E: IEventStore + 'static,
{
    directory: Arc<D>,
    availability: Arc<A>,
    events: Arc<E>,
}

impl<D, A, E> BandWorkspace<D, A, E>
where
    D: IDirectoryStore + 'static,
    A: IAvailabilityStore + 'static,
    E: IEventStore + 'static,
{
    pub fn new(directory: Arc<D>, availability: Arc<A>, events: Arc<E>) -> Self {
        Self {
            directory,
            availability,
            events,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn bands(&self) -> Result<Vec<Band>> {
        self.directory.fetch_bands()
    }

    pub fn band(&self, band_id: &BandId) -> Result<Band> {
        self.directory.fetch_band(band_id)
    }

    pub fn create_band(&self, name: &str) -> Result<Band> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidBand("name is required".to_string()));
        }

        let band = Band::new(name);
        self.directory.save_band(&band)?;
        log::info!("created band {} ({})", band.name, band.id);
        Ok(band)
    }

    /// メンバーを名簿に追加する
    ///
    /// 同名 (正規化後) のメンバーがすでにいればそのメンバーを使い回す
    pub fn add_member(
        &self,
        band_id: &BandId,
        name: &str,
        instrument_ids: Vec<InstrumentId>,
        role: Role,
    ) -> Result<Member> {
        let name = Self::validate_member(name, &instrument_ids)?;
        let mut band = self.directory.fetch_band(band_id)?;

        let member = match self.directory.find_member_by_name(name)? {
            Some(member) => {
                log::debug!("reusing member {} ({})", member.name, member.id);
                member
            }
            None => {
                let member = Member::new(name, instrument_ids.iter().cloned());
                self.directory.save_member(&member)?;
                member
            }
        };

        band.roster.assign(member.id.clone(), role, instrument_ids);
        self.directory.save_band(&band)?;
        log::info!("added {} to {} as {:?}", member.name, band.name, role);
        Ok(member)
    }

    /// 名前、担当楽器、役割を更新する
    pub fn edit_member(
        &self,
        band_id: &BandId,
        member_id: &MemberId,
        name: &str,
        instrument_ids: Vec<InstrumentId>,
        role: Role,
    ) -> Result<Member> {
        let name = Self::validate_member(name, &instrument_ids)?;
        let mut band = self.directory.fetch_band(band_id)?;
        if !band.roster.contains(member_id) {
            return Err(Error::NotOnRoster(member_id.clone()));
        }

        // 別のメンバーと名前が衝突しないか
        if let Some(other) = self.directory.find_member_by_name(name)? {
            if &other.id != member_id {
                return Err(Error::InvalidMember(format!(
                    "name `{name}` is already used by another member"
                )));
            }
        }

        let mut member = self.directory.fetch_member(member_id)?;
        member.name = name.to_string();
        member.instrument_ids = instrument_ids.iter().cloned().collect();
        self.directory.save_member(&member)?;

        band.roster.assign(member_id.clone(), role, instrument_ids);
        self.directory.save_band(&band)?;
        log::info!("updated {} in {}", member.name, band.name);
        Ok(member)
    }

    /// 名簿から外す。メンバー自体は残す
    pub fn remove_member(&self, band_id: &BandId, member_id: &MemberId) -> Result<()> {
        let mut band = self.directory.fetch_band(band_id)?;
        if band.roster.remove(member_id).is_none() {
            return Err(Error::NotOnRoster(member_id.clone()));
        }

        self.directory.save_band(&band)?;
        log::info!("removed {} from {}", member_id, band.name);
        Ok(())
    }

    pub fn roster_view(&self, band_id: &BandId) -> Result<Vec<RosterMemberView>> {
        let band = self.directory.fetch_band(band_id)?;
        let catalog = self.directory.fetch_instrument_catalog()?;

        let mut views = Vec::default();
        for entry in band.roster.entries() {
            let member = match self.directory.fetch_member(&entry.member_id) {
                Ok(member) => member,
                Err(Error::MemberNotFound(id)) => {
                    log::warn!("roster of {} references missing member {}", band.name, id);
                    continue;
                }
                Err(error) => return Err(error),
            };

            views.push(RosterMemberView {
                member_id: member.id,
                name: member.name,
                role: entry.role,
                instrument_names: resolve_names(&entry.instrument_ids, &catalog),
            });
        }
        Ok(views)
    }

    /// メンバー ID → 名前。見つからないメンバーは含めない
    pub fn member_names(&self, band: &Band) -> Result<HashMap<MemberId, String>> {
        let mut names = HashMap::default();
        for member_id in band.roster.member_ids() {
            match self.directory.fetch_member(member_id) {
                Ok(member) => {
                    names.insert(member.id, member.name);
                }
                Err(Error::MemberNotFound(_)) => continue,
                Err(error) => return Err(error),
            }
        }
        Ok(names)
    }

    /// 参加可能日を反転する。参加可能になったら true
    pub fn toggle_availability(&self, member_id: &MemberId, date: DateKey) -> Result<bool> {
        let dates = self.availability.fetch_available_dates(member_id)?;
        if dates.contains(&date) {
            self.availability.clear_available(member_id, date)?;
            Ok(false)
        } else {
            self.availability.mark_available(member_id, date)?;
            Ok(true)
        }
    }

    pub fn availability_table(&self, band: &Band) -> Result<AvailabilityTable> {
        fetch_availability_table(self.availability.as_ref(), &band.roster)
    }

    pub fn band_availability(&self, band_id: &BandId) -> Result<BandAvailability> {
        let band = self.directory.fetch_band(band_id)?;
        let table = self.availability_table(&band)?;
        AvailabilityAggregator::aggregate_roster(&band.roster, &table)
    }

    pub fn month_calendar(&self, band_id: &BandId, year: i32, month: u32) -> Result<MonthCalendar> {
        let availability = self.band_availability(band_id)?;
        MonthCalendar::new(year, month, &availability)
    }

    /// 日付順
    pub fn events(&self, band_id: &BandId) -> Result<Vec<Event>> {
        let events = self
            .events
            .fetch_events(band_id)?
            .into_iter()
            .sorted_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)))
            .collect();
        Ok(events)
    }

    pub fn bookable_dates(&self, band_id: &BandId, today: DateKey) -> Result<Vec<BookableDate>> {
        let availability = self.band_availability(band_id)?;
        let events = self.events.fetch_events(band_id)?;
        Ok(EventPlanner::bookable_dates(&availability, &events, today))
    }

    pub fn create_event(
        &self,
        band_id: &BandId,
        draft: EventDraft,
        today: DateKey,
    ) -> Result<Event> {
        let bookable_dates = self.bookable_dates(band_id, today)?;
        let event = EventPlanner::plan(draft, &bookable_dates)?;
        self.events.save_event(band_id, &event)?;
        log::info!("created event {} on {}", event.title, event.date);
        Ok(event)
    }

    /// 削除した予定の日付は参加可能日から再計算されて候補に戻る
    pub fn delete_event(&self, band_id: &BandId, event_id: &EventId) -> Result<()> {
        if !self.events.delete_event(band_id, event_id)? {
            return Err(Error::EventNotFound(event_id.clone()));
        }

        log::info!("deleted event {event_id}");
        Ok(())
    }

    /// 参加可能日とバンドの変更を監視して再集計し続ける
    ///
    /// tokio のランタイム上で呼ぶこと
    pub fn watch_calendar(&self, band_id: &BandId) -> CalendarWatcher {
        CalendarWatcher::spawn(
            band_id.clone(),
            Arc::clone(&self.directory),
            Arc::clone(&self.availability),
        )
    }

    fn validate_member<'a>(name: &'a str, instrument_ids: &[InstrumentId]) -> Result<&'a str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidMember("name is required".to_string()));
        }

        if instrument_ids.is_empty() {
            return Err(Error::InvalidMember(
                "at least one instrument is required".to_string(),
            ));
        }

        Ok(name)
    }
}
