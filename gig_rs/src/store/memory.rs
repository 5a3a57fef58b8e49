use std::{
    collections::{BTreeSet, HashMap},
    sync::{Mutex, MutexGuard},
};

use tokio::sync::broadcast;

use super::{
    AvailabilityChange, DirectoryChange, IAvailabilityStore, IDirectoryStore, IEventStore,
    CHANNEL_CAPACITY,
};
use crate::{
    algorithm::Event, Band, BandId, DateKey, Error, EventId, Instrument, Member, MemberId, Result,
};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Store(format!("{name} lock poisoned")))
}

#[derive(Default)]
struct DirectoryTables {
    bands: Vec<Band>,
    members: Vec<Member>,
    instruments: Vec<Instrument>,
}

/// メモリ上のディレクトリ。書き込みのたびに変更を通知する
pub struct MemoryDirectory {
    tables: Mutex<DirectoryTables>,
    sender: broadcast::Sender<DirectoryChange>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tables: Mutex::new(DirectoryTables::default()),
            sender,
        }
    }

    pub fn with_catalog(instruments: Vec<Instrument>) -> Self {
        let directory = Self::new();
        if let Ok(mut tables) = directory.tables.lock() {
            tables.instruments = instruments;
        }
        directory
    }

    fn notify(&self, change: DirectoryChange) {
        // 購読者がいなければ捨てる
        let _ = self.sender.send(change);
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl IDirectoryStore for MemoryDirectory {
    fn fetch_band(&self, id: &BandId) -> Result<Band> {
        let tables = lock(&self.tables, "directory")?;
        let Some(band) = tables.bands.iter().find(|x| &x.id == id) else {
            return Err(Error::BandNotFound(id.clone()));
        };

        Ok(band.clone())
    }

    fn fetch_bands(&self) -> Result<Vec<Band>> {
        let tables = lock(&self.tables, "directory")?;
        Ok(tables.bands.clone())
    }

    fn save_band(&self, band: &Band) -> Result<()> {
        {
            let mut tables = lock(&self.tables, "directory")?;
            match tables.bands.iter_mut().find(|x| x.id == band.id) {
                Some(existing) => *existing = band.clone(),
                None => tables.bands.push(band.clone()),
            }
        }

        log::debug!("saved band {} ({})", band.name, band.id);
        self.notify(DirectoryChange::Band(band.id.clone()));
        Ok(())
    }

    fn fetch_member(&self, id: &MemberId) -> Result<Member> {
        let tables = lock(&self.tables, "directory")?;
        let Some(member) = tables.members.iter().find(|x| &x.id == id) else {
            return Err(Error::MemberNotFound(id.clone()));
        };

        Ok(member.clone())
    }

    fn fetch_members(&self) -> Result<Vec<Member>> {
        let tables = lock(&self.tables, "directory")?;
        Ok(tables.members.clone())
    }

    fn find_member_by_name(&self, name: &str) -> Result<Option<Member>> {
        let key = Member::normalized_name(name);
        let tables = lock(&self.tables, "directory")?;
        Ok(tables
            .members
            .iter()
            .find(|x| Member::normalized_name(&x.name) == key)
            .cloned())
    }

    fn save_member(&self, member: &Member) -> Result<()> {
        {
            let mut tables = lock(&self.tables, "directory")?;
            match tables.members.iter_mut().find(|x| x.id == member.id) {
                Some(existing) => *existing = member.clone(),
                None => tables.members.push(member.clone()),
            }
        }

        log::debug!("saved member {} ({})", member.name, member.id);
        self.notify(DirectoryChange::Member(member.id.clone()));
        Ok(())
    }

    fn fetch_instrument_catalog(&self) -> Result<Vec<Instrument>> {
        let tables = lock(&self.tables, "directory")?;
        Ok(tables.instruments.clone())
    }

    fn save_instrument(&self, instrument: &Instrument) -> Result<()> {
        {
            let mut tables = lock(&self.tables, "directory")?;
            match tables.instruments.iter_mut().find(|x| x.id == instrument.id) {
                Some(existing) => *existing = instrument.clone(),
                None => tables.instruments.push(instrument.clone()),
            }
        }

        self.notify(DirectoryChange::Instrument(instrument.id.clone()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<DirectoryChange> {
        self.sender.subscribe()
    }
}

/// メモリ上の参加可能日
pub struct MemoryAvailability {
    table: Mutex<HashMap<MemberId, BTreeSet<DateKey>>>,
    sender: broadcast::Sender<AvailabilityChange>,
}

impl MemoryAvailability {
    pub fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            table: Mutex::new(HashMap::default()),
            sender,
        }
    }
}

impl Default for MemoryAvailability {
    fn default() -> Self {
        Self::new()
    }
}

impl IAvailabilityStore for MemoryAvailability {
    fn fetch_available_dates(&self, member_id: &MemberId) -> Result<BTreeSet<DateKey>> {
        let table = lock(&self.table, "availability")?;

        // 一度も登録していないメンバーは空集合
        Ok(table.get(member_id).cloned().unwrap_or_default())
    }

    fn mark_available(&self, member_id: &MemberId, date: DateKey) -> Result<()> {
        let inserted = {
            let mut table = lock(&self.table, "availability")?;
            table.entry(member_id.clone()).or_default().insert(date)
        };

        if inserted {
            log::debug!("member {member_id} available on {date}");
            let _ = self.sender.send(AvailabilityChange {
                member_id: member_id.clone(),
                date,
                is_available: true,
            });
        }
        Ok(())
    }

    fn clear_available(&self, member_id: &MemberId, date: DateKey) -> Result<()> {
        let removed = {
            let mut table = lock(&self.table, "availability")?;
            table
                .get_mut(member_id)
                .map_or(false, |dates| dates.remove(&date))
        };

        if removed {
            log::debug!("member {member_id} no longer available on {date}");
            let _ = self.sender.send(AvailabilityChange {
                member_id: member_id.clone(),
                date,
                is_available: false,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AvailabilityChange> {
        self.sender.subscribe()
    }
}

/// メモリ上の予定
#[derive(Default)]
pub struct MemoryEvents {
    table: Mutex<HashMap<BandId, Vec<Event>>>,
}

impl MemoryEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IEventStore for MemoryEvents {
    fn fetch_events(&self, band_id: &BandId) -> Result<Vec<Event>> {
        let table = lock(&self.table, "events")?;
        Ok(table.get(band_id).cloned().unwrap_or_default())
    }

    fn save_event(&self, band_id: &BandId, event: &Event) -> Result<()> {
        let mut table = lock(&self.table, "events")?;
        let events = table.entry(band_id.clone()).or_default();
        match events.iter_mut().find(|x| x.id == event.id) {
            Some(existing) => *existing = event.clone(),
            None => events.push(event.clone()),
        }
        Ok(())
    }

    fn delete_event(&self, band_id: &BandId, event_id: &EventId) -> Result<bool> {
        let mut table = lock(&self.table, "events")?;
        let Some(events) = table.get_mut(band_id) else {
            return Ok(false);
        };

        let count = events.len();
        events.retain(|x| &x.id != event_id);
        Ok(events.len() != count)
    }
}
