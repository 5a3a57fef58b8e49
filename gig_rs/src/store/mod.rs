mod identity;
mod memory;

use std::collections::BTreeSet;

use tokio::sync::broadcast;

pub use identity::{IIdentityProvider, Identity, MemoryIdentity};
pub use memory::{MemoryAvailability, MemoryDirectory, MemoryEvents};

use crate::{
    algorithm::Event, Band, BandId, DateKey, EventId, Instrument, InstrumentId, Member, MemberId,
    Result,
};

/// 通知チャンネルの容量
pub(crate) const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryChange {
    Band(BandId),
    Member(MemberId),
    Instrument(InstrumentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityChange {
    pub member_id: MemberId,
    pub date: DateKey,
    pub is_available: bool,
}

/// バンド、メンバー、楽器の保存先
pub trait IDirectoryStore: Send + Sync {
    fn fetch_band(&self, id: &BandId) -> Result<Band>;

    fn fetch_bands(&self) -> Result<Vec<Band>>;

    fn save_band(&self, band: &Band) -> Result<()>;

    fn fetch_member(&self, id: &MemberId) -> Result<Member>;

    fn fetch_members(&self) -> Result<Vec<Member>>;

    /// 正規化した名前が一致するメンバーを探す
    fn find_member_by_name(&self, name: &str) -> Result<Option<Member>>;

    fn save_member(&self, member: &Member) -> Result<()>;

    fn fetch_instrument_catalog(&self) -> Result<Vec<Instrument>>;

    fn save_instrument(&self, instrument: &Instrument) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<DirectoryChange>;
}

/// メンバーごとの参加可能日
///
/// 参加できる日だけを記録し、参加できない日は記録を消して表す
pub trait IAvailabilityStore: Send + Sync {
    fn fetch_available_dates(&self, member_id: &MemberId) -> Result<BTreeSet<DateKey>>;

    fn mark_available(&self, member_id: &MemberId, date: DateKey) -> Result<()>;

    fn clear_available(&self, member_id: &MemberId, date: DateKey) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<AvailabilityChange>;
}

pub trait IEventStore: Send + Sync {
    fn fetch_events(&self, band_id: &BandId) -> Result<Vec<Event>>;

    fn save_event(&self, band_id: &BandId, event: &Event) -> Result<()>;

    /// 削除できたら true
    fn delete_event(&self, band_id: &BandId, event_id: &EventId) -> Result<bool>;
}
