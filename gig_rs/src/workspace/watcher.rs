use std::sync::Arc;

use tokio::{
    sync::{broadcast::error::RecvError, watch},
    task::JoinHandle,
};

use super::fetch_availability_table;
use crate::{
    algorithm::{AvailabilityAggregator, BandAvailability},
    store::{DirectoryChange, IAvailabilityStore, IDirectoryStore},
    BandId, Result, Roster,
};

/// バンドの集計結果を最新に保つタスク
///
/// 名簿メンバーの参加可能日かバンド自体が変わるたびに全体を集計し直す。
/// 集計自体は同期処理のまま
pub struct CalendarWatcher {
    receiver: watch::Receiver<Option<BandAvailability>>,
    handle: JoinHandle<()>,
}

impl CalendarWatcher {
    pub fn spawn<D, A>(band_id: BandId, directory: Arc<D>, availability: Arc<A>) -> Self
    where
        D: IDirectoryStore + 'static,
        A: IAvailabilityStore + 'static,
    {
        let (sender, receiver) = watch::channel(None);

        // 初回の集計より前に購読しておけば取りこぼさない
        let mut directory_changes = directory.subscribe();
        let mut availability_changes = availability.subscribe();

        let handle = tokio::spawn(async move {
            let mut roster = Roster::default();
            Self::refresh(&band_id, &*directory, &*availability, &mut roster, &sender);

            loop {
                let should_refresh = tokio::select! {
                    change = directory_changes.recv() => match change {
                        Ok(DirectoryChange::Band(id)) => id == band_id,
                        Ok(_) => false,
                        Err(RecvError::Lagged(count)) => {
                            log::warn!("missed {count} directory notifications");
                            true
                        }
                        Err(RecvError::Closed) => break,
                    },
                    change = availability_changes.recv() => match change {
                        Ok(change) => roster.contains(&change.member_id),
                        Err(RecvError::Lagged(count)) => {
                            log::warn!("missed {count} availability notifications");
                            true
                        }
                        Err(RecvError::Closed) => break,
                    },
                };

                if should_refresh {
                    Self::refresh(&band_id, &*directory, &*availability, &mut roster, &sender);
                }
            }

            log::debug!("calendar watcher for {band_id} finished");
        });

        Self { receiver, handle }
    }

    /// 最新の集計結果。初回の集計が終わるまでは None
    pub fn latest(&self) -> Option<BandAvailability> {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BandAvailability>> {
        self.receiver.clone()
    }

    pub fn stop(self) {
        // drop で止まる
    }

    fn refresh<D, A>(
        band_id: &BandId,
        directory: &D,
        availability: &A,
        roster: &mut Roster,
        sender: &watch::Sender<Option<BandAvailability>>,
    ) where
        D: IDirectoryStore + ?Sized,
        A: IAvailabilityStore + ?Sized,
    {
        match Self::aggregate(band_id, directory, availability) {
            Ok((latest_roster, band_availability)) => {
                log::debug!(
                    "recomputed availability for {band_id}: {} dates",
                    band_availability.len()
                );
                *roster = latest_roster;
                sender.send_replace(Some(band_availability));
            }
            // 失敗したら前回の結果を残す
            Err(error) => log::warn!("failed to recompute availability for {band_id}: {error}"),
        }
    }

    fn aggregate<D, A>(
        band_id: &BandId,
        directory: &D,
        availability: &A,
    ) -> Result<(Roster, BandAvailability)>
    where
        D: IDirectoryStore + ?Sized,
        A: IAvailabilityStore + ?Sized,
    {
        let band = directory.fetch_band(band_id)?;
        let table = fetch_availability_table(availability, &band.roster)?;
        let band_availability = AvailabilityAggregator::aggregate_roster(&band.roster, &table)?;
        Ok((band.roster, band_availability))
    }
}

impl Drop for CalendarWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
