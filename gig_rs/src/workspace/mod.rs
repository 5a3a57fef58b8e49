mod band_workspace;
mod watcher;

pub use band_workspace::{BandWorkspace, RosterMemberView};
pub use watcher::CalendarWatcher;

use crate::{algorithm::AvailabilityTable, store::IAvailabilityStore, Result, Roster};

/// 名簿に載っている全員分の参加可能日を取得する
///
/// 登録がひとつもないメンバーも空集合で埋めておく
pub fn fetch_availability_table<A>(availability: &A, roster: &Roster) -> Result<AvailabilityTable>
where
    A: IAvailabilityStore + ?Sized,
{
    roster
        .member_ids()
        .map(|member_id| {
            let dates = availability.fetch_available_dates(member_id)?;
            Ok((member_id.clone(), dates))
        })
        .collect()
}
