use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::BandAvailability;
use crate::{DateKey, Error, EventId, MemberId, Result};

/// バンドの予定
///
/// `members` は作成時点で参加できたメンバーのスナップショットで、
/// 後から参加可能日が変わっても更新しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub date: DateKey,
    pub title: String,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub members: Vec<MemberId>,
}

/// 入力フォームの値
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub date: Option<DateKey>,
    pub title: String,
    pub time: String,
    pub notes: String,
}

/// 予定を入れられる日付と、その日に参加できるメンバー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookableDate {
    pub date: DateKey,
    pub attendees: Vec<MemberId>,
}

impl BookableDate {
    pub fn label(&self) -> String {
        format_display_date(&self.date)
    }
}

pub struct EventPlanner;

impl EventPlanner {
    /// バンドとして演奏できて、今日以降で、まだ予定の入っていない日付
    pub fn bookable_dates(
        availability: &BandAvailability,
        events: &[Event],
        today: DateKey,
    ) -> Vec<BookableDate> {
        let claimed: HashSet<&DateKey> = events.iter().map(|x| &x.date).collect();
        availability
            .iter()
            .filter(|x| x.is_available)
            .filter(|x| today <= x.date)
            .filter(|x| !claimed.contains(&x.date))
            .map(|x| BookableDate {
                date: x.date,
                attendees: x.attendees(),
            })
            .collect()
    }

    /// 入力値から予定を作る。参加者は選んだ日付のスナップショット
    pub fn plan(draft: EventDraft, bookable_dates: &[BookableDate]) -> Result<Event> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidEvent("title is required".to_string()));
        }

        let Some(date) = draft.date else {
            return Err(Error::InvalidEvent("date is required".to_string()));
        };

        let Some(bookable) = bookable_dates.iter().find(|x| x.date == date) else {
            return Err(Error::DateNotBookable(date));
        };

        Ok(Event {
            id: EventId::generate(),
            date,
            title: title.to_string(),
            time: non_empty(draft.time),
            notes: non_empty(draft.notes),
            members: bookable.attendees.clone(),
        })
    }
}

/// `dd/MM/yyyy`
pub fn format_display_date(date: &DateKey) -> String {
    date.date().format("%d/%m/%Y").to_string()
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
