use std::collections::{BTreeSet, HashMap};

use gig_players::RosterSheet;
use gig_rs::{
    algorithm::{format_display_date, AvailabilityTable, BookableDate, MonthCalendar},
    Band, DateKey, Error, InstrumentId, Member, MemberId, Result, Role, Roster,
};
use itertools::Itertools;

/// `name/inst0/inst1` を名前と担当楽器に分解する
pub fn parse_members<T, U>(iterator: T) -> Result<Vec<(String, Vec<InstrumentId>)>>
where
    T: IntoIterator<Item = U>,
    U: AsRef<str>,
{
    iterator
        .into_iter()
        .map(|x| {
            let mut inputs = x.as_ref().split('/');
            let name = parse_name(inputs.next())?;
            let instrument_ids: Vec<InstrumentId> = inputs
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(InstrumentId::from)
                .collect();
            Ok((name, instrument_ids))
        })
        .collect()
}

/// `name/yyyy-MM-dd/yyyy-MM-dd` を名前ごとの参加可能日にする
///
/// 同じ名前が複数回あれば日付を合わせる
pub fn parse_availability<T, U>(iterator: T) -> Result<HashMap<String, BTreeSet<DateKey>>>
where
    T: IntoIterator<Item = U>,
    U: AsRef<str>,
{
    let mut table = HashMap::<String, BTreeSet<DateKey>>::default();
    for x in iterator {
        let mut inputs = x.as_ref().split('/');
        let name = parse_name(inputs.next())?;
        let dates = inputs
            .map(|x| DateKey::parse(x.trim()))
            .collect::<Result<Vec<DateKey>>>()?;
        table.entry(name).or_default().extend(dates);
    }
    Ok(table)
}

fn parse_name(input: Option<&str>) -> Result<String> {
    match input.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(Error::InvalidMember("name is required".to_string())),
    }
}

/// `yyyy-MM` を年と月にする
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidDateKey(value.to_string());
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// コマンドライン引数で与えた名簿をシートにまとめる
pub fn inline_sheet(
    band_name: &str,
    primary_members: &[(String, Vec<InstrumentId>)],
    substitutes: &[(String, Vec<InstrumentId>)],
    availability: &HashMap<String, BTreeSet<DateKey>>,
) -> Result<RosterSheet> {
    let mut band = Band::new(band_name);
    let mut members = Vec::<Member>::default();
    let mut table = AvailabilityTable::default();

    let inputs = primary_members
        .iter()
        .map(|x| (x, Role::Primary))
        .chain(substitutes.iter().map(|x| (x, Role::Substitute)));
    for ((name, instrument_ids), role) in inputs {
        let key = Member::normalized_name(name);
        if members.iter().any(|x| Member::normalized_name(&x.name) == key) {
            log::warn!("{} is listed twice, keeping the first role", name);
            continue;
        }

        let member = Member::new(name, instrument_ids.iter().cloned());
        band.roster.assign(member.id.clone(), role, instrument_ids.iter().cloned());
        table.insert(member.id.clone(), BTreeSet::default());
        members.push(member);
    }

    for (name, dates) in availability {
        let key = Member::normalized_name(name);
        let Some(member) = members
            .iter()
            .find(|x| Member::normalized_name(&x.name) == key)
        else {
            return Err(Error::InvalidMember(format!("{name} is not on the roster")));
        };
        table.entry(member.id.clone()).or_default().extend(dates);
    }

    Ok(RosterSheet {
        band,
        members,
        availability: table,
    })
}

// 代役には * を付ける
fn attendee_label(
    member_id: &MemberId,
    roster: &Roster,
    names: &HashMap<MemberId, String>,
) -> String {
    let name = names
        .get(member_id)
        .map(String::as_str)
        .unwrap_or("Unknown");
    match roster.role_of(member_id) {
        Some(Role::Substitute) => format!("{name}*"),
        _ => name.to_string(),
    }
}

/// 1 日 1 行で月の集計結果を書き出す
pub fn render_calendar(
    calendar: &MonthCalendar,
    roster: &Roster,
    names: &HashMap<MemberId, String>,
) -> String {
    let mut string = format!("{:04}-{:02}\n", calendar.year(), calendar.month());
    for day in calendar.days() {
        let mark = if day.is_available() { "✓" } else { "✗" };
        let attendees = day
            .coverage
            .as_ref()
            .map(|x| {
                x.attendees()
                    .iter()
                    .map(|id| attendee_label(id, roster, names))
                    .join(", ")
            })
            .unwrap_or_default();
        let line = format!("{} {} {}", format_display_date(&day.date), mark, attendees);
        string.push_str(line.trim_end());
        string.push('\n');
    }
    string
}

pub fn render_bookable_dates(
    bookable_dates: &[BookableDate],
    roster: &Roster,
    names: &HashMap<MemberId, String>,
) -> String {
    if bookable_dates.is_empty() {
        return "no bookable dates\n".to_string();
    }

    bookable_dates
        .iter()
        .map(|x| {
            let attendees = x
                .attendees
                .iter()
                .map(|id| attendee_label(id, roster, names))
                .join(", ");
            format!("{} {}\n", x.label(), attendees)
        })
        .collect()
}
