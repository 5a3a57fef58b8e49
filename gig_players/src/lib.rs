pub mod clients;
mod member_list;

use std::collections::{BTreeSet, HashMap};

use gig_rs::{
    algorithm::AvailabilityTable,
    store::{IAvailabilityStore, IDirectoryStore},
    Band, DateKey, InstrumentId, Member, Role,
};
pub use member_list::MemberList;

#[derive(Debug, serde::Deserialize)]
pub struct Record {
    name: String,
    property_name: String,
    value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("row for `{name}`: {source}")]
    Value {
        name: String,
        #[source]
        source: gig_rs::Error,
    },

    #[error("row for `{name}`: unknown role `{value}`")]
    UnknownRole { name: String, value: String },
}

// シート上のメンバー 1 人分
struct SheetRow {
    name: String,
    role: Role,
    instrument_ids: Vec<InstrumentId>,
    dates: BTreeSet<DateKey>,
}

/// CSV から読み込んだバンド 1 つ分の名簿と参加可能日
#[derive(Debug, Clone)]
pub struct RosterSheet {
    pub band: Band,
    pub members: Vec<Member>,
    pub availability: AvailabilityTable,
}

impl RosterSheet {
    /// `name,property_name,value` 形式の行を読み込む
    ///
    /// property_name は instrument / role / available のいずれか
    pub fn from_csv(band_name: &str, data: &str) -> Result<Self, SheetError> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());

        // 正規化した名前 → 行。登場順も覚えておく
        let mut order: Vec<String> = Vec::default();
        let mut table = HashMap::<String, SheetRow>::default();

        for record in reader.deserialize::<Record>() {
            let record = record?;
            let name = record.name.trim();
            if name.is_empty() {
                log::warn!("skipping row without name: {:?}", record);
                continue;
            }

            let key = Member::normalized_name(name);
            if !table.contains_key(&key) {
                order.push(key.clone());
            }
            let row = table.entry(key).or_insert_with(|| SheetRow {
                name: name.to_string(),
                role: Role::Primary,
                instrument_ids: Vec::default(),
                dates: BTreeSet::default(),
            });

            let value = record.value.trim();
            match record.property_name.trim() {
                "instrument" => {
                    let instrument_id = InstrumentId::from(value);
                    if !row.instrument_ids.contains(&instrument_id) {
                        row.instrument_ids.push(instrument_id);
                    }
                }
                "role" => {
                    row.role = match value.to_lowercase().as_str() {
                        "primary" => Role::Primary,
                        "substitute" => Role::Substitute,
                        _ => {
                            return Err(SheetError::UnknownRole {
                                name: row.name.clone(),
                                value: value.to_string(),
                            })
                        }
                    };
                }
                "available" => {
                    let date = DateKey::parse(value).map_err(|source| SheetError::Value {
                        name: row.name.clone(),
                        source,
                    })?;
                    row.dates.insert(date);
                }
                other => log::warn!("skipping unknown property `{}` for {}", other, row.name),
            }
        }

        let mut band = Band::new(band_name);
        let mut members = Vec::default();
        let mut availability = AvailabilityTable::default();
        for key in order {
            let Some(row) = table.remove(&key) else {
                continue;
            };

            let member = Member::new(&row.name, row.instrument_ids.iter().cloned());
            band.roster.assign(member.id.clone(), row.role, row.instrument_ids);
            availability.insert(member.id.clone(), row.dates);
            members.push(member);
        }

        log::debug!("loaded {} members for {}", members.len(), band.name);
        Ok(Self {
            band,
            members,
            availability,
        })
    }

    /// ストアに書き込む
    pub fn load_into<D, A>(&self, directory: &D, availability: &A) -> gig_rs::Result<()>
    where
        D: IDirectoryStore + ?Sized,
        A: IAvailabilityStore + ?Sized,
    {
        for member in &self.members {
            directory.save_member(member)?;
        }
        directory.save_band(&self.band)?;

        for (member_id, dates) in &self.availability {
            for date in dates {
                availability.mark_available(member_id, *date)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gig_rs::{DateKey, InstrumentId, Role};

    use super::{RosterSheet, SheetError};

    const DATA: &str = "name,property_name,value
ana,instrument,guitar
ana,available,2024-05-01
beto,instrument,bass
Cora,instrument,bass
Cora,role,substitute
cora,available,2024-05-01
";

    #[test]
    fn simple() {
        let sheet = RosterSheet::from_csv("Los Gatos", DATA).unwrap();
        assert_eq!(sheet.band.name, "Los Gatos");
        assert_eq!(sheet.members.len(), 3);

        // 登場順
        let names: Vec<&str> = sheet.members.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["ana", "beto", "Cora"]);

        let cora = &sheet.members[2];
        assert_eq!(sheet.band.roster.role_of(&cora.id), Some(Role::Substitute));
        assert!(cora.instrument_ids.contains(&InstrumentId::from("bass")));
        assert!(sheet.availability[&cora.id].contains(&DateKey::parse("2024-05-01").unwrap()));

        // 参加可能日のないメンバーも空集合で入っている
        let beto = &sheet.members[1];
        assert!(sheet.availability[&beto.id].is_empty());
    }

    #[test]
    fn reject_malformed_date() {
        let data = "name,property_name,value\nana,available,1/5/2024\n";
        let result = RosterSheet::from_csv("Los Gatos", data);
        assert!(matches!(result, Err(SheetError::Value { .. })));
    }

    #[test]
    fn reject_unknown_role() {
        let data = "name,property_name,value\nana,role,manager\n";
        let result = RosterSheet::from_csv("Los Gatos", data);
        assert!(matches!(result, Err(SheetError::UnknownRole { .. })));
    }

    #[test]
    fn skip_unknown_property() {
        let data = "name,property_name,value\nana,instrument,guitar\nana,email,ana@example.com\n";
        let sheet = RosterSheet::from_csv("Los Gatos", data).unwrap();
        assert_eq!(sheet.members.len(), 1);
    }
}
