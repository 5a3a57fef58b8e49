use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::InstrumentId;

/// カテゴリ未設定の楽器をまとめる見出し
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    pub category: String,
}

impl Instrument {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Self {
            id: InstrumentId::from(id),
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// 楽器一覧をカテゴリごとにまとめる
///
/// 選択肢の表示に使うので、カテゴリ内はカタログの順番を保つ
pub fn group_by_category(catalog: &[Instrument]) -> BTreeMap<String, Vec<Instrument>> {
    catalog
        .iter()
        .map(|instrument| {
            let category = if instrument.category.trim().is_empty() {
                OTHER_CATEGORY.to_string()
            } else {
                instrument.category.clone()
            };
            (category, instrument.clone())
        })
        .into_group_map()
        .into_iter()
        .collect()
}

/// 識別子を表示名に変換する。カタログにない識別子は捨てる
pub fn resolve_names<'a, T>(ids: T, catalog: &[Instrument]) -> Vec<String>
where
    T: IntoIterator<Item = &'a InstrumentId>,
{
    ids.into_iter()
        .filter_map(|id| catalog.iter().find(|instrument| &instrument.id == id))
        .map(|instrument| instrument.name.clone())
        .collect()
}
