use std::collections::BTreeSet;

use futures::future::join_all;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::{AvailabilityType, BandType, InstrumentType, MemberType};
use crate::{
    algorithm::AvailabilityTable, Band, BandId, DateKey, Error, Instrument, Member, MemberId,
    Result,
};

/// ホスティングされたドキュメントストアを REST で読む
///
/// `bands/{id}`, `members/{id}`, `members/{id}/availability`, `instruments`
pub struct DocumentClient {
    base_url: Url,
    client: reqwest::Client,
}

impl DocumentClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn parse<T>(base_url: T) -> Result<Self>
    where
        T: AsRef<str>,
    {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self::new(base_url))
    }

    pub async fn fetch_band(&self, id: &BandId) -> Result<Band> {
        let url = self.document_url(&["bands", id.as_str()])?;
        let Some(band_type) = self.fetch_document::<BandType>(url).await? else {
            return Err(Error::BandNotFound(id.clone()));
        };

        Ok(band_type.into_band(id.clone()))
    }

    pub async fn fetch_member(&self, id: &MemberId) -> Result<Member> {
        let url = self.document_url(&["members", id.as_str()])?;
        let Some(member_type) = self.fetch_document::<MemberType>(url).await? else {
            return Err(Error::MemberNotFound(id.clone()));
        };

        Ok(member_type.into_member(id.clone()))
    }

    /// 参加可能日がひとつもないメンバーは空集合
    pub async fn fetch_available_dates(&self, id: &MemberId) -> Result<BTreeSet<DateKey>> {
        let url = self.document_url(&["members", id.as_str(), "availability"])?;
        let documents = self
            .fetch_document::<Vec<AvailabilityType>>(url)
            .await?
            .unwrap_or_default();
        AvailabilityType::into_dates(documents)
    }

    pub async fn fetch_instrument_catalog(&self) -> Result<Vec<Instrument>> {
        let url = self.document_url(&["instruments"])?;
        let documents = self
            .fetch_document::<Vec<InstrumentType>>(url)
            .await?
            .unwrap_or_default();
        Ok(documents.into_iter().map(Instrument::from).collect())
    }

    /// 名簿に載っている全員の参加可能日をまとめて取得する
    pub async fn fetch_availability_table(&self, band: &Band) -> Result<AvailabilityTable> {
        let requests = band.roster.member_ids().map(|id| async move {
            let dates = self.fetch_available_dates(id).await;
            (id.clone(), dates)
        });

        let mut table = AvailabilityTable::default();
        for (id, dates) in join_all(requests).await {
            table.insert(id, dates?);
        }
        Ok(table)
    }

    fn document_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Store(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // 404 は None
    async fn fetch_document<T>(&self, url: Url) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        log::debug!("reading {url}");
        let response = self.client.get(url.as_str()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        let text = response.text().await?;
        let document = serde_json::from_str::<T>(&text)?;
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentClient;

    #[test]
    fn document_url() {
        let client = DocumentClient::parse("https://example.com/api/v1").unwrap();
        let url = client.document_url(&["members", "ana", "availability"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/v1/members/ana/availability"
        );
    }

    // 末尾のスラッシュがあっても二重にならない
    #[test]
    fn document_url_trailing_slash() {
        let client = DocumentClient::parse("https://example.com/api/").unwrap();
        let url = client.document_url(&["bands", "los gatos"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/bands/los%20gatos");
    }

    #[test]
    fn reject_invalid_base_url() {
        assert!(DocumentClient::parse("not a url").is_err());

        let client = DocumentClient::parse("mailto:ana@example.com").unwrap();
        assert!(client.document_url(&["bands"]).is_err());
    }
}
