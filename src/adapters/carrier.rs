use crate::core::{CarrierClient, PackagingSlip};
use crate::domain::ports::CarrierResponse;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParcelRequest<'a> {
    reference: &'a str,
    packaging_slip_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParcelResponse {
    shipment_id: String,
}

/// Carrier REST client authenticated with a static bearer token.
#[derive(Debug, Clone)]
pub struct HttpCarrierClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl HttpCarrierClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let invalid = |reason: String| DispatchError::InvalidConfigValueError {
            field: "carrier.api_base_url".to_string(),
            value: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(format!("Invalid URL format: {}", e)))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as an API base".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parsed,
            access_token: access_token.to_string(),
        })
    }

    /// 每個 segment 各自 percent-encode，shipment id 內的 `/`、`?`、`#` 不會改變路徑
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DispatchError::InvalidConfigValueError {
                field: "carrier.api_base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as an API base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl CarrierClient for HttpCarrierClient {
    async fn create_parcel(&self, slip: &mut PackagingSlip) -> Result<()> {
        let url = self.endpoint(&["parcels"])?;
        tracing::debug!("📡 Creating parcel for {} at {}", slip.document_number, url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&ParcelRequest {
                reference: &slip.document_number,
                packaging_slip_id: slip.id,
            })
            .send()
            .await?;

        tracing::debug!("📡 Parcel response status: {}", response.status());
        if !response.status().is_success() {
            return Err(DispatchError::ParcelCreation {
                status: response.status().as_u16(),
            });
        }

        let parcel: ParcelResponse = response.json().await?;
        tracing::info!(
            "📦 Packaging slip {} registered as shipment {}",
            slip.document_number,
            parcel.shipment_id
        );
        slip.carrier_shipment_id = Some(parcel.shipment_id);
        Ok(())
    }

    async fn fetch_label(
        &self,
        carrier_shipment_id: &str,
        accept: &str,
    ) -> Result<CarrierResponse> {
        let url = self.endpoint(&["labels", carrier_shipment_id])?;
        tracing::debug!("📡 Fetching {} label from {}", accept, url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("📡 Label response status: {} ({} bytes)", status, body.len());

        Ok(CarrierResponse { status, body })
    }
}
