use crate::core::api::{FundQuery, FundsApi};
use crate::core::error::ApiError;
use crate::core::fund::{DayReturns, Fund, ReturnEntry};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Client for the remote fund-data service.
pub struct FundServiceClient {
    base_url: String,
    client: Client,
}

impl FundServiceClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent("fontakip/0.1").build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn funds_url(&self, fund_code: Option<&str>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}/api/funds", self.base_url))?;
        if let Some(code) = fund_code
            && let Ok(mut segments) = url.path_segments_mut()
        {
            segments.push(code);
        }
        Ok(url)
    }

    fn update_url(&self, fund_code: &str, date: &str) -> Result<Url, ApiError> {
        let mut url = self.funds_url(Some(fund_code))?;
        url.query_pairs_mut().append_pair("date", date);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse fund service response");
            ApiError::UnexpectedPayload(e.to_string())
        })
    }

    /// Reads the body, turning non-2xx statuses into [`ApiError::Status`].
    async fn read_body(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, %body, "Fund service returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl FundsApi for FundServiceClient {
    async fn list_funds(&self) -> Result<Vec<Fund>, ApiError> {
        let url = self.funds_url(None)?;
        debug!("Requesting fund list from {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn fund_history(&self, query: &FundQuery) -> Result<Vec<DayReturns>, ApiError> {
        let mut url = self.funds_url(Some(&query.fund_code))?;
        {
            let mut pairs = url.query_pairs_mut();
            if !query.start_date.is_empty() {
                pairs.append_pair("startDate", &query.start_date);
            }
            if !query.end_date.is_empty() {
                pairs.append_pair("endDate", &query.end_date);
            }
        }
        // An untouched serializer leaves a bare '?'
        if url.query() == Some("") {
            url.set_query(None);
        }

        debug!("Requesting fund history from {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn update_returns(
        &self,
        fund_code: &str,
        date: &str,
        returns: &[ReturnEntry],
    ) -> Result<(), ApiError> {
        let url = self.update_url(fund_code, date)?;
        debug!("Sending {} returns to {}", returns.len(), url);
        let response = self.client.put(url).json(returns).send().await?;
        Self::read_body(response).await.map(|_| ())
    }

    fn update_target(&self, fund_code: &str, date: &str) -> String {
        self.update_url(fund_code, date)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}/api/funds/{}?date={}", self.base_url, fund_code, date))
    }
}
