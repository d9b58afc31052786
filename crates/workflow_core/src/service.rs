//! Remote seam for the three catalog operations.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{ParentId, PriceListId},
    error::{ApiError, ErrorCode},
    protocol::{
        AssignPriceListRequest, CatalogPageResponse, CatalogQuery, CreateLineItemsRequest,
        LineItemDraft,
    },
};
use tracing::warn;
use url::Url;

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_catalog_page(
        &self,
        parent_id: &ParentId,
        query: &CatalogQuery,
    ) -> Result<CatalogPageResponse, ApiError>;

    async fn create_line_items(
        &self,
        parent_id: &ParentId,
        items: &[LineItemDraft],
    ) -> Result<(), ApiError>;

    async fn assign_price_list(
        &self,
        parent_id: &ParentId,
        price_list_id: &PriceListId,
    ) -> Result<(), ApiError>;
}

/// JSON-over-HTTP implementation.
///
/// Routes, relative to the base URL:
/// `GET parents/{id}/catalog`, `POST parents/{id}/line-items`,
/// `PUT parents/{id}/price-list`.
pub struct HttpCatalogService {
    http: Client,
    base_url: Url,
}

impl HttpCatalogService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid service url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("service url '{base_url}' cannot be used as a base"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, parent_id: &ParentId, resource: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["parents", parent_id.as_str(), resource]);
        }
        url
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn fetch_catalog_page(
        &self,
        parent_id: &ParentId,
        query: &CatalogQuery,
    ) -> Result<CatalogPageResponse, ApiError> {
        let response = self
            .http
            .get(self.endpoint(parent_id, "catalog"))
            .query(query)
            .send()
            .await
            .map_err(transport_failure)?;
        let response = ensure_success(response).await?;
        response.json().await.map_err(|err| {
            warn!(error = %err, "catalog page response could not be decoded");
            ApiError::without_message(ErrorCode::Internal)
        })
    }

    async fn create_line_items(
        &self,
        parent_id: &ParentId,
        items: &[LineItemDraft],
    ) -> Result<(), ApiError> {
        let body = CreateLineItemsRequest {
            items: items.to_vec(),
        };
        let response = self
            .http
            .post(self.endpoint(parent_id, "line-items"))
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;
        ensure_success(response).await.map(|_| ())
    }

    async fn assign_price_list(
        &self,
        parent_id: &ParentId,
        price_list_id: &PriceListId,
    ) -> Result<(), ApiError> {
        let body = AssignPriceListRequest {
            price_list_id: price_list_id.clone(),
        };
        let response = self
            .http
            .put(self.endpoint(parent_id, "price-list"))
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let failure = serde_json::from_str::<ApiError>(&body)
        .unwrap_or_else(|_| ApiError::without_message(code_for_status(status)));
    warn!(status = status.as_u16(), code = ?failure.code, "catalog service rejected request");
    Err(failure)
}

fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            ErrorCode::Validation
        }
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => ErrorCode::Unavailable,
        _ => ErrorCode::Internal,
    }
}

fn transport_failure(err: reqwest::Error) -> ApiError {
    warn!(error = %err, "catalog service unreachable");
    ApiError::without_message(ErrorCode::Unavailable)
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
