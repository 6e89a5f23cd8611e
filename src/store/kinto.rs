//! Kinto 记录存储客户端
//!
//! 通过 reqwest 访问 Kinto REST 端点：列表为 GET …/records?_sort=…&_limit=…，
//! 响应体 {"data": […]}，下一页句柄取自 Next-Page 响应头（完整 URL，原样存回）；
//! 写回为 PATCH …/records/{id}，请求与响应均为 {"data": …} 包裹。不做重试。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::store::{BookRecord, PageToken, RecordPage, RecordStore, StoreError};

/// Kinto 的 {"data": …} 包裹
#[derive(Debug, Serialize, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Kinto 客户端：持有 Client 与 bucket/collection 定位
pub struct KintoStore {
    client: Client,
    base_url: String,
    bucket: String,
    collection: String,
    auth: Option<String>,
}

impl KintoStore {
    pub fn new(
        base_url: &str,
        bucket: &str,
        collection: &str,
        timeout_secs: u64,
        auth: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            collection: collection.to_string(),
            auth,
        }
    }

    fn records_url(&self) -> String {
        format!(
            "{}/buckets/{}/collections/{}/records",
            self.base_url, self.bucket, self.collection
        )
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(auth) => req.header(reqwest::header::AUTHORIZATION, auth.clone()),
            None => req,
        }
    }

    async fn fetch_page(&self, req: reqwest::RequestBuilder) -> Result<RecordPage, StoreError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        // Next-Page 头仅在还有后续页时出现
        let next = resp
            .headers()
            .get("Next-Page")
            .and_then(|v| v.to_str().ok())
            .map(PageToken::new);
        let body = resp.text().await?;
        let envelope: DataEnvelope<Vec<BookRecord>> = serde_json::from_str(&body)?;
        Ok(RecordPage {
            records: envelope.data,
            next,
        })
    }
}

#[async_trait]
impl RecordStore for KintoStore {
    async fn list_records(&self, sort: &str, limit: usize) -> Result<RecordPage, StoreError> {
        let req = self
            .authorize(self.client.get(self.records_url()))
            .query(&[("_sort", sort.to_string()), ("_limit", limit.to_string())]);
        self.fetch_page(req).await
    }

    async fn next_page(&self, token: &PageToken) -> Result<RecordPage, StoreError> {
        let req = self.authorize(self.client.get(token.as_str()));
        self.fetch_page(req).await
    }

    async fn update_record(&self, record: &BookRecord) -> Result<BookRecord, StoreError> {
        let req = self
            .authorize(self.client.patch(self.record_url(&record.id)))
            .json(&DataEnvelope {
                data: record.clone(),
            });
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        let body = resp.text().await?;
        let envelope: DataEnvelope<BookRecord> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}
