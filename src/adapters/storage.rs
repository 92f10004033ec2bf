use crate::adapters::rest::RestClient;
use crate::domain::ports::BlobStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

/// Object storage under `/storage/v1`.
#[derive(Debug, Clone)]
pub struct RestBlobStore {
    http: RestClient,
}

impl RestBlobStore {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl BlobStore for RestBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = self
            .http
            .endpoint(&format!("storage/v1/object/{}/{}", bucket, path))?;
        tracing::debug!("Uploading {} bytes to {}", data.len(), url);

        let response = self
            .http
            .request(Method::POST, url)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await?;
        RestClient::check(response, &format!("upload {}/{}", bucket, path)).await?;

        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}storage/v1/object/public/{}/{}",
            self.http.base_url(),
            bucket,
            path
        )
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = self.http.endpoint(&format!("storage/v1/object/{}", bucket))?;
        tracing::debug!("Removing {:?} from {}", paths, bucket);

        let response = self
            .http
            .request(Method::DELETE, url)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        RestClient::check(response, &format!("remove from {}", bucket)).await?;
        Ok(())
    }
}
