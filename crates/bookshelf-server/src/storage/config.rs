use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
    /// Base URL stored cover links are built from. When unset, a URL is
    /// derived from the endpoint (MinIO) or the AWS virtual-hosted style.
    pub public_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "bookshelf-covers".to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY")
                .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            public_url: env::var("S3_PUBLIC_URL").ok(),
        })
    }

    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            bucket: bucket.into(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            path_style: true,
            public_url: None,
        }
    }

    /// Base URL for public object links
    pub fn public_base(&self) -> String {
        if let Some(public) = &self.public_url {
            return public.trim_end_matches('/').to_string();
        }
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_minio() {
        let config = StorageConfig::for_minio("http://localhost:9000", "covers");
        assert_eq!(config.endpoint, Some("http://localhost:9000".to_string()));
        assert_eq!(config.bucket, "covers");
        assert!(config.path_style);
        assert_eq!(config.public_base(), "http://localhost:9000/covers");
    }

    #[test]
    fn test_public_base_prefers_explicit_url() {
        let mut config = StorageConfig::for_minio("http://localhost:9000", "covers");
        config.public_url = Some("https://cdn.example.com/".to_string());
        assert_eq!(config.public_base(), "https://cdn.example.com");
    }

    #[test]
    fn test_public_base_aws_style() {
        let config = StorageConfig {
            endpoint: None,
            region: "eu-west-1".to_string(),
            bucket: "covers".to_string(),
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            path_style: false,
            public_url: None,
        };
        assert_eq!(
            config.public_base(),
            "https://covers.s3.eu-west-1.amazonaws.com"
        );
    }
}
