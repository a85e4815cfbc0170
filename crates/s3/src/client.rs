//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bc-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use bc_core::{Config, Error, ListResult, ObjectInfo, ObjectPath, ObjectStore, Result};

/// Region used when neither the environment nor the SDK chain provides one
const FALLBACK_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from the resolved configuration
    ///
    /// Static credentials are used when both the key id and the secret are
    /// set; otherwise the SDK default credential chain applies.
    pub async fn new(config: &Config) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some((access_key, secret_key)) = config.static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "bucketctl-environment",
            );
            loader = loader.credentials_provider(credentials);
        } else {
            tracing::debug!("Static credentials incomplete, using the default provider chain");
        }

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str());
        }

        let sdk_config = loader.load().await;

        // Path-style addressing for custom (S3-compatible) endpoints
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some());

        if sdk_config.region().is_none() {
            tracing::debug!(region = FALLBACK_REGION, "No region configured");
            builder = builder.region(aws_config::Region::new(FALLBACK_REGION));
        }

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult> {
        tracing::debug!(bucket, prefix, "ListObjectsV2");

        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().unwrap_or_default();
                let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));

                info.last_modified = object.last_modified().and_then(to_timestamp);

                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                if let Some(sc) = object.storage_class() {
                    info.storage_class = Some(sc.as_str().to_string());
                }

                info
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn put_object(
        &self,
        path: &ObjectPath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        tracing::debug!(%path, size = data.len(), "PutObject");

        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self
            .inner
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .body(body);

        if let Some(ct) = &content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &path.to_string()))?;

        let mut info = ObjectInfo::file(&path.key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.content_type = content_type;
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn delete_object(&self, path: &ObjectPath) -> Result<()> {
        tracing::debug!(%path, "DeleteObject");

        self.inner
            .delete_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &path.to_string()))?;

        Ok(())
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

fn map_sdk_error<E, R>(err: SdkError<E, R>, subject: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(|c| c.to_string());
    let message = DisplayErrorContext(&err).to_string();
    classify_error(code.as_deref(), subject, message)
}

/// Map a provider error code onto the core error taxonomy
fn classify_error(code: Option<&str>, subject: &str, message: String) -> Error {
    match code {
        Some("NoSuchBucket") => Error::NotFound(format!("Bucket not found: {subject}")),
        Some("NoSuchKey" | "NotFound") => Error::NotFound(subject.to_string()),
        Some(
            "AccessDenied"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(message),
        _ => Error::Network(message),
    }
}
