use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;

/// Serializes a value to JSON and uploads it to an S3 bucket with
/// `application/json` content type, optionally gzip-encoded.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> anyhow::Result<()> {
    let body = serde_json::to_vec(value)?;

    let request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type("application/json");

    let request = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        request
            .content_encoding("gzip")
            .body(encoder.finish()?.into())
    } else {
        request.body(body.into())
    };

    request.send().await?;

    Ok(())
}
