use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::storage::UrlSigner;

pub fn sign_url(
    config: &AppConfig,
    bucket: Option<&str>,
    path: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let signer = UrlSigner::new(&config.storage)?;
    let bucket = bucket.unwrap_or(signer.bucket()).to_string();
    let signed = signer.sign_in(&bucket, path)?;

    output_success(
        output_format,
        "Signed URL created",
        Some(&signed.url),
        json!({ "signedUrl": signed.url, "expires_at": signed.expires_at }),
    )
}
