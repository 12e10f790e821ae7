//! HTTP implementation of the coupon submission capability.

use std::time::Duration;

use async_trait::async_trait;
use coupon_core::config::ApiConfig;
use coupon_core::{CouponSubmitter, CreateCouponPayload, SubmitError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

pub struct HttpCouponApi {
    client: Client,
    create_url: String,
    timeout: Duration,
}

/// Error body returned by the admin API. `msg` is optional.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    msg: Option<String>,
}

impl HttpCouponApi {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let timeout = config.timeout();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, create_url: config.create_url(), timeout })
    }

    pub fn create_url(&self) -> &str {
        &self.create_url
    }
}

#[async_trait]
impl CouponSubmitter for HttpCouponApi {
    async fn submit(&self, payload: &CreateCouponPayload) -> Result<(), SubmitError> {
        let response =
            self.client.post(&self.create_url).json(payload).send().await.map_err(|error| {
                warn!(error = %error, url = %self.create_url, "coupon create request failed");
                if error.is_timeout() {
                    SubmitError::TimedOut(self.timeout)
                } else {
                    SubmitError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "coupon create request accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SubmitError::Rejected { status: Some(status.as_u16()), message: server_message(&body) })
    }
}

/// Pulls the human-readable `msg` out of an error body, if there is one.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|body| body.msg)
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use coupon_core::config::ApiConfig;

    use super::{server_message, HttpCouponApi};

    #[test]
    fn message_field_is_extracted_from_error_body() {
        assert_eq!(
            server_message(r#"{"msg":"duplicate name","code":409}"#),
            Some("duplicate name".to_string())
        );
    }

    #[test]
    fn absent_empty_or_malformed_message_yields_none() {
        assert_eq!(server_message(r#"{"code":500}"#), None);
        assert_eq!(server_message(r#"{"msg":""}"#), None);
        assert_eq!(server_message(r#"{"msg":null}"#), None);
        assert_eq!(server_message("<html>Bad Gateway</html>"), None);
        assert_eq!(server_message(""), None);
    }

    #[test]
    fn whitespace_message_is_kept_as_sent() {
        assert_eq!(server_message(r#"{"msg":" "}"#), Some(" ".to_string()));
    }

    #[test]
    fn create_url_joins_base_and_path() {
        let api = HttpCouponApi::new(&ApiConfig {
            base_url: "https://shop.example.com/".to_string(),
            create_path: "/admin/coupons".to_string(),
            timeout_secs: 5,
        })
        .expect("client builds");
        assert_eq!(api.create_url(), "https://shop.example.com/admin/coupons");
    }
}
