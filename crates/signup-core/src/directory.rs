//! User directory client
//!
//! The form talks to two remote operations: the username availability query
//! and the registration endpoint. Both sit behind [`UserDirectory`] so the
//! form logic can be exercised without a server.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Availability, RegisterPayload};

const USERNAME_CHECK_PATH: &str = "user/username-check";
const SIGN_UP_PATH: &str = "user/sign-up";

/// Remote user directory used by the sign-up form
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Ask whether `username` is still free.
    ///
    /// A client-error response is a normal negative answer
    /// ([`Availability::Taken`]); other failures are errors.
    async fn check_username(&self, username: &str) -> Result<Availability>;

    /// Submit a registration with the pass-through headers of the
    /// verification step attached.
    async fn register(&self, payload: &RegisterPayload, headers: &[(String, String)]) -> Result<()>;
}

/// Map the status of an availability query to an answer
pub fn classify_username_response(status: StatusCode) -> Result<Availability> {
    if status.is_success() {
        Ok(Availability::Available)
    } else if status.is_client_error() {
        Ok(Availability::Taken)
    } else {
        Err(Error::Rejected {
            status: status.as_u16(),
        })
    }
}

/// reqwest-backed directory talking to the judge API
pub struct HttpUserDirectory {
    base_url: String,
    client: Client,
}

impl HttpUserDirectory {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn extra_headers(pairs: &[(String, String)]) -> Result<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(
            header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name {}: {}", name, e)))?,
            header::HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid header value for {}: {}", name, e)))?,
        );
    }
    Ok(headers)
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn check_username(&self, username: &str) -> Result<Availability> {
        log::debug!("[signup:directory] Checking username {:?}", username);

        let response = self
            .client
            .get(self.endpoint(USERNAME_CHECK_PATH))
            .query(&[("username", username)])
            .send()
            .await?;

        let availability = classify_username_response(response.status())?;
        log::debug!(
            "[signup:directory] Username {:?} -> {:?} (HTTP {})",
            username,
            availability,
            response.status().as_u16()
        );
        Ok(availability)
    }

    async fn register(&self, payload: &RegisterPayload, headers: &[(String, String)]) -> Result<()> {
        log::info!("[signup:directory] Registering user {:?}", payload.username);

        let response = self
            .client
            .post(self.endpoint(SIGN_UP_PATH))
            .headers(extra_headers(headers)?)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            log::warn!("[signup:directory] Sign-up rejected with HTTP {}", status.as_u16());
            Err(Error::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(url: &str) -> Config {
        Config {
            api_url: url.to_string(),
            ..Config::default()
        }
    }

    fn sample_payload() -> RegisterPayload {
        RegisterPayload {
            password: "Passw0rd".to_string(),
            password_again: "Passw0rd".to_string(),
            real_name: "Gildong Hong".to_string(),
            student_id: "2024123456".to_string(),
            major: "College of Software".to_string(),
            username: "student1".to_string(),
            email: "s@skku.edu".to_string(),
            verification_code: "123456".to_string(),
        }
    }

    #[test]
    fn test_classify_username_response() {
        assert_eq!(
            classify_username_response(StatusCode::OK).unwrap(),
            Availability::Available
        );
        assert_eq!(
            classify_username_response(StatusCode::CONFLICT).unwrap(),
            Availability::Taken
        );
        assert_eq!(
            classify_username_response(StatusCode::BAD_REQUEST).unwrap(),
            Availability::Taken
        );
        assert!(matches!(
            classify_username_response(StatusCode::BAD_GATEWAY),
            Err(Error::Rejected { status: 502 })
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let directory = HttpUserDirectory::new(&config_for("http://localhost:4000/api/")).unwrap();
        assert_eq!(directory.base_url(), "http://localhost:4000/api");
        assert_eq!(
            directory.endpoint(SIGN_UP_PATH),
            "http://localhost:4000/api/user/sign-up"
        );
    }

    #[test]
    fn test_extra_headers_rejects_invalid_name() {
        let pairs = vec![("bad header".to_string(), "x".to_string())];
        assert!(matches!(extra_headers(&pairs), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_check_username_available_over_http() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user/username-check")
            .match_query(Matcher::UrlEncoded("username".into(), "student1".into()))
            .match_header("accept", "application/json")
            .with_status(200)
            .create_async()
            .await;
        let directory = HttpUserDirectory::new(&config_for(&server.url())).unwrap();

        let availability = directory.check_username("student1").await.unwrap();
        assert_eq!(availability, Availability::Available);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_username_taken_over_http() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user/username-check")
            .match_query(Matcher::UrlEncoded("username".into(), "testuser".into()))
            .with_status(409)
            .create_async()
            .await;
        let directory = HttpUserDirectory::new(&config_for(&server.url())).unwrap();

        let availability = directory.check_username("testuser").await.unwrap();
        assert_eq!(availability, Availability::Taken);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_username_server_error_is_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user/username-check")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let directory = HttpUserDirectory::new(&config_for(&server.url())).unwrap();

        let err = directory.check_username("student1").await.unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 503 }));
        assert!(!err.is_client_error());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_posts_payload_with_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/sign-up")
            .match_header("email-auth", "token-abc")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "password": "Passw0rd",
                "passwordAgain": "Passw0rd",
                "realName": "Gildong Hong",
                "studentId": "2024123456",
                "major": "College of Software",
                "username": "student1",
                "email": "s@skku.edu",
                "verificationCode": "123456"
            })))
            .with_status(201)
            .create_async()
            .await;
        let directory = HttpUserDirectory::new(&config_for(&server.url())).unwrap();
        let headers = vec![("email-auth".to_string(), "token-abc".to_string())];

        directory.register(&sample_payload(), &headers).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_rejection_is_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/sign-up")
            .with_status(500)
            .create_async()
            .await;
        let directory = HttpUserDirectory::new(&config_for(&server.url())).unwrap();

        let err = directory.register(&sample_payload(), &[]).await.unwrap_err();
        assert!(matches!(err, Error::Rejected { status: 500 }));
        mock.assert_async().await;
    }
}
