//! Session client state machine
//!
//! `Unauthenticated -> Authenticated -> LoggedIn`, driven by
//! [`SessionClient::authenticate`], [`SessionClient::login`] and
//! [`SessionClient::fetch_latest`].
//!
//! Retry policy: a fetch rejected with an expiry status (401, 403, 500)
//! drops both tokens, logs in again from scratch and retries exactly once.
//! Transport errors and every other rejection are surfaced immediately.

use super::error::{SessionError, Step};
use super::protocol::{
    self, AuthenticateRequest, LoginRequest, APPLICATION_ID, AUTHENTICATE_PATH, LOGIN_PATH,
    REQUEST_BUF_LEN, RESPONSE_BUF_LEN,
};
use super::state::{Session, SessionState};
use super::ReadingSource;
use crate::config::ShareConfig;
use crate::reading::{Reading, Trend};
use crate::traits::{Clock, HttpResponse, HttpTransport};

/// Share session client
///
/// Owns the transport and both tokens. Readings are stamped with the
/// client's clock when accepted.
pub struct SessionClient<T, C> {
    transport: T,
    clock: C,
    share: ShareConfig,
    session: Session,
    latest: Option<Reading>,
    request: [u8; REQUEST_BUF_LEN],
    response: [u8; RESPONSE_BUF_LEN],
}

impl<T: HttpTransport, C: Clock> SessionClient<T, C> {
    /// Create a client with no tokens
    pub fn new(transport: T, clock: C, share: ShareConfig) -> Self {
        Self {
            transport,
            clock,
            share,
            session: Session::new(),
            latest: None,
            request: [0; REQUEST_BUF_LEN],
            response: [0; RESPONSE_BUF_LEN],
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Last reading returned by a successful fetch
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    pub fn latest_value(&self) -> Option<u16> {
        self.latest.and_then(|r| r.value)
    }

    pub fn latest_trend(&self) -> Option<Trend> {
        self.latest.and_then(|r| r.trend)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Step 1: exchange credentials for an account token
    ///
    /// On failure the session is left as it was.
    pub async fn authenticate(&mut self) -> Result<(), SessionError> {
        info!("Authenticating with Share...");
        let url = protocol::endpoint(self.share.region, AUTHENTICATE_PATH)?;
        let len = protocol::encode_request(
            &AuthenticateRequest {
                application_id: APPLICATION_ID,
                account_name: &self.share.username,
                password: &self.share.password,
            },
            &mut self.request,
        )?;

        let response = self.exchange(&url, len, Step::Authenticate).await?;
        let token = protocol::parse_token(self.body(&response), Step::Authenticate)?;
        info!("Authenticated, account {}...", token_prefix(&token));
        self.session.set_account(token);
        Ok(())
    }

    /// Step 2: exchange the account token for a session token
    ///
    /// Needs an account token; fails with `NotAuthenticated` without
    /// touching the network otherwise. A failed login keeps the account
    /// token.
    pub async fn login(&mut self) -> Result<(), SessionError> {
        let Some(account_id) = self.session.account_id() else {
            warn!("No account id, cannot log in");
            return Err(SessionError::NotAuthenticated);
        };

        info!("Logging in to Share...");
        let url = protocol::endpoint(self.share.region, LOGIN_PATH)?;
        let len = protocol::encode_request(
            &LoginRequest {
                application_id: APPLICATION_ID,
                account_id,
                password: &self.share.password,
            },
            &mut self.request,
        )?;

        let response = self.exchange(&url, len, Step::Login).await?;
        let token = protocol::parse_token(self.body(&response), Step::Login)?;
        info!("Logged in, session {}...", token_prefix(&token));
        self.session.set_session(token);
        Ok(())
    }

    /// Step 3: fetch the latest reading
    ///
    /// Logs in first when no session token is held. An empty or malformed
    /// result is returned as a reading without a value.
    pub async fn fetch_latest(&mut self) -> Result<Reading, SessionError> {
        if self.session.session_id().is_none() {
            debug!("No session id, logging in before fetch");
            self.ensure_logged_in().await?;
        }

        let reading = match self.fetch_once().await {
            Err(SessionError::Rejected {
                step: Step::Fetch,
                status,
            }) if protocol::is_expiry_status(status) => {
                warn!("Session expired (status {}), logging in again", status);
                self.session.clear();
                self.ensure_logged_in().await?;
                match self.fetch_once().await {
                    Err(SessionError::Rejected {
                        step: Step::Fetch,
                        status,
                    }) if protocol::is_expiry_status(status) => {
                        error!("Fetch still rejected after re-login (status {})", status);
                        self.session.clear();
                        return Err(SessionError::SessionExpired { status });
                    }
                    other => other?,
                }
            }
            other => other?,
        };

        match reading.value {
            Some(value) => info!("Glucose: {} mg/dL, trend {:?}", value, reading.trend),
            None => info!("No recent glucose data available"),
        }
        self.latest = Some(reading);
        Ok(reading)
    }

    /// Authenticate if no account token is held, then log in
    async fn ensure_logged_in(&mut self) -> Result<(), SessionError> {
        if self.session.account_id().is_none() {
            self.authenticate().await?;
        }
        self.login().await
    }

    async fn fetch_once(&mut self) -> Result<Reading, SessionError> {
        let Some(session_id) = self.session.session_id() else {
            return Err(SessionError::NotAuthenticated);
        };
        let url = protocol::latest_glucose_url(self.share.region, session_id)?;

        debug!("Fetching glucose data...");
        let response = self.exchange(&url, 0, Step::Fetch).await?;
        let now = self.clock.now_ms();
        let reading = match protocol::parse_latest(self.body(&response)) {
            Some(entry) => Reading::new(entry.value, entry.trend, now),
            None => Reading::empty(now),
        };
        Ok(reading)
    }

    /// POST the first `body_len` bytes of the request buffer
    ///
    /// Non-200 statuses become `Rejected` for `step`.
    async fn exchange(
        &mut self,
        url: &str,
        body_len: usize,
        step: Step,
    ) -> Result<HttpResponse, SessionError> {
        let response = match self
            .transport
            .post(url, &self.request[..body_len], &mut self.response)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Network error during {:?}: {:?}", step, e);
                return Err(e.into());
            }
        };

        if !response.is_ok() {
            warn!("{:?} failed: status {}", step, response.status);
            return Err(SessionError::Rejected {
                step,
                status: response.status,
            });
        }
        Ok(response)
    }

    fn body(&self, response: &HttpResponse) -> &[u8] {
        &self.response[..response.len.min(RESPONSE_BUF_LEN)]
    }
}

impl<T: HttpTransport, C: Clock> ReadingSource for SessionClient<T, C> {
    async fn fetch_latest(&mut self) -> Result<Reading, SessionError> {
        SessionClient::fetch_latest(self).await
    }

    fn is_link_up(&self) -> bool {
        self.transport.is_link_up()
    }
}

/// First characters of a token, for logs
fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use crate::traits::TransportError;
    use core::cell::Cell;
    use embassy_futures::block_on;
    use heapless::{String, Vec};

    const ACCOUNT: &str = r#""aaaaaaaa-1111-2222-3333-444444444444""#;
    const SESSION: &str = r#""bbbbbbbb-1111-2222-3333-444444444444""#;
    const LATEST: &str = r#"[{"Value":123,"Trend":"Flat"}]"#;

    type Reply = Result<(u16, &'static str), TransportError>;

    /// Scripted transport recording every URL it is asked for
    struct Script {
        replies: Vec<Reply, 16>,
        calls: Vec<String<256>, 16>,
        link_up: bool,
    }

    impl Script {
        fn new(replies: &[Reply]) -> Self {
            Self {
                replies: replies.iter().rev().copied().collect(),
                calls: Vec::new(),
                link_up: true,
            }
        }

        fn paths(&self) -> std::vec::Vec<&str> {
            self.calls
                .iter()
                .map(|url| {
                    let path = url.split('?').next().unwrap_or("");
                    path.rsplit('/').next().unwrap_or("")
                })
                .collect()
        }
    }

    impl HttpTransport for Script {
        async fn post(
            &mut self,
            url: &str,
            _body: &[u8],
            response: &mut [u8],
        ) -> Result<HttpResponse, TransportError> {
            let _ = self.calls.push(String::try_from(url).unwrap());
            let (status, body) = self.replies.pop().expect("unexpected request")?;
            response[..body.len()].copy_from_slice(body.as_bytes());
            Ok(HttpResponse {
                status,
                len: body.len(),
            })
        }

        fn is_link_up(&self) -> bool {
            self.link_up
        }
    }

    struct FixedClock(Cell<u64>);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    fn share() -> ShareConfig {
        ShareConfig {
            username: String::try_from("user").unwrap(),
            password: String::try_from("secret").unwrap(),
            region: Region::Us,
        }
    }

    fn client(replies: &[Reply]) -> SessionClient<Script, FixedClock> {
        SessionClient::new(Script::new(replies), FixedClock(Cell::new(42)), share())
    }

    #[test]
    fn test_authenticate_then_login() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION))]);
        assert_eq!(c.state(), SessionState::Unauthenticated);

        block_on(c.authenticate()).unwrap();
        assert_eq!(c.state(), SessionState::Authenticated);

        block_on(c.login()).unwrap();
        assert_eq!(c.state(), SessionState::LoggedIn);
        assert_eq!(
            c.session().session_id(),
            Some("bbbbbbbb-1111-2222-3333-444444444444")
        );
    }

    #[test]
    fn test_authenticate_failure_stays_unauthenticated() {
        let mut c = client(&[Ok((500, "")), Err(TransportError::Timeout)]);
        assert_eq!(
            block_on(c.authenticate()),
            Err(SessionError::Rejected {
                step: Step::Authenticate,
                status: 500
            })
        );
        assert_eq!(
            block_on(c.authenticate()),
            Err(SessionError::Transport(TransportError::Timeout))
        );
        assert_eq!(c.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_null_account_is_rejected() {
        let mut c = client(&[Ok((200, r#""00000000-0000-0000-0000-000000000000""#))]);
        assert_eq!(
            block_on(c.authenticate()),
            Err(SessionError::InvalidToken(Step::Authenticate))
        );
        assert_eq!(c.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_login_without_account_makes_no_request() {
        let mut c = client(&[]);
        assert_eq!(block_on(c.login()), Err(SessionError::NotAuthenticated));
        assert!(c.transport().calls.is_empty());
    }

    #[test]
    fn test_login_failure_keeps_account() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((403, "")), Ok((200, SESSION))]);
        block_on(c.authenticate()).unwrap();
        assert!(block_on(c.login()).is_err());
        assert_eq!(c.state(), SessionState::Authenticated);
        block_on(c.login()).unwrap();
        assert_eq!(c.state(), SessionState::LoggedIn);
    }

    #[test]
    fn test_fetch_logs_in_first() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((200, LATEST))]);
        let reading = block_on(c.fetch_latest()).unwrap();

        assert_eq!(reading, Reading::new(Some(123), Some(Trend::Flat), 42));
        assert_eq!(
            c.transport().paths(),
            [
                "AuthenticatePublisherAccount",
                "LoginPublisherAccountById",
                "ReadPublisherLatestGlucoseValues"
            ]
        );
        assert_eq!(c.latest(), Some(&reading));
        assert_eq!(c.latest_value(), Some(123));
        assert_eq!(c.latest_trend(), Some(Trend::Flat));
    }

    #[test]
    fn test_fetch_full_share_entry() {
        let body = r#"[{"WT":"Date(1691455258000)","ST":"Date(1691455258000)","DT":"Date(1691455258000-0400)","Value":187,"Trend":"SingleDown"}]"#;
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((200, body))]);
        let reading = block_on(c.fetch_latest()).unwrap();
        assert_eq!(reading, Reading::new(Some(187), Some(Trend::SingleDown), 42));
        assert_eq!(c.latest_value(), Some(187));
    }

    #[test]
    fn test_fetch_null_trend_keeps_value() {
        let body = r#"[{"WT":"Date(1691455258000)","Value":95,"Trend":null}]"#;
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((200, body))]);
        let reading = block_on(c.fetch_latest()).unwrap();
        assert_eq!(reading.value, Some(95));
        assert_eq!(reading.trend, None);
    }

    #[test]
    fn test_fetch_with_session_goes_straight_to_fetch() {
        let mut c = client(&[
            Ok((200, ACCOUNT)),
            Ok((200, SESSION)),
            Ok((200, LATEST)),
            Ok((200, r#"[{"Value":130,"Trend":"SingleUp"}]"#)),
        ]);
        block_on(c.fetch_latest()).unwrap();
        let second = block_on(c.fetch_latest()).unwrap();
        assert_eq!(second.value, Some(130));
        assert_eq!(c.transport().calls.len(), 4);
    }

    #[test]
    fn test_fetch_with_account_skips_authenticate() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((200, LATEST))]);
        block_on(c.authenticate()).unwrap();
        block_on(c.fetch_latest()).unwrap();
        assert_eq!(
            c.transport().paths(),
            [
                "AuthenticatePublisherAccount",
                "LoginPublisherAccountById",
                "ReadPublisherLatestGlucoseValues"
            ]
        );
    }

    #[test]
    fn test_empty_result_is_no_data() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((200, "[]"))]);
        let reading = block_on(c.fetch_latest()).unwrap();
        assert_eq!(reading, Reading::empty(42));
        assert_eq!(c.latest_value(), None);
    }

    #[test]
    fn test_expired_session_retries_once() {
        let mut c = client(&[
            Ok((200, ACCOUNT)),
            Ok((200, SESSION)),
            Ok((401, "")),
            Ok((200, ACCOUNT)),
            Ok((200, SESSION)),
            Ok((200, LATEST)),
        ]);
        let reading = block_on(c.fetch_latest()).unwrap();
        assert_eq!(reading.value, Some(123));
        assert_eq!(c.transport().calls.len(), 6);
        assert_eq!(c.state(), SessionState::LoggedIn);
    }

    #[test]
    fn test_non_expiry_status_is_not_retried() {
        let mut c = client(&[Ok((200, ACCOUNT)), Ok((200, SESSION)), Ok((404, ""))]);
        assert_eq!(
            block_on(c.fetch_latest()),
            Err(SessionError::Rejected {
                step: Step::Fetch,
                status: 404
            })
        );
        assert_eq!(c.transport().calls.len(), 3);
        assert_eq!(c.state(), SessionState::LoggedIn);
    }

    #[test]
    fn test_transport_error_is_not_retried() {
        let mut c = client(&[
            Ok((200, ACCOUNT)),
            Ok((200, SESSION)),
            Err(TransportError::ConnectionReset),
        ]);
        assert_eq!(
            block_on(c.fetch_latest()),
            Err(SessionError::Transport(TransportError::ConnectionReset))
        );
        assert_eq!(c.transport().calls.len(), 3);
        assert_eq!(c.state(), SessionState::LoggedIn);
        assert_eq!(c.latest(), None);
    }

    #[test]
    fn test_relogin_failure_is_surfaced() {
        let mut c = client(&[
            Ok((200, ACCOUNT)),
            Ok((200, SESSION)),
            Ok((500, "")),
            Ok((401, "")),
        ]);
        assert_eq!(
            block_on(c.fetch_latest()),
            Err(SessionError::Rejected {
                step: Step::Authenticate,
                status: 401
            })
        );
        assert_eq!(c.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_link_state_comes_from_transport() {
        let mut c = client(&[]);
        assert!(ReadingSource::is_link_up(&c));
        c.transport_mut().link_up = false;
        assert!(!ReadingSource::is_link_up(&c));
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("abcdefghijk"), "abcdefgh");
        assert_eq!(token_prefix("abc"), "abc");
    }
}
