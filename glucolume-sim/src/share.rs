//! In-process Share service
//!
//! Answers the three protocol endpoints the way the real service does,
//! with a random-walk glucose trace and periodic session expiry.

use std::fmt::Write as _;

use embassy_time::Timer;
use glucolume_core::session::protocol::{AUTHENTICATE_PATH, LATEST_GLUCOSE_PATH, LOGIN_PATH};
use glucolume_core::traits::{HttpResponse, HttpTransport, TransportError};
use glucolume_core::Trend;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimSettings;

const ACCOUNT_ID: &str = "5e1f9c2a-0d4b-4c8e-9a3f-1b2c3d4e5f60";

/// Queries between new sensor values
const QUERIES_PER_VALUE: u32 = 2;

const LOW_LIMIT: u16 = 40;
const HIGH_LIMIT: u16 = 400;

pub struct LocalShare {
    settings: SimSettings,
    latency_ms: u64,
    session: Option<String>,
    logins: u32,
    queries: u32,
    value: u16,
    trend: Trend,
    rng: StdRng,
}

impl LocalShare {
    pub fn new(settings: SimSettings, latency_ms: u64) -> Self {
        let value = settings.start_value.clamp(LOW_LIMIT, HIGH_LIMIT);
        let rng = StdRng::seed_from_u64(settings.seed);
        Self {
            settings,
            latency_ms,
            session: None,
            logins: 0,
            queries: 0,
            value,
            trend: Trend::Flat,
            rng,
        }
    }

    pub fn logins(&self) -> u32 {
        self.logins
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    fn advance(&mut self) {
        let span = i32::from(self.settings.step);
        let delta = self.rng.gen_range(-span..=span);
        let next = (i32::from(self.value) + delta)
            .clamp(i32::from(LOW_LIMIT), i32::from(HIGH_LIMIT));
        self.trend = trend_for_delta(next - i32::from(self.value));
        self.value = next as u16;
    }

    fn login(&mut self) -> String {
        self.logins += 1;
        let id = format!("0b5e55ed-0000-4000-8000-{:012x}", self.logins);
        self.session = Some(id.clone());
        format!("\"{}\"", id)
    }

    fn latest(&mut self, url: &str) -> (u16, String) {
        let session_id = url
            .split_once("sessionId=")
            .map(|(_, rest)| rest.split('&').next().unwrap_or(""));
        if session_id.is_none() || session_id != self.session.as_deref() {
            return (500, r#"{"Code":"SessionIdNotFound"}"#.to_string());
        }

        self.queries += 1;
        let expire_every = self.settings.expire_every;
        if expire_every > 0 && self.queries % expire_every == 0 {
            debug!("Local Share: expiring session");
            self.session = None;
            return (401, String::new());
        }

        if self.queries % QUERIES_PER_VALUE == 0 {
            self.advance();
        }
        let mut body = String::new();
        let _ = write!(
            body,
            r#"[{{"Value":{},"Trend":"{}"}}]"#,
            self.value,
            self.trend.name()
        );
        (200, body)
    }

    fn answer(&mut self, url: &str) -> (u16, String) {
        let path = url
            .split('?')
            .next()
            .and_then(|u| u.find("/ShareWebServices").map(|at| &u[at..]))
            .unwrap_or("");
        match path {
            AUTHENTICATE_PATH => (200, format!("\"{}\"", ACCOUNT_ID)),
            LOGIN_PATH => (200, self.login()),
            LATEST_GLUCOSE_PATH => self.latest(url),
            _ => (404, String::new()),
        }
    }
}

impl HttpTransport for LocalShare {
    async fn post(
        &mut self,
        url: &str,
        _body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, TransportError> {
        if self.latency_ms > 0 {
            Timer::after_millis(self.latency_ms).await;
        }
        let (status, body) = self.answer(url);
        let out = response
            .get_mut(..body.len())
            .ok_or(TransportError::BufferOverflow)?;
        out.copy_from_slice(body.as_bytes());
        Ok(HttpResponse {
            status,
            len: body.len(),
        })
    }
}

fn trend_for_delta(delta: i32) -> Trend {
    match delta {
        d if d >= 6 => Trend::DoubleUp,
        4..=5 => Trend::SingleUp,
        2..=3 => Trend::FortyFiveUp,
        -1..=1 => Trend::Flat,
        -3..=-2 => Trend::FortyFiveDown,
        -5..=-4 => Trend::SingleDown,
        _ => Trend::DoubleDown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use glucolume_core::config::ShareConfig;
    use glucolume_core::session::{SessionClient, SessionState};
    use glucolume_core::traits::Clock;

    struct Zero;

    impl Clock for Zero {
        fn now_ms(&self) -> u64 {
            0
        }
    }

    fn share_config() -> ShareConfig {
        let mut share = ShareConfig::default();
        let _ = share.username.push_str("demo");
        let _ = share.password.push_str("demo");
        share
    }

    fn settings(expire_every: u32) -> SimSettings {
        SimSettings {
            expire_every,
            ..SimSettings::default()
        }
    }

    #[test]
    fn test_trend_for_delta() {
        assert_eq!(trend_for_delta(0), Trend::Flat);
        assert_eq!(trend_for_delta(3), Trend::FortyFiveUp);
        assert_eq!(trend_for_delta(7), Trend::DoubleUp);
        assert_eq!(trend_for_delta(-4), Trend::SingleDown);
        assert_eq!(trend_for_delta(-9), Trend::DoubleDown);
    }

    #[test]
    fn test_client_reads_local_service() {
        let mut client = SessionClient::new(LocalShare::new(settings(0), 0), Zero, share_config());
        let reading = block_on(client.fetch_latest()).unwrap();
        assert_eq!(reading.value, Some(120));
        assert_eq!(reading.trend, Some(Trend::Flat));
        assert_eq!(client.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_expiry_forces_relogin() {
        let mut client = SessionClient::new(LocalShare::new(settings(2), 0), Zero, share_config());
        block_on(client.fetch_latest()).unwrap();
        // Second query expires; the client logs in again and succeeds
        let reading = block_on(client.fetch_latest()).unwrap();
        assert_eq!(client.transport().logins(), 2);
        assert_eq!(reading.value, Some(client.transport().value()));
    }

    #[test]
    fn test_unknown_session_is_rejected() {
        let mut share = LocalShare::new(settings(0), 0);
        let (status, _) = share.answer("https://share2.dexcom.com/ShareWebServices/Services/Publisher/ReadPublisherLatestGlucoseValues?sessionId=nope&minutes=10&maxCount=1");
        assert_eq!(status, 500);
    }

    #[test]
    fn test_small_buffer_overflows() {
        let mut share = LocalShare::new(settings(0), 0);
        let mut buf = [0u8; 4];
        let url = "https://share2.dexcom.com/ShareWebServices/Services/General/AuthenticatePublisherAccount";
        assert_eq!(
            block_on(share.post(url, b"{}", &mut buf)),
            Err(TransportError::BufferOverflow)
        );
    }

    #[test]
    fn test_same_seed_same_trace() {
        let mut a = LocalShare::new(settings(0), 0);
        let mut b = LocalShare::new(settings(0), 0);
        for _ in 0..50 {
            a.advance();
            b.advance();
            assert_eq!(a.value(), b.value());
        }
    }

    #[test]
    fn test_walk_stays_in_range() {
        let mut share = LocalShare::new(
            SimSettings {
                start_value: 395,
                step: 50,
                ..SimSettings::default()
            },
            0,
        );
        for _ in 0..500 {
            share.advance();
            assert!((LOW_LIMIT..=HIGH_LIMIT).contains(&share.value()));
        }
    }
}
