//! Share service wire format
//!
//! Three POST exchanges, JSON in and JSON out:
//!
//! 1. `General/AuthenticatePublisherAccount` with application id, account
//!    name and password, answered by a quoted account id
//! 2. `General/LoginPublisherAccountById` with application id, account id
//!    and password, answered by a quoted session id
//! 3. `Publisher/ReadPublisherLatestGlucoseValues?sessionId=..` with an
//!    empty body, answered by an array of entries
//!
//! Entries carry `Value` (mg/dL) and `Trend`, either a trend name or the
//! legacy numeric code. Other fields (`WT`, `ST`, `DT`) are ignored.

use core::fmt::{self, Write as _};
use core::marker::PhantomData;

use heapless::String;
use serde::de::{IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{SessionError, Step};
use crate::config::Region;
use crate::reading::Trend;

/// Application identifier sent with every credential exchange
pub const APPLICATION_ID: &str = "d89443d2-327c-4a6f-89e5-496bbb0317db";

pub const US_BASE_URL: &str = "https://share2.dexcom.com";
pub const OUTSIDE_US_BASE_URL: &str = "https://shareous1.dexcom.com";

pub const AUTHENTICATE_PATH: &str =
    "/ShareWebServices/Services/General/AuthenticatePublisherAccount";
pub const LOGIN_PATH: &str = "/ShareWebServices/Services/General/LoginPublisherAccountById";
pub const LATEST_GLUCOSE_PATH: &str =
    "/ShareWebServices/Services/Publisher/ReadPublisherLatestGlucoseValues";

/// Look-back window and entry count for the latest-value query
pub const FETCH_MINUTES: u16 = 10;
pub const FETCH_MAX_COUNT: u8 = 1;

/// Token the service returns for rejected credentials
pub const NULL_TOKEN: &str = "00000000-0000-0000-0000-000000000000";

/// Fetch statuses that signal an expired session
pub const EXPIRY_STATUSES: [u16; 3] = [401, 403, 500];

pub const MAX_URL_LEN: usize = 256;
pub const MAX_TOKEN_LEN: usize = 64;
pub const REQUEST_BUF_LEN: usize = 256;
pub const RESPONSE_BUF_LEN: usize = 1024;

pub type Url = String<MAX_URL_LEN>;
pub type Token = String<MAX_TOKEN_LEN>;

pub const fn base_url(region: Region) -> &'static str {
    match region {
        Region::Us => US_BASE_URL,
        Region::OutsideUs => OUTSIDE_US_BASE_URL,
    }
}

pub fn is_expiry_status(status: u16) -> bool {
    EXPIRY_STATUSES.contains(&status)
}

/// Full URL of a credential endpoint
pub fn endpoint(region: Region, path: &str) -> Result<Url, SessionError> {
    let mut url = Url::new();
    write!(url, "{}{}", base_url(region), path).map_err(|_| SessionError::RequestTooLarge)?;
    Ok(url)
}

/// Full URL of the latest-glucose query
pub fn latest_glucose_url(region: Region, session_id: &str) -> Result<Url, SessionError> {
    let mut url = Url::new();
    write!(
        url,
        "{}{}?sessionId={}&minutes={}&maxCount={}",
        base_url(region),
        LATEST_GLUCOSE_PATH,
        session_id,
        FETCH_MINUTES,
        FETCH_MAX_COUNT
    )
    .map_err(|_| SessionError::RequestTooLarge)?;
    Ok(url)
}

/// Step 1 body
#[derive(Debug, Serialize)]
pub struct AuthenticateRequest<'a> {
    #[serde(rename = "applicationId")]
    pub application_id: &'a str,
    #[serde(rename = "accountName")]
    pub account_name: &'a str,
    pub password: &'a str,
}

/// Step 2 body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "applicationId")]
    pub application_id: &'a str,
    #[serde(rename = "accountId")]
    pub account_id: &'a str,
    pub password: &'a str,
}

/// Serialize a request body into `buf`, returning the used length
pub fn encode_request<T: Serialize>(request: &T, buf: &mut [u8]) -> Result<usize, SessionError> {
    serde_json_core::to_slice(request, buf).map_err(|_| SessionError::RequestTooLarge)
}

/// Parse a quoted token from a step 1 or step 2 response
pub fn parse_token(body: &[u8], step: Step) -> Result<Token, SessionError> {
    let (token, _): (Token, usize) =
        serde_json_core::from_slice(body).map_err(|_| SessionError::InvalidToken(step))?;
    if token.is_empty() || token.as_str() == NULL_TOKEN {
        return Err(SessionError::InvalidToken(step));
    }
    Ok(token)
}

/// Latest-value entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestEntry {
    pub value: Option<u16>,
    pub trend: Option<Trend>,
}

/// Parse a step 3 response
///
/// Empty bodies, empty arrays and malformed JSON all mean "no data".
/// The live service sends trend names; older firmware sent the numeric
/// code, so a body that does not parse with a named trend is retried with
/// a numeric one.
pub fn parse_latest(body: &[u8]) -> Option<LatestEntry> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    if let Ok((FirstEntry(entry), _)) = serde_json_core::from_slice::<FirstEntry<&str>>(body) {
        return entry.map(|e| LatestEntry {
            value: e.value,
            trend: e.trend.and_then(Trend::from_name),
        });
    }
    match serde_json_core::from_slice::<FirstEntry<u8>>(body) {
        Ok((FirstEntry(entry), _)) => entry.map(|e| LatestEntry {
            value: e.value,
            trend: e.trend.and_then(|code| Trend::from_code(u64::from(code))),
        }),
        Err(_) => None,
    }
}

/// One array element; `T` is the wire type of `Trend`
#[derive(Deserialize)]
struct WireEntry<T> {
    #[serde(rename = "Value", default)]
    value: Option<u16>,
    #[serde(rename = "Trend", default = "no_trend")]
    trend: Option<T>,
}

fn no_trend<T>() -> Option<T> {
    None
}

/// First element of the entry array; the rest is skipped
struct FirstEntry<T>(Option<WireEntry<T>>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FirstEntry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FirstVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for FirstVisitor<T> {
            type Value = FirstEntry<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of glucose entries")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FirstEntry<T>, A::Error> {
                let first = seq.next_element::<WireEntry<T>>()?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(FirstEntry(first))
            }
        }

        deserializer.deserialize_seq(FirstVisitor(PhantomData))
    }
}
