//! Browser-identifying header profiles.
//!
//! Requests present one of several real browser fingerprints, picked at
//! random per call, so upstream traffic does not share a single signature.

use rand::seq::IndexedRandom;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// One consistent set of browser headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProfile {
    pub user_agent: &'static str,
    pub accept_language: &'static str,
    pub sec_ch_ua: Option<&'static str>,
    pub platform: Option<&'static str>,
}

pub const PROFILES: &[HeaderProfile] = &[
    HeaderProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        accept_language: "en-IN,en-GB;q=0.9,en-US;q=0.8,en;q=0.7",
        sec_ch_ua: Some(r#""Chromium";v="124", "Google Chrome";v="124", "Not-A.Brand";v="99""#),
        platform: Some(r#""Windows""#),
    },
    HeaderProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        accept_language: "en-US,en;q=0.9",
        sec_ch_ua: Some(r#""Google Chrome";v="123", "Not:A-Brand";v="8", "Chromium";v="123""#),
        platform: Some(r#""macOS""#),
    },
    HeaderProfile {
        user_agent: "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Mobile Safari/537.36",
        accept_language: "en-IN,hi;q=0.9,en;q=0.8",
        sec_ch_ua: Some(r#""Chromium";v="122", "Not(A:Brand";v="24", "Google Chrome";v="122""#),
        platform: Some(r#""Android""#),
    },
    HeaderProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
        accept_language: "en-GB,en;q=0.5",
        sec_ch_ua: None,
        platform: None,
    },
    HeaderProfile {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
        accept_language: "en-IN,en;q=0.9",
        sec_ch_ua: None,
        platform: None,
    },
];

impl HeaderProfile {
    /// Pick a profile uniformly at random.
    pub fn random() -> &'static HeaderProfile {
        // PROFILES is a non-empty constant.
        PROFILES.choose(&mut rand::rng()).unwrap_or(&PROFILES[0])
    }

    /// The profile as request headers.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.accept_language),
        );
        if let Some(ua) = self.sec_ch_ua {
            headers.insert(
                HeaderName::from_static("sec-ch-ua"),
                HeaderValue::from_static(ua),
            );
        }
        if let Some(platform) = self.platform {
            headers.insert(
                HeaderName::from_static("sec-ch-ua-platform"),
                HeaderValue::from_static(platform),
            );
        }
        headers
    }
}
