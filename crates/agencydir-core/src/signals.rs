//! Verification signals gathered by scraping a candidate website.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Outcome of fetching a candidate homepage.
///
/// Rendered as `unknown`, `ok`, `http_<code>`, `non_html`, `error` or
/// `missing` in CSV and JSON output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WebsiteStatus {
    /// Never fetched.
    #[default]
    Unknown,
    Ok,
    /// Non-2xx response.
    Http(u16),
    /// 2xx response without an HTML content type.
    NonHtml,
    /// Network failure or timeout.
    Error,
    /// The candidate has no website to fetch.
    Missing,
}

impl WebsiteStatus {
    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, WebsiteStatus::Unknown)
    }

    #[must_use]
    pub fn as_string(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for WebsiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebsiteStatus::Unknown => write!(f, "unknown"),
            WebsiteStatus::Ok => write!(f, "ok"),
            WebsiteStatus::Http(code) => write!(f, "http_{code}"),
            WebsiteStatus::NonHtml => write!(f, "non_html"),
            WebsiteStatus::Error => write!(f, "error"),
            WebsiteStatus::Missing => write!(f, "missing"),
        }
    }
}

impl std::str::FromStr for WebsiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "unknown" => Ok(WebsiteStatus::Unknown),
            "ok" => Ok(WebsiteStatus::Ok),
            "non_html" => Ok(WebsiteStatus::NonHtml),
            "error" => Ok(WebsiteStatus::Error),
            "missing" => Ok(WebsiteStatus::Missing),
            other => other
                .strip_prefix("http_")
                .and_then(|code| code.parse::<u16>().ok())
                .map(WebsiteStatus::Http)
                .ok_or_else(|| format!("unknown website status '{other}'")),
        }
    }
}

impl Serialize for WebsiteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WebsiteStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Boolean evidence flags plus the homepage fetch status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSignals {
    pub website_ok: bool,
    pub website_status: WebsiteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_status_code: Option<u16>,
    pub contact_signal: bool,
    pub about_signal: bool,
    pub automation_signal: bool,
    pub services_signal: bool,
    pub work_signal: bool,
    pub social_signal: bool,
    pub mailto_signal: bool,
    pub email_from_source: bool,
}

impl VerificationSignals {
    /// Signals for a site that could not be verified: every flag is false.
    #[must_use]
    pub fn unreachable(status: WebsiteStatus, email_from_source: bool) -> Self {
        let website_status_code = match status {
            WebsiteStatus::Http(code) => Some(code),
            _ => None,
        };
        Self {
            website_ok: false,
            website_status: status,
            website_status_code,
            email_from_source,
            ..Self::default()
        }
    }

    /// Combine the signals of two fetched pages.
    ///
    /// Boolean flags are OR-ed. `website_status` and `website_status_code`
    /// keep the first non-empty value, with `unknown` counting as empty.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            website_ok: self.website_ok || other.website_ok,
            website_status: if self.website_status.is_unknown() {
                other.website_status
            } else {
                self.website_status
            },
            website_status_code: self.website_status_code.or(other.website_status_code),
            contact_signal: self.contact_signal || other.contact_signal,
            about_signal: self.about_signal || other.about_signal,
            automation_signal: self.automation_signal || other.automation_signal,
            services_signal: self.services_signal || other.services_signal,
            work_signal: self.work_signal || other.work_signal,
            social_signal: self.social_signal || other.social_signal,
            mailto_signal: self.mailto_signal || other.mailto_signal,
            email_from_source: self.email_from_source || other.email_from_source,
        }
    }
}
