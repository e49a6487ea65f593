//! Check results and their serialized record form.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Which prober produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CheckKind {
    #[serde(alias = "certificate")]
    Certificate,
    #[serde(alias = "domain")]
    Domain,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Certificate => f.write_str("Certificate"),
            CheckKind::Domain => f.write_str("Domain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Expires {
        expires_at: OffsetDateTime,
        days_remaining: i64,
    },
    Failed {
        error: String,
    },
}

/// The outcome of probing one target.
///
/// Either carries an expiry instant with its remaining days, or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    kind: CheckKind,
    host: String,
    port: i32,
    outcome: Outcome,
    elapsed_millis: u64,
}

impl CheckResult {
    /// Successful probe. `days_remaining` is derived from `now`.
    pub fn expires(
        kind: CheckKind,
        host: impl Into<String>,
        port: i32,
        expires_at: OffsetDateTime,
        now: OffsetDateTime,
        elapsed_millis: u64,
    ) -> Self {
        let expires_at = expires_at.to_offset(time::UtcOffset::UTC);
        Self {
            kind,
            host: host.into(),
            port,
            outcome: Outcome::Expires {
                expires_at,
                days_remaining: days_remaining(expires_at, now),
            },
            elapsed_millis,
        }
    }

    pub fn failed(
        kind: CheckKind,
        host: impl Into<String>,
        port: i32,
        error: impl Into<String>,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            kind,
            host: host.into(),
            port,
            outcome: Outcome::Failed {
                error: error.into(),
            },
            elapsed_millis,
        }
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn ok(&self) -> bool {
        matches!(self.outcome, Outcome::Expires { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { error } => Some(error),
            Outcome::Expires { .. } => None,
        }
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        match self.outcome {
            Outcome::Expires { expires_at, .. } => Some(expires_at),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn days_remaining(&self) -> Option<i64> {
        match self.outcome {
            Outcome::Expires { days_remaining, .. } => Some(days_remaining),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }
}

/// Whole days between `now` and `expires_at`, truncated toward zero.
///
/// Negative once the instant is more than a day in the past.
pub fn days_remaining(expires_at: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (expires_at - now).whole_days()
}

/// Wire form of a [`CheckResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    #[serde(rename = "type")]
    pub kind: CheckKind,
    pub host: String,
    pub port: i32,
    pub ok: bool,
    pub error: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub expires_at: Option<OffsetDateTime>,
    pub days_remaining: Option<i64>,
    pub elapsed_millis: u64,
}

impl From<&CheckResult> for CheckRecord {
    fn from(r: &CheckResult) -> Self {
        Self {
            kind: r.kind,
            host: r.host.clone(),
            port: r.port,
            ok: r.ok(),
            error: r.error().map(str::to_string),
            expires_at: r.expires_at(),
            days_remaining: r.days_remaining(),
            elapsed_millis: r.elapsed_millis,
        }
    }
}

impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CheckRecord::from(self).serialize(serializer)
    }
}
