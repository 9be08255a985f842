use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::CoreError;
use crate::status::UncertaintyPolicy;

pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/Baskerville42/outage-data-ua/main/data/kyiv.json";
pub const DEFAULT_GROUPS: &str = "GPV12.1,GPV18.1";
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4000;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key lookup used while building a [`Config`]. Empty values count as unset.
struct Source<'a> {
    profile: String,
    get: &'a dyn Fn(&str) -> Option<String>,
}

impl Source<'_> {
    /// Tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            if let Some(v) = (self.get)(&format!("{}_{}", self.profile, key)).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.get)(key).filter(|s| !s.is_empty())
    }

    /// Like [`Source::opt`], but an empty value is returned instead of
    /// falling through.
    fn raw(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            if let Some(v) = (self.get)(&format!("{}_{}", self.profile, key)) {
                return Some(v);
            }
        }
        (self.get)(key)
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, CoreError> {
        match self.opt(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| CoreError::Config(format!("{key}: cannot parse '{raw}'"))),
            None => Ok(default),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub feed: FeedConfig,
    pub schedule: ScheduleConfig,
    pub marker: MarkerConfig,
    pub telegram: TelegramConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SVITLO_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let profile = get("SVITLO_PROFILE").unwrap_or_default().trim().to_uppercase();
        let src = Source { profile, get };
        Ok(Self {
            feed: FeedConfig::from_source(&src)?,
            schedule: ScheduleConfig::from_source(&src)?,
            marker: MarkerConfig::from_source(&src),
            telegram: TelegramConfig::from_source(&src)?,
            profile: src.profile,
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  feed:      url={}, timeout={}s", self.feed.url, self.feed.timeout_secs);
        tracing::info!(
            "  schedule:  groups={}, tz={}, maybe={:?}",
            self.schedule.groups.join(","),
            self.schedule.timezone,
            self.schedule.maybe_policy
        );
        tracing::info!("  marker:    path={}", self.marker.path.display());
        tracing::info!(
            "  telegram:  configured={}, chat={}, max_len={}",
            self.telegram.is_configured(),
            self.telegram.chat_id.as_deref().unwrap_or("(none)"),
            self.telegram.max_message_len
        );
    }
}

// ── Feed ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl FeedConfig {
    fn from_source(src: &Source<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            url: src.or("SVITLO_FEED_URL", DEFAULT_FEED_URL),
            timeout_secs: src.parse("SVITLO_HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

// ── Schedule rendering ────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Groups to report, in output order.
    pub groups: Vec<String>,
    /// Prefix stripped from group ids for display (`GPV12.1` → `12.1`).
    pub group_prefix: String,
    pub timezone: Tz,
    pub maybe_policy: UncertaintyPolicy,
    /// Optional minijinja template replacing the built-in day layout.
    pub template_path: Option<PathBuf>,
}

impl ScheduleConfig {
    fn from_source(src: &Source<'_>) -> Result<Self, CoreError> {
        let timezone = src.or("SVITLO_TIMEZONE", "Europe/Kyiv");
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| CoreError::Config(format!("SVITLO_TIMEZONE: unknown time zone '{timezone}'")))?;

        Ok(Self {
            groups: parse_groups(&src.or("SVITLO_GROUPS", DEFAULT_GROUPS)),
            group_prefix: src.or("SVITLO_GROUP_PREFIX", "GPV"),
            timezone,
            maybe_policy: src.parse("SVITLO_MAYBE_POLICY", UncertaintyPolicy::Optimistic)?,
            template_path: src.opt("SVITLO_TEMPLATE_PATH").map(PathBuf::from),
        })
    }
}

/// Split a comma-separated group list, dropping blanks.
pub fn parse_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

// ── Revision marker ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MarkerConfig {
    pub path: PathBuf,
}

impl MarkerConfig {
    fn from_source(src: &Source<'_>) -> Self {
        Self {
            path: PathBuf::from(src.or("SVITLO_MARKER_PATH", "last_hash.txt")),
        }
    }
}

// ── Telegram ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    /// `None` sends plain text.
    pub parse_mode: Option<String>,
    pub api_base: String,
    pub max_message_len: usize,
}

impl TelegramConfig {
    fn from_source(src: &Source<'_>) -> Result<Self, CoreError> {
        // An explicitly empty TELEGRAM_PARSE_MODE disables the parse mode.
        let parse_mode = match src.raw("TELEGRAM_PARSE_MODE") {
            Some(mode) if mode.trim().is_empty() => None,
            Some(mode) => Some(mode.trim().to_string()),
            None => Some("HTML".to_string()),
        };

        Ok(Self {
            bot_token: src.opt("TELEGRAM_BOT_TOKEN"),
            chat_id: src.opt("TELEGRAM_CHANNEL_ID"),
            parse_mode,
            api_base: src.or("TELEGRAM_API_BASE", "https://api.telegram.org"),
            max_message_len: src.parse("SVITLO_MAX_MESSAGE_LEN", DEFAULT_MAX_MESSAGE_LEN)?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}
