//! Configuration settings structures for northstar-notify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::channels::ChannelKind;
use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::message::MissingSourcePolicy;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "northstar-notify".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/northstar.log".to_string()
}

fn default_console_format() -> String {
    "full".to_string()
}

fn default_file_format() -> String {
    "json".to_string()
}

fn default_message_path() -> String {
    "notification.txt".to_string()
}

fn default_fallback_text() -> String {
    "Your Northstar update is ready!".to_string()
}

fn default_subject() -> String {
    "Northstar Update".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_push_title() -> String {
    "Northstar".to_string()
}

fn default_push_sound() -> String {
    "default".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3000 // APNs rejects provider tokens older than one hour
}

fn default_window_start() -> u8 {
    9
}

fn default_window_end() -> u8 {
    21
}

fn default_interval_secs() -> u64 {
    2 * 60 * 60
}

fn default_function_name() -> String {
    "northstar-push-notifications".to_string()
}

fn default_trigger_region() -> String {
    "us-east-2".to_string()
}

/// APNs production gateway
pub const APNS_PRODUCTION_URL: &str = "https://api.push.apple.com";

/// APNs development gateway
pub const APNS_SANDBOX_URL: &str = "https://api.sandbox.push.apple.com";

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP host for the triggered invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Message Source Configuration
// ============================================================================

/// Where the message body comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Read from `message.path` on every invocation
    #[default]
    File,
    /// Always send `message.text`
    Constant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSettings {
    #[serde(default)]
    pub source: SourceKind,

    /// Message file; relative paths are resolved against `base_dir`
    #[serde(default = "default_message_path")]
    pub path: String,

    /// Directory that relative message paths are resolved against
    #[serde(default)]
    pub base_dir: Option<String>,

    /// Literal body for the constant source
    #[serde(default)]
    pub text: Option<String>,

    /// What to do when the message file does not exist
    #[serde(default)]
    pub on_missing: MissingSourcePolicy,

    /// Body substituted under the `fallback` policy
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,

    #[serde(default = "default_subject")]
    pub subject: String,

    /// Append the current local date to the subject ("TODO 2024-06-19")
    #[serde(default)]
    pub subject_with_date: bool,
}

impl MessageSettings {
    /// Message path after applying `base_dir`
    pub fn resolved_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.path);
        match &self.base_dir {
            Some(dir) if path.is_relative() && !dir.is_empty() => PathBuf::from(dir).join(path),
            _ => path,
        }
    }
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            path: default_message_path(),
            base_dir: None,
            text: None,
            on_missing: MissingSourcePolicy::default(),
            fallback_text: default_fallback_text(),
            subject: default_subject(),
            subject_with_date: false,
        }
    }
}

// ============================================================================
// Channel Configuration
// ============================================================================

/// SMTP relay settings (STARTTLS submission)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login name; the sender address is used when empty
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub recipient: String,

    /// Fold the message to ASCII before sending
    #[serde(default = "default_true")]
    pub ascii_only: bool,

    /// Connection security; `none` is only meant for local relays
    #[serde(default)]
    pub tls: SmtpTls,
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Upgrade a plain connection with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Plain text, no encryption
    None,
}

impl SmtpConfig {
    /// Login name actually presented to the relay
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.sender
        } else {
            &self.username
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipient: String::new(),
            ascii_only: true,
            tls: SmtpTls::default(),
        }
    }
}

/// Transactional email (AWS SES)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SesConfig {
    /// Verified sender identity
    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub recipient: String,

    /// AWS region; the SDK default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
}

/// SMS via AWS SNS direct publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SnsConfig {
    /// E.164 phone number, e.g. +12025550123
    #[serde(default)]
    pub phone_number: String,

    #[serde(default)]
    pub region: Option<String>,
}

/// Apple Push Notification service with token-based authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsConfig {
    #[serde(default)]
    pub key_id: String,

    #[serde(default)]
    pub team_id: String,

    /// Sent as `apns-topic`
    #[serde(default)]
    pub bundle_id: String,

    /// PKCS#8 PEM of the signing key (inline)
    #[serde(default)]
    pub private_key: String,

    /// PKCS#8 PEM of the signing key (file), used when `private_key` is empty
    #[serde(default)]
    pub private_key_path: Option<String>,

    #[serde(default)]
    pub device_token: String,

    /// Use the development gateway
    #[serde(default)]
    pub sandbox: bool,

    /// Explicit gateway URL, overrides `sandbox`
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_push_title")]
    pub title: String,

    #[serde(default = "default_push_sound")]
    pub sound: String,

    /// Seconds a signed provider token is reused before re-signing
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl ApnsConfig {
    /// Gateway base URL without trailing slash
    pub fn base_url(&self) -> String {
        let url = match &self.endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint.as_str(),
            _ if self.sandbox => APNS_SANDBOX_URL,
            _ => APNS_PRODUCTION_URL,
        };
        url.trim_end_matches('/').to_string()
    }

    /// Whether a signing key is configured inline or by path
    pub fn has_private_key(&self) -> bool {
        !self.private_key.trim().is_empty()
            || self
                .private_key_path
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
    }
}

impl Default for ApnsConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            team_id: String::new(),
            bundle_id: String::new(),
            private_key: String::new(),
            private_key_path: None,
            device_token: String::new(),
            sandbox: false,
            endpoint: None,
            title: default_push_title(),
            sound: default_push_sound(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

/// Active channel plus per-provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChannelSettings {
    #[serde(default)]
    pub kind: ChannelKind,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub ses: SesConfig,

    #[serde(default)]
    pub sns: SnsConfig,

    #[serde(default)]
    pub apns: ApnsConfig,
}

// ============================================================================
// Schedule Configuration
// ============================================================================

/// Delivery window and pacing for the polling invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First local hour (inclusive) in which sending is allowed
    #[serde(default = "default_window_start")]
    pub start_hour: u8,

    /// Local hour (exclusive) at which sending stops
    #[serde(default = "default_window_end")]
    pub end_hour: u8,

    /// Pause between sends inside the window
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_hour: default_window_start(),
            end_hour: default_window_end(),
            interval_secs: default_interval_secs(),
        }
    }
}

// ============================================================================
// Trigger Configuration
// ============================================================================

/// Remote function invoked by `northstar-notify trigger`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default = "default_function_name")]
    pub function_name: String,

    #[serde(default = "default_trigger_region")]
    pub region: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            function_name: default_function_name(),
            region: default_trigger_region(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,

    /// "full", "compact", or "json"
    #[serde(default = "default_console_format")]
    pub format: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
            format: default_console_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact", or "json"
    #[serde(default = "default_file_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: default_file_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// "trace", "debug", "info", "warn", "error", or an EnvFilter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_format = parse_format("logger.console.format", &self.console.format)?;
        let file_format = parse_format("logger.file.format", &self.file.format)?;

        let console = ConsoleConfig {
            enabled: self.console.enabled,
            colored: self.console.colored,
            format: console_format,
        };
        let file = FileConfig {
            enabled: self.file.enabled,
            path: PathBuf::from(self.file.path),
            append: self.file.append,
            format: file_format,
        };

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_format(field: &str, value: &str) -> Result<LogFormat, ConfigError> {
    value
        .parse::<LogFormat>()
        .map_err(|e| ConfigError::ValidationError {
            field: field.to_string(),
            message: e.to_string(),
        })
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub message: MessageSettings,

    #[serde(default)]
    pub channel: ChannelSettings,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_match_original_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.message.fallback_text, "Your Northstar update is ready!");
        assert_eq!(settings.message.subject, "Northstar Update");
        assert_eq!(settings.channel.smtp.host, "smtp.gmail.com");
        assert_eq!(settings.channel.smtp.port, 587);
        assert_eq!(settings.schedule.start_hour, 9);
        assert_eq!(settings.schedule.end_hour, 21);
        assert_eq!(settings.schedule.interval_secs, 7200);
        assert_eq!(settings.trigger.function_name, "northstar-push-notifications");
        assert_eq!(settings.trigger.region, "us-east-2");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = parse(
            r#"
            [channel]
            kind = "apns"

            [channel.apns]
            key_id = "ABC123DEFG"
            sandbox = true
            "#,
        );
        assert_eq!(settings.channel.kind, ChannelKind::Apns);
        assert_eq!(settings.channel.apns.key_id, "ABC123DEFG");
        assert_eq!(settings.channel.apns.title, "Northstar");
        assert_eq!(settings.channel.apns.token_ttl_secs, 3000);
        assert_eq!(settings.channel.apns.base_url(), APNS_SANDBOX_URL);
    }

    #[test]
    fn test_apns_endpoint_override_wins() {
        let apns = ApnsConfig {
            endpoint: Some("http://127.0.0.1:8080/".to_string()),
            sandbox: true,
            ..Default::default()
        };
        assert_eq!(apns.base_url(), "http://127.0.0.1:8080");
        assert_eq!(ApnsConfig::default().base_url(), APNS_PRODUCTION_URL);
    }

    #[test]
    fn test_apns_private_key_by_path_counts() {
        let mut apns = ApnsConfig::default();
        assert!(!apns.has_private_key());
        apns.private_key_path = Some("/secrets/AuthKey.p8".to_string());
        assert!(apns.has_private_key());
    }

    #[test]
    fn test_smtp_login_falls_back_to_sender() {
        let mut smtp = SmtpConfig {
            sender: "me@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(smtp.login(), "me@example.com");
        smtp.username = "relay-user".to_string();
        assert_eq!(smtp.login(), "relay-user");
    }

    #[test]
    fn test_resolved_path_uses_base_dir_for_relative_paths() {
        let mut message = MessageSettings {
            base_dir: Some("/var/task".to_string()),
            ..Default::default()
        };
        assert_eq!(message.resolved_path(), PathBuf::from("/var/task/notification.txt"));

        message.path = "/etc/northstar/todo.txt".to_string();
        assert_eq!(message.resolved_path(), PathBuf::from("/etc/northstar/todo.txt"));
    }

    #[test]
    fn test_message_policy_parses() {
        let settings = parse(
            r#"
            [message]
            source = "constant"
            text = "hello"
            on_missing = "fail"
            "#,
        );
        assert_eq!(settings.message.source, SourceKind::Constant);
        assert_eq!(settings.message.on_missing, MissingSourcePolicy::Fail);
    }

    #[test]
    fn test_logger_settings_convert() {
        let logger = LoggerSettings {
            console: ConsoleSettings {
                format: "json".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = logger.into_logger_config().unwrap();
        assert_eq!(config.console.format, LogFormat::Json);
        assert_eq!(config.file.format, LogFormat::Json);
    }

    #[test]
    fn test_logger_settings_reject_bad_format() {
        let logger = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(logger.into_logger_config().is_err());
    }
}
