use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{MessageSettings, SourceKind};
use crate::error::{NotifyError, NotifyResult};
use crate::message::content::{Message, SubjectLine};

/// What a file source does when its file does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingSourcePolicy {
    /// Send the configured fallback text
    #[default]
    Fallback,
    /// Report the invocation as failed
    Fail,
}

/// Produces the message for one invocation
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(&self) -> NotifyResult<Message>;
}

/// Reads the body from a text file on every fetch
///
/// A missing file is an error unless a non-blank fallback text is set.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    subject: SubjectLine,
    fallback_text: Option<String>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, subject: SubjectLine) -> Self {
        Self {
            path: path.into(),
            subject,
            fallback_text: None,
        }
    }

    /// Send `text` when the file does not exist; blank text is ignored
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.fallback_text = (!text.trim().is_empty()).then_some(text);
        self
    }

    fn unavailable(&self, source: std::io::Error) -> NotifyError {
        NotifyError::SourceUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl MessageSource for FileSource {
    async fn fetch(&self) -> NotifyResult<Message> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
            Err(e) if e.kind() == ErrorKind::NotFound => match &self.fallback_text {
                Some(text) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "Message file not found, sending fallback text"
                    );
                    text.clone()
                }
                None => return Err(self.unavailable(e)),
            },
            Err(e) => return Err(self.unavailable(e)),
        };

        tracing::debug!(path = %self.path.display(), bytes = body.len(), "Message read");
        Ok(Message::new(self.subject.render_now(), body))
    }
}

/// Always yields the same body
#[derive(Debug, Clone)]
pub struct ConstantSource {
    body: String,
    subject: SubjectLine,
}

impl ConstantSource {
    pub fn new(body: impl Into<String>, subject: SubjectLine) -> Self {
        Self {
            body: body.into(),
            subject,
        }
    }
}

#[async_trait]
impl MessageSource for ConstantSource {
    async fn fetch(&self) -> NotifyResult<Message> {
        Ok(Message::new(self.subject.render_now(), self.body.clone()))
    }
}

/// Build the source described by the `[message]` settings
pub fn from_settings(settings: &MessageSettings) -> NotifyResult<Arc<dyn MessageSource>> {
    let subject = SubjectLine::new(settings.subject.clone(), settings.subject_with_date);

    match settings.source {
        SourceKind::File => {
            let source = FileSource::new(settings.resolved_path(), subject);
            match settings.on_missing {
                MissingSourcePolicy::Fail => Ok(Arc::new(source)),
                MissingSourcePolicy::Fallback if settings.fallback_text.trim().is_empty() => {
                    Err(NotifyError::validation(
                        "message.fallback_text",
                        "Fallback text cannot be empty when on_missing is \"fallback\"",
                    ))
                }
                MissingSourcePolicy::Fallback => {
                    Ok(Arc::new(source.with_fallback(settings.fallback_text.clone())))
                }
            }
        }
        SourceKind::Constant => {
            let text = settings
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| NotifyError::missing(["message.text"]))?;
            Ok(Arc::new(ConstantSource::new(text, subject)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FALLBACK: &str = "Your Northstar update is ready!";

    fn subject() -> SubjectLine {
        SubjectLine::new("Northstar Update", false)
    }

    #[tokio::test]
    async fn test_file_source_trims_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, "\n  Stretch and hydrate  \n\n").unwrap();

        let message = FileSource::new(&path, subject()).fetch().await.unwrap();
        assert_eq!(message.body(), "Stretch and hydrate");
        assert_eq!(message.subject(), "Northstar Update");
    }

    #[tokio::test]
    async fn test_file_source_reads_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, b"ok \xFF done").unwrap();

        let message = FileSource::new(&path, subject()).fetch().await.unwrap();
        assert_eq!(message.body(), "ok \u{FFFD} done");
    }

    #[tokio::test]
    async fn test_missing_file_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("absent.txt"), subject())
            .with_fallback(FALLBACK);

        let message = source.fetch().await.unwrap();
        assert_eq!(message.body(), FALLBACK);
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_fallback() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("absent.txt"), subject());

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, NotifyError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_blank_fallback_never_sends_empty_body() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("absent.txt"), subject()).with_fallback("  \n");

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, NotifyError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_from_settings_rejects_blank_fallback() {
        let settings = MessageSettings {
            fallback_text: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            from_settings(&settings),
            Err(NotifyError::Validation { ref field, .. }) if field == "message.fallback_text"
        ));
    }

    #[tokio::test]
    async fn test_directory_is_unavailable_even_with_fallback() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path(), subject()).with_fallback(FALLBACK);

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, NotifyError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_constant_source() {
        let source = ConstantSource::new("Hello from Northstar", subject());
        let message = source.fetch().await.unwrap();
        assert_eq!(message.body(), "Hello from Northstar");
    }

    #[tokio::test]
    async fn test_from_settings_resolves_base_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notification.txt"), "bundled").unwrap();

        let settings = MessageSettings {
            base_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let message = from_settings(&settings).unwrap().fetch().await.unwrap();
        assert_eq!(message.body(), "bundled");
    }

    #[tokio::test]
    async fn test_from_settings_default_policy_is_fallback() {
        let dir = TempDir::new().unwrap();
        let settings = MessageSettings {
            base_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let message = from_settings(&settings).unwrap().fetch().await.unwrap();
        assert_eq!(message.body(), FALLBACK);
    }

    #[test]
    fn test_from_settings_constant_requires_text() {
        let settings = MessageSettings {
            source: SourceKind::Constant,
            ..Default::default()
        };
        assert!(matches!(
            from_settings(&settings),
            Err(NotifyError::ConfigurationMissing { .. })
        ));
    }
}
