//! Remote speech-to-text.
//!
//! The collaborator returns a full transcript plus a word list where each
//! entry is tagged `word`, `spacing`, or `audio_event`. The raw response is
//! persisted unchanged as `transcr.json`; parsing into [`Transcript`]
//! happens when the scenes stage reads it back.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use talereel_common::config::ServicesConfig;
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_common::retry::RetryPolicy;
use talereel_project_model::project::ProjectLayout;
use talereel_project_model::transcript::Transcript;

const SERVICE: &str = "speech-to-text";

/// Speech-to-text collaborator.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio file, returning the raw response document.
    async fn transcribe(&self, audio: &Path) -> TalereelResult<serde_json::Value>;

    /// Collaborator name for logs.
    fn name(&self) -> &str;
}

/// ElevenLabs-compatible `/speech-to-text` client.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ElevenLabsClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> TalereelResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TalereelError::external(SERVICE, format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from service settings, reading the key from the environment.
    pub fn from_config(config: &ServicesConfig) -> TalereelResult<Self> {
        Self::new(
            config.speech_api_key()?,
            config.speech_base_url.clone(),
            config.speech_model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/speech-to-text", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechToText for ElevenLabsClient {
    async fn transcribe(&self, audio: &Path) -> TalereelResult<serde_json::Value> {
        let bytes = tokio::fs::read(audio).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TalereelError::missing_input(audio)
            } else {
                TalereelError::Io(e)
            }
        })?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| TalereelError::external(SERVICE, e.to_string()))?;
        let form = Form::new()
            .text("model_id", self.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint())
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TalereelError::external(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no response body>".to_string());
            return Err(TalereelError::external(
                SERVICE,
                format!("API error ({status}): {error_text}"),
            ));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TalereelError::external(SERVICE, format!("invalid response: {e}")))
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}

/// What the transcription stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscribeOutcome {
    /// `transcr.json` already existed; nothing was sent.
    Cached,
    /// A new transcript was written.
    Transcribed { words: usize, spoken: usize },
}

/// Transcribe the project's narration unless a transcript already exists.
pub async fn transcribe_project(
    layout: &ProjectLayout,
    stt: &dyn SpeechToText,
    retry: &RetryPolicy,
) -> TalereelResult<TranscribeOutcome> {
    let out_path = layout.transcript();
    if out_path.exists() {
        tracing::info!(path = %out_path.display(), "Transcript exists, skipping transcription");
        return Ok(TranscribeOutcome::Cached);
    }

    let audio_path = layout.audio();
    if !audio_path.is_file() {
        return Err(TalereelError::missing_input(audio_path));
    }

    tracing::info!(
        path = %audio_path.display(),
        collaborator = stt.name(),
        "Starting transcription"
    );
    let audio = audio_path.as_path();
    let raw = retry.run(SERVICE, move || stt.transcribe(audio)).await?;

    let transcript: Transcript = serde_json::from_value(raw.clone())
        .map_err(|e| TalereelError::external(SERVICE, format!("unexpected response shape: {e}")))?;

    std::fs::write(&out_path, serde_json::to_string_pretty(&raw)?)?;

    let outcome = TranscribeOutcome::Transcribed {
        words: transcript.words.len(),
        spoken: transcript.spoken_word_count(),
    };
    tracing::info!(
        path = %out_path.display(),
        words = transcript.words.len(),
        spoken = transcript.spoken_word_count(),
        "Transcript saved"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `fail_first` calls, then returns a canned response.
    struct MockSpeech {
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl MockSpeech {
        fn new(fail_first: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl SpeechToText for MockSpeech {
        async fn transcribe(&self, _audio: &Path) -> TalereelResult<serde_json::Value> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(TalereelError::external(SERVICE, "503"));
            }
            Ok(serde_json::json!({
                "language_code": "eng",
                "text": "Hi there.",
                "words": [
                    {"text": "Hi", "start": 0.1, "end": 0.4, "type": "word"},
                    {"text": " ", "start": 0.4, "end": 0.5, "type": "spacing"},
                    {"text": "there.", "start": 0.5, "end": 0.9, "type": "word"}
                ]
            }))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn quick_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff_ms: 0,
            multiplier: 1.0,
        }
    }

    fn project() -> (tempfile::TempDir, ProjectLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::create(dir.path(), "stt").unwrap();
        (dir, layout)
    }

    #[tokio::test]
    async fn test_writes_raw_response() {
        let (_dir, layout) = project();
        std::fs::write(layout.audio(), b"mp3").unwrap();

        let stt = MockSpeech::new(0);
        let outcome = transcribe_project(&layout, &stt, &quick_retry(1))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TranscribeOutcome::Transcribed {
                words: 3,
                spoken: 2
            }
        );

        let saved = layout.load_transcript().unwrap();
        assert_eq!(saved.text, "Hi there.");
        assert_eq!(saved.spoken_word_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_transcript_is_not_resent() {
        let (_dir, layout) = project();
        std::fs::write(layout.transcript(), "{}").unwrap();

        let stt = MockSpeech::new(0);
        let outcome = transcribe_project(&layout, &stt, &quick_retry(1))
            .await
            .unwrap();
        assert_eq!(outcome, TranscribeOutcome::Cached);
        assert_eq!(stt.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_audio_is_missing_input() {
        let (_dir, layout) = project();
        let err = transcribe_project(&layout, &MockSpeech::new(0), &quick_retry(1))
            .await
            .unwrap_err();
        assert!(matches!(err, TalereelError::MissingInput { .. }));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let (_dir, layout) = project();
        std::fs::write(layout.audio(), b"mp3").unwrap();

        let stt = MockSpeech::new(2);
        transcribe_project(&layout, &stt, &quick_retry(3))
            .await
            .unwrap();
        assert_eq!(stt.calls.load(Ordering::SeqCst), 3);
        assert!(layout.transcript().exists());
    }

    #[tokio::test]
    async fn test_exhausted_retries_leave_no_transcript() {
        let (_dir, layout) = project();
        std::fs::write(layout.audio(), b"mp3").unwrap();

        let err = transcribe_project(&layout, &MockSpeech::new(5), &quick_retry(2))
            .await
            .unwrap_err();
        assert!(matches!(err, TalereelError::ExternalService { .. }));
        assert!(!layout.transcript().exists());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = ElevenLabsClient::new(
            "key",
            "https://api.elevenlabs.io/v1/",
            "scribe_v1",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.elevenlabs.io/v1/speech-to-text"
        );
    }
}
