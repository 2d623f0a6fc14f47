//! Optional spoken input.
//!
//! Whether voice input exists at all is decided once, at construction, by
//! passing a recognizer or not. With no recognizer the microphone affordance
//! is never shown and activation does nothing.

use std::error::Error as StdError;
use std::fmt;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Environment variable through which [`CommandRecognizer`] passes the
/// language hint to the external command.
pub const SPEECH_LANG_ENV: &str = "FUNDBOT_SPEECH_LANG";

pub const MIC_IDLE_GLYPH: &str = "🎤";
pub const MIC_LISTENING_GLYPH: &str = "🎙️ Listening...";

#[derive(Debug)]
pub enum VoiceError {
    /// The recognizer command could not be started.
    Spawn(std::io::Error),

    /// The recognizer command ran but reported failure.
    Exit {
        code: Option<i32>,
        stderr: String,
    },

    /// Capture finished without any recognizable speech.
    NoSpeech,
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::Spawn(source) => write!(f, "failed to start speech recognizer: {source}"),
            VoiceError::Exit { code, stderr } => {
                match code {
                    Some(code) => write!(f, "speech recognizer exited with status {code}")?,
                    None => write!(f, "speech recognizer was terminated by a signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            VoiceError::NoSpeech => write!(f, "no speech was recognized"),
        }
    }
}

impl StdError for VoiceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            VoiceError::Spawn(source) => Some(source),
            _ => None,
        }
    }
}

/// Captures a single utterance and returns its transcription.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self) -> Result<String, VoiceError>;
}

/// Speech recognition delegated to an external program.
///
/// The program is expected to record one utterance and print the text on
/// stdout. The first non-blank line is taken as the transcription.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    language: String,
}

impl CommandRecognizer {
    /// Build from an argv list. Returns `None` when the list is empty.
    pub fn from_argv(argv: &[String], language: impl Into<String>) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            language: language.into(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn listen(&self) -> Result<String, VoiceError> {
        debug!(program = %self.program, language = %self.language, "starting speech capture");
        let output = Command::new(&self.program)
            .args(&self.args)
            .env(SPEECH_LANG_ENV, &self.language)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(VoiceError::Spawn)?;

        if !output.status.success() {
            return Err(VoiceError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(VoiceError::NoSpeech)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicState {
    Idle,
    Listening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateOutcome {
    /// No recognizer was configured.
    Unavailable,
    /// A capture is already running.
    AlreadyListening,
    /// Capture started.
    Listening,
}

#[derive(Debug)]
pub enum VoiceEvent {
    Transcript(String),
    Failed(VoiceError),
}

pub struct VoiceInput {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    state: MicState,
    tx: mpsc::UnboundedSender<VoiceEvent>,
}

impl VoiceInput {
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
    ) -> (Self, mpsc::UnboundedReceiver<VoiceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let input = Self {
            recognizer,
            state: MicState::Idle,
            tx,
        };
        (input, rx)
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> MicState {
        self.state
    }

    /// The microphone affordance, or `None` when voice input is unavailable.
    pub fn glyph(&self) -> Option<&'static str> {
        self.recognizer.as_ref()?;
        Some(match self.state {
            MicState::Idle => MIC_IDLE_GLYPH,
            MicState::Listening => MIC_LISTENING_GLYPH,
        })
    }

    /// Start capturing one utterance. Must be called from within a tokio
    /// runtime; the result arrives as a [`VoiceEvent`].
    pub fn activate(&mut self) -> ActivateOutcome {
        let Some(recognizer) = self.recognizer.as_ref() else {
            return ActivateOutcome::Unavailable;
        };
        if self.state == MicState::Listening {
            return ActivateOutcome::AlreadyListening;
        }

        self.state = MicState::Listening;
        let recognizer = Arc::clone(recognizer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match recognizer.listen().await {
                Ok(text) => VoiceEvent::Transcript(text),
                Err(err) => VoiceEvent::Failed(err),
            };
            let _ = tx.send(event);
        });
        ActivateOutcome::Listening
    }

    /// Apply a capture result. The affordance returns to idle whatever the
    /// outcome; a transcription is handed back verbatim for submission.
    pub fn finish(&mut self, event: VoiceEvent) -> Option<String> {
        self.state = MicState::Idle;
        match event {
            VoiceEvent::Transcript(text) => Some(text),
            VoiceEvent::Failed(err) => {
                warn!(error = %err, "voice capture failed");
                None
            }
        }
    }
}
