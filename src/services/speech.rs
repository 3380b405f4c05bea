//! Text-to-speech output
//!
//! Speaking is fire-and-forget. Starting a new utterance stops the one
//! still playing.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::settings::DEFAULT_TTS_COMMAND;

pub trait Speaker: Send {
    /// Speak `text` in the voice for `language_tag` (e.g. `sv-SE`)
    fn speak(&self, text: &str, language_tag: &str);

    /// Stop whatever is being spoken
    fn stop(&self) {}
}

/// Speaker that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str, _language_tag: &str) {}
}

/// Speaks by running an external command with the text as its last argument.
///
/// In the command template `{lang}` becomes the full language tag and
/// `{voice}` its lower-cased primary subtag (`sv-SE` -> `sv`).
pub struct CommandSpeaker {
    template: String,
    child: Mutex<Option<Child>>,
}

impl Default for CommandSpeaker {
    fn default() -> Self {
        Self::new(DEFAULT_TTS_COMMAND)
    }
}

impl CommandSpeaker {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            child: Mutex::new(None),
        }
    }

    /// Program and arguments for one utterance
    pub fn command_line(&self, text: &str, language_tag: &str) -> Vec<String> {
        let voice = language_tag
            .split('-')
            .next()
            .unwrap_or(language_tag)
            .to_lowercase();
        let mut parts: Vec<String> = self
            .template
            .split_whitespace()
            .map(|part| part.replace("{lang}", language_tag).replace("{voice}", &voice))
            .collect();
        parts.push(text.to_string());
        parts
    }

    fn kill_current(slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take() {
            if let Ok(None) = child.try_wait() {
                if let Err(e) = child.kill() {
                    log::debug!("Failed to stop speech process: {}", e);
                }
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, language_tag: &str) {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("Nothing to speak");
            return;
        }

        let mut slot = match self.child.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        Self::kill_current(&mut slot);

        let parts = self.command_line(text, language_tag);
        let Some((program, args)) = parts.split_first() else {
            return;
        };
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => *slot = Some(child),
            Err(e) => log::warn!("Failed to run speech command '{}': {}", program, e),
        }
    }

    fn stop(&self) {
        let mut slot = match self.child.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        Self::kill_current(&mut slot);
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_substitution() {
        let speaker = CommandSpeaker::default();
        assert_eq!(
            speaker.command_line("hus Ett hus.", "sv-SE"),
            vec!["espeak-ng", "-v", "sv", "hus Ett hus."]
        );

        let speaker = CommandSpeaker::new("say --lang={lang}");
        assert_eq!(speaker.command_line("hola", "es-ES"), vec!["say", "--lang=es-ES", "hola"]);
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let speaker = CommandSpeaker::new("lexideck-no-such-tts-program");
        speaker.speak("hello", "en-US");
        speaker.speak("", "en-US");
        speaker.stop();
    }
}
