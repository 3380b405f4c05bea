//! Collaborators the study session talks to: speech output and example
//! sentence suggestions

pub mod speech;
pub mod suggest;

pub use speech::{CommandSpeaker, SilentSpeaker, Speaker};
pub use suggest::{clean_suggestion, ExampleSuggester, GeminiSuggester, FAILURE_MESSAGE, MISSING_KEY_MESSAGE};
