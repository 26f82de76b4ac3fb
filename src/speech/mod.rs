//! Speech-ready text.
//!
//! Maps content elements to the text a narrator would read, splits it into
//! synthesizer-sized chunks, and stitches synthesized chunks together with
//! short pauses. Audio encoding is left to the caller.

mod chunk;
mod synth;

pub use chunk::{chunk_text, speech_chunks, split_sentences, to_speech_text, ChunkOptions, TABLE_PREFIX};
pub use synth::{narrate, narrate_with_progress, SpeechSynthesizer, DEFAULT_GAP_SECONDS};
