//! Speech synthesizer interface and narration.

use crate::error::{Error, Result};

/// Default pause between consecutive chunks, in seconds.
pub const DEFAULT_GAP_SECONDS: f32 = 0.3;

/// A text-to-speech engine producing mono `f32` samples.
pub trait SpeechSynthesizer {
    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Synthesize one chunk of text.
    fn synthesize(&self, text: &str) -> Result<Vec<f32>>;
}

/// Synthesize chunks in order, separated by `gap_seconds` of silence.
///
/// Fails with [`Error::EmptyContent`] when `chunks` is empty and stops at
/// the first chunk the synthesizer rejects.
pub fn narrate<S, T>(synth: &S, chunks: &[T], gap_seconds: f32) -> Result<Vec<f32>>
where
    S: SpeechSynthesizer + ?Sized,
    T: AsRef<str>,
{
    narrate_with_progress(synth, chunks, gap_seconds, |_, _| {})
}

/// Like [`narrate`], calling `on_progress(done, total)` after each chunk.
pub fn narrate_with_progress<S, T, F>(
    synth: &S,
    chunks: &[T],
    gap_seconds: f32,
    mut on_progress: F,
) -> Result<Vec<f32>>
where
    S: SpeechSynthesizer + ?Sized,
    T: AsRef<str>,
    F: FnMut(usize, usize),
{
    if chunks.is_empty() {
        return Err(Error::EmptyContent("no chunks to narrate".to_string()));
    }

    let gap = silence_len(synth.sample_rate(), gap_seconds);
    let mut audio = Vec::new();

    for (idx, chunk) in chunks.iter().enumerate() {
        let chunk = chunk.as_ref();
        log::debug!(
            "Synthesizing chunk {}/{} ({} chars)",
            idx + 1,
            chunks.len(),
            chunk.chars().count()
        );

        let samples = synth.synthesize(chunk)?;
        if idx > 0 {
            audio.resize(audio.len() + gap, 0.0);
        }
        audio.extend_from_slice(&samples);
        on_progress(idx + 1, chunks.len());
    }

    log::debug!(
        "Narrated {} chunks ({:.1} s)",
        chunks.len(),
        audio.len() as f32 / synth.sample_rate().max(1) as f32
    );
    Ok(audio)
}

/// Number of silent samples for a pause of `seconds`.
fn silence_len(sample_rate: u32, seconds: f32) -> usize {
    (sample_rate as f32 * seconds.max(0.0)).round() as usize
}
