//! Audible cues for committed moves, played through rodio.
//!
//! Three cues: a check alert and two move taps, one per side now to move.
//! All three are synthesized once at startup as in-memory WAV buffers;
//! playback is fire-and-forget on rodio's mixer thread and never touches
//! board state. If no audio output is available the engine is simply
//! absent and every cue is skipped (the move itself is unaffected).
//!
//! Build without the "sound" feature to compile the stub engine and drop
//! the rodio dependency entirely.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::rules::PieceColor;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        cue_move_white: Arc<Vec<u8>>,
        cue_move_black: Arc<Vec<u8>>,
        cue_check: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                cue_move_white: Arc::new(encode_wav(&gen_tap(340.0))),
                cue_move_black: Arc::new(encode_wav(&gen_tap(250.0))),
                cue_check: Arc::new(encode_wav(&gen_alert())),
            })
        }

        /// Move cue, keyed by the side now to move.
        pub fn play_move(&self, to_move: PieceColor) {
            match to_move {
                PieceColor::White => self.play(&self.cue_move_white),
                PieceColor::Black => self.play(&self.cue_move_black),
            }
        }

        pub fn play_check(&self) {
            self.play(&self.cue_check);
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    /// Short wooden tap: a damped tone with a touch of second harmonic.
    fn gen_tap(freq: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.07) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(1.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.8
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                wave * env * 0.35
            })
            .collect()
    }

    /// Check alert: two rising notes, slightly longer than a move tap.
    fn gen_alert() -> Vec<f32> {
        let notes = [523.0_f32, 698.0];
        let note_len = (SAMPLE_RATE as f32 * 0.09) as usize;
        let mut samples = Vec::with_capacity(note_len * notes.len());
        for &freq in &notes {
            for i in 0..note_len {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / note_len as f32) * 0.6;
                samples.push((t * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.3);
            }
        }
        samples
    }

    /// Wraps mono f32 samples into a 16-bit PCM WAV buffer.
    fn encode_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        buf.extend_from_slice(&2u16.to_le_bytes()); // block align
        buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }

    pub fn play_move(&self, _to_move: crate::rules::PieceColor) {}

    pub fn play_check(&self) {}
}
