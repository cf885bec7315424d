//! Animated GIF decoding and re-encoding.
//!
//! Frames are decoded to full-canvas RGBA buffers with their individual
//! delays; the loop count comes from the Netscape application extension and
//! is passed through to the output unchanged, so a watermarked animation
//! keeps the timing and looping of its source.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Frame};

use crate::error::Result;

/// An animated image: ordered frames plus loop metadata.
pub struct Animation {
    /// Frames in presentation order, each carrying its own delay.
    pub frames: Vec<Frame>,
    /// Loop count from the source's Netscape extension.
    pub repeat: Repeat,
}

impl Animation {
    /// Load an animated GIF from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a decodable
    /// GIF stream.
    pub fn load(path: &Path) -> Result<Self> {
        let frames = decode_frames(BufReader::new(File::open(path)?))?;
        let repeat = read_repeat(BufReader::new(File::open(path)?))?;
        Ok(Self { frames, repeat })
    }

    /// Write the animation to disk as a GIF, preserving per-frame delays
    /// and the loop count.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save(self, path: &Path) -> Result<()> {
        encode_gif(BufWriter::new(File::create(path)?), self.frames, self.repeat)
    }

    /// Number of frames in the sequence.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Decode all frames of a GIF stream into full-canvas RGBA frames.
///
/// # Errors
///
/// Returns an error if the stream is not a decodable GIF.
pub fn decode_frames<R: BufRead + Seek>(reader: R) -> Result<Vec<Frame>> {
    let decoder = GifDecoder::new(reader)?;
    Ok(decoder.into_frames().collect_frames()?)
}

/// Read the loop count of a GIF stream.
///
/// The Netscape extension precedes the first image descriptor, so advancing
/// the decoder to the first frame header is enough to make it visible.
/// Sources without the extension yield the decoder's default, which is
/// passed through as-is.
///
/// # Errors
///
/// Returns an error if the stream is not a decodable GIF.
pub fn read_repeat<R: Read>(reader: R) -> Result<Repeat> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(reader)?;
    let _ = decoder.next_frame_info()?;

    Ok(match decoder.repeat() {
        gif::Repeat::Infinite => Repeat::Infinite,
        gif::Repeat::Finite(n) => Repeat::Finite(n),
    })
}

/// Encode frames as a GIF stream with the given loop count.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn encode_gif<W: Write>(writer: W, frames: Vec<Frame>, repeat: Repeat) -> Result<()> {
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(repeat)?;
    encoder.encode_frames(frames)?;
    Ok(())
}
