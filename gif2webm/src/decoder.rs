//! GIF decoding into full-canvas RGBA frames plus per-frame display durations.

use crate::{GifWebmError, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Delay, ImageDecoder, ImageError, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Display time of a frame whose source omits a duration (no Graphic Control
/// Extension). An explicit 0 in the file stays 0.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

const EXTENSION_INTRODUCER: u8 = 0x21;
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const IMAGE_SEPARATOR: u8 = 0x2C;

/// All frames of one GIF in playback order.
#[derive(Debug, Clone)]
pub struct DecodedGif {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<RgbaImage>,
    /// `delays_ms[i]` is how long `frames[i]` is shown.
    pub delays_ms: Vec<u32>,
}

impl DecodedGif {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Any pixel in any frame not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.pixels().any(|p| p.0[3] < u8::MAX))
    }
}

fn color_table_len(packed: u8) -> usize {
    if packed & 0x80 != 0 {
        3 * (1 << ((packed & 0x07) + 1))
    } else {
        0
    }
}

/// Skips a run of data sub-blocks starting at `pos`; returns the position after
/// the zero-length terminator.
fn skip_sub_blocks(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() {
        let block_size = data[pos] as usize;
        pos += 1;
        if block_size == 0 {
            break;
        }
        pos += block_size;
    }
    pos
}

/// For each image in the stream, in order, whether a Graphic Control Extension
/// came before it.
///
/// The decoder reports a frame without one as a 0 delay, the same as an explicit
/// 0. The walk stops at the trailer or at the first byte that starts no known block.
pub fn frames_with_gce(data: &[u8]) -> Vec<bool> {
    let mut frames = Vec::new();
    if data.len() < 13 || &data[0..3] != b"GIF" {
        return frames;
    }

    let mut pos = 13 + color_table_len(data[10]);
    let mut pending_gce = false;
    while pos < data.len() {
        match data[pos] {
            IMAGE_SEPARATOR => {
                frames.push(pending_gce);
                pending_gce = false;
                if pos + 10 > data.len() {
                    break;
                }
                // Descriptor, local color table, LZW minimum code size.
                pos += 10 + color_table_len(data[pos + 9]) + 1;
                pos = skip_sub_blocks(data, pos);
            }
            EXTENSION_INTRODUCER => {
                if pos + 1 >= data.len() {
                    break;
                }
                if data[pos + 1] == GRAPHIC_CONTROL_LABEL {
                    pending_gce = true;
                }
                pos = skip_sub_blocks(data, pos + 2);
            }
            // Trailer, or a byte that starts no known block.
            _ => break,
        }
    }
    frames
}

/// Converts a frame delay to whole milliseconds, rounding to nearest.
pub fn delay_to_ms(delay: Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        return DEFAULT_FRAME_DELAY_MS;
    }
    ((numer as u64 + denom as u64 / 2) / denom as u64) as u32
}

/// Decodes every frame of the GIF at `path`.
///
/// Frames without a Graphic Control Extension get [`DEFAULT_FRAME_DELAY_MS`].
/// Fails with [`GifWebmError::Decode`] if the file cannot be opened, is not a GIF,
/// or contains no frames.
pub fn decode_gif(path: &Path) -> Result<DecodedGif> {
    let decode_err = |source: ImageError| GifWebmError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let data = fs::read(path).map_err(|e| decode_err(ImageError::IoError(e)))?;
    let gce = frames_with_gce(&data);
    let decoder = GifDecoder::new(Cursor::new(data.as_slice())).map_err(decode_err)?;
    let (width, height) = decoder.dimensions();

    let mut frames = Vec::new();
    let mut delays_ms = Vec::new();
    for (i, frame) in decoder.into_frames().enumerate() {
        let frame = frame.map_err(decode_err)?;
        // Past the end of the block walk, trust the decoder.
        let delay_ms = if gce.get(i).copied().unwrap_or(true) {
            delay_to_ms(frame.delay())
        } else {
            DEFAULT_FRAME_DELAY_MS
        };
        delays_ms.push(delay_ms);
        frames.push(frame.into_buffer());
    }

    if frames.is_empty() {
        return Err(decode_err(ImageError::Decoding(
            image::error::DecodingError::new(
                image::error::ImageFormatHint::Exact(image::ImageFormat::Gif),
                "GIF contains no frames",
            ),
        )));
    }

    debug!(
        path = %path.display(),
        width,
        height,
        frames = frames.len(),
        "Decoded GIF"
    );

    Ok(DecodedGif {
        width,
        height,
        frames,
        delays_ms,
    })
}
