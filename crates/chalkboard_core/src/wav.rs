//! PCM to WAV framing.
//!
//! The TTS model returns raw 16-bit PCM at 24 kHz. Browsers need a RIFF/WAVE
//! container before the audio is playable from a data URI.

/// Wrap raw PCM samples in a WAV container.
///
/// # Examples
///
/// ```
/// use chalkboard_core::pcm_to_wav;
///
/// let wav = pcm_to_wav(&[0u8; 4], 1, 24_000, 16);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(&wav[8..12], b"WAVE");
/// assert_eq!(wav.len(), 44 + 4);
/// ```
pub fn pcm_to_wav(pcm: &[u8], channels: u16, sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let block_align = channels * bits_per_sample / 8;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk (PCM)
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_are_correct() {
        let pcm = vec![0u8; 480];
        let wav = pcm_to_wav(&pcm, 1, 24_000, 16);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 480);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        // Sample rate at offset 24
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 24_000);
        // Byte rate = 24000 * 1 * 16 / 8
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 48_000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 480);
        assert_eq!(wav.len(), 44 + 480);
    }
}
