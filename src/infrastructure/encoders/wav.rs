use super::EncoderError;
use crate::domain::audio::PcmAudio;
use std::io::Cursor;

/// Wrap PCM in a RIFF/WAVE container whose header mirrors the PCM spec.
pub fn encode(audio: &PcmAudio) -> Result<Vec<u8>, EncoderError> {
    let pcm_spec = audio.spec();
    let spec = hound::WavSpec {
        channels: pcm_spec.channels,
        sample_rate: pcm_spec.sample_rate,
        bits_per_sample: pcm_spec.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(audio.len() + 44));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in audio.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
