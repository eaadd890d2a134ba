use super::EncoderError;
use crate::domain::audio::PcmAudio;
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm, Quality};

/// Spare capacity LAME needs for the final flush
const FLUSH_HEADROOM: usize = 7200;

/// Lossy re-encode of mono 16-bit PCM with LAME.
pub fn encode(audio: &PcmAudio) -> Result<Vec<u8>, EncoderError> {
    let spec = audio.spec();
    if spec.channels != 1 {
        return Err(EncoderError::Mp3(format!(
            "expected mono PCM, got {} channels",
            spec.channels
        )));
    }

    let mut builder = Builder::new()
        .ok_or_else(|| EncoderError::Mp3("failed to allocate LAME encoder".to_string()))?;
    builder.set_num_channels(1).map_err(lame_error)?;
    builder.set_sample_rate(spec.sample_rate).map_err(lame_error)?;
    builder.set_brate(Bitrate::Kbps64).map_err(lame_error)?;
    builder.set_quality(Quality::Best).map_err(lame_error)?;
    let mut encoder = builder.build().map_err(lame_error)?;

    let samples = audio.samples();
    let mut output = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(samples.len()));

    encoder
        .encode_to_vec(MonoPcm(samples.as_slice()), &mut output)
        .map_err(lame_error)?;

    // flush_to_vec writes into spare capacity only
    output.reserve(FLUSH_HEADROOM);
    encoder
        .flush_to_vec::<FlushNoGap>(&mut output)
        .map_err(lame_error)?;

    tracing::debug!(
        pcm_bytes = audio.len(),
        mp3_bytes = output.len(),
        "PCM encoded to mp3"
    );

    Ok(output)
}

fn lame_error(err: impl std::fmt::Debug) -> EncoderError {
    EncoderError::Mp3(format!("{:?}", err))
}
