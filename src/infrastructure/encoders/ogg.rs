use super::EncoderError;
use crate::domain::audio::PcmAudio;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Re-encode PCM as Ogg Vorbis by piping it through ffmpeg.
pub async fn encode(audio: &PcmAudio) -> Result<Vec<u8>, EncoderError> {
    let spec = audio.spec();
    let input_format = format!("s{}le", spec.bits_per_sample);
    let sample_rate = spec.sample_rate.to_string();
    let channels = spec.channels.to_string();

    let mut child = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            &input_format,
            "-ar",
            &sample_rate,
            "-ac",
            &channels,
            "-i",
            "pipe:0",
            "-c:a",
            "libvorbis",
            "-q:a",
            "4",
            "-f",
            "ogg",
            "pipe:1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| EncoderError::Ogg(format!("FFmpeg execution failed: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| EncoderError::Ogg("FFmpeg stdin unavailable".to_string()))?;

    // Feed stdin while stdout is drained, otherwise a full pipe deadlocks both sides
    let pcm = audio.data().to_vec();
    let writer = tokio::spawn(async move {
        stdin.write_all(&pcm).await?;
        stdin.shutdown().await
    });

    let output = child.wait_with_output().await?;
    let write_result = writer
        .await
        .map_err(|e| EncoderError::Ogg(format!("FFmpeg input task failed: {e}")))?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(EncoderError::Ogg(format!(
            "FFmpeg exited with {}: {}",
            output.status,
            error_msg.trim()
        )));
    }
    write_result?;

    tracing::debug!(
        pcm_bytes = audio.len(),
        ogg_bytes = output.stdout.len(),
        "PCM encoded to ogg"
    );

    Ok(output.stdout)
}

/// Whether an `ffmpeg` executable with the Vorbis encoder can be started
pub async fn vorbis_encoder_available() -> bool {
    match Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
    {
        Ok(output) => {
            output.status.success() && String::from_utf8_lossy(&output.stdout).contains("libvorbis")
        }
        Err(_) => false,
    }
}
