use std::io::Cursor;
use std::time::Duration;

/// Sample rate every backend must deliver
pub const SPEECH_SAMPLE_RATE: u32 = 16_000;

/// Layout of little-endian signed integer PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpec {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
}

impl PcmSpec {
    /// 16 kHz, 16-bit, mono: the interchange format between synthesis and assembly
    pub const SPEECH: PcmSpec = PcmSpec {
        sample_rate: SPEECH_SAMPLE_RATE,
        bits_per_sample: 16,
        channels: 1,
    };

    pub fn bytes_per_frame(&self) -> usize {
        (self.bits_per_sample as usize / 8) * self.channels as usize
    }

    /// Byte length of `duration` worth of frames, always frame-aligned
    pub fn bytes_for(&self, duration: Duration) -> usize {
        let frames = self.sample_rate as u128 * duration.as_millis() / 1000;
        frames as usize * self.bytes_per_frame()
    }

    pub fn duration_of(&self, byte_len: usize) -> Duration {
        let bytes_per_second = self.sample_rate as u128 * self.bytes_per_frame() as u128;
        if bytes_per_second == 0 {
            return Duration::ZERO;
        }
        let nanos = byte_len as u128 * 1_000_000_000 / bytes_per_second;
        Duration::from_nanos(nanos as u64)
    }
}

/// Raw PCM bytes plus the format they are in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    spec: PcmSpec,
    data: Vec<u8>,
}

impl PcmAudio {
    pub fn new(spec: PcmSpec, data: Vec<u8>) -> Self {
        Self { spec, data }
    }

    /// Wrap bytes already in the speech format
    pub fn speech(data: Vec<u8>) -> Self {
        Self::new(PcmSpec::SPEECH, data)
    }

    pub fn empty() -> Self {
        Self::speech(Vec::new())
    }

    pub fn from_samples(spec: PcmSpec, samples: &[i16]) -> Self {
        let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::new(spec, data)
    }

    /// Decode a 16-bit integer WAV file, converting it to the speech format
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, hound::Error> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(hound::Error::Unsupported);
        }

        let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
        let mono = downmix(&samples, spec.channels);
        let resampled = resample_linear(&mono, spec.sample_rate, SPEECH_SAMPLE_RATE);
        Ok(Self::from_samples(PcmSpec::SPEECH, &resampled))
    }

    pub fn spec(&self) -> PcmSpec {
        self.spec
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn duration(&self) -> Duration {
        self.spec.duration_of(self.data.len())
    }

    /// Decode 16-bit samples. A trailing odd byte is ignored.
    pub fn samples(&self) -> Vec<i16> {
        self.data
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Linear-interpolation resampler for mono 16-bit speech
pub fn resample_linear(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let output_len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let step = from_rate as f64 / to_rate as f64;
    let last = samples.len() - 1;

    (0..output_len)
        .map(|i| {
            let position = i as f64 * step;
            let index = position.floor() as usize;
            let fraction = position - index as f64;
            let current = samples[index.min(last)] as f64;
            let next = samples[(index + 1).min(last)] as f64;
            (current + (next - current) * fraction).round() as i16
        })
        .collect()
}
