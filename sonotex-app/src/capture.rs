//! Live audio capture feeding the FFT spectrum source
//!
//! The cpal callback only pushes samples into a lock-free SPSC ring; the
//! sampler thread drains it whenever it asks for a spectrum.

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use sonotex_analysis::{FftSpectrum, SpectrumSource, WindowFunction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Samples moved from the ring into the FFT source per drain step
const DRAIN_CHUNK_FRAMES: usize = 1024;

/// Running input stream; capture stops when dropped
pub struct Capture {
    stream: cpal::Stream,
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: usize,
}

impl Capture {
    /// Open `device` (or the default input) and return the stream together
    /// with the spectrum source it feeds
    pub fn open(device: Option<&str>) -> anyhow::Result<(Self, LiveSource)> {
        let host = cpal::default_host();
        let device = match device {
            Some(wanted) => host
                .input_devices()
                .context("Failed to enumerate input devices")?
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
                .with_context(|| format!("Input device not found: {}", wanted))?,
            None => host
                .default_input_device()
                .context("No audio input device found")?,
        };
        let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());

        let supported = device
            .default_input_config()
            .context("Failed to get input config")?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        // One second of audio between sampler drains
        let ring = HeapRb::<f32>::new((sample_rate as usize * channels).max(channels));
        let (producer, consumer) = ring.split();
        let alive = Arc::new(AtomicBool::new(true));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, producer, alive.clone()),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, producer, alive.clone()),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, producer, alive.clone()),
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, producer, alive.clone()),
            other => anyhow::bail!("Unsupported sample format: {:?}", other),
        }
        .context("Failed to create input stream")?;

        tracing::info!(
            device = %device_name,
            sample_rate,
            channels,
            format = ?sample_format,
            "audio input opened"
        );

        let source = LiveSource {
            consumer,
            fft: FftSpectrum::new(channels),
            alive,
            scratch: vec![0.0; DRAIN_CHUNK_FRAMES * channels],
        };

        Ok((
            Self {
                stream,
                device_name,
                sample_rate,
                channels,
            },
            source,
        ))
    }

    /// Start capturing
    pub fn play(&self) -> anyhow::Result<()> {
        self.stream.play().context("Failed to start audio input")
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut producer: HeapProd<f32>,
    alive: Arc<AtomicBool>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // Whole blocks only, so interleaved channels stay aligned
            if producer.vacant_len() < data.len() {
                return;
            }
            for &sample in data {
                let _ = producer.try_push(sample.to_sample::<f32>());
            }
        },
        move |err| {
            tracing::warn!(%err, "audio input stream error");
            alive.store(false, Ordering::Relaxed);
        },
        None,
    )
}

/// Spectrum source backed by the capture ring
pub struct LiveSource {
    consumer: HeapCons<f32>,
    fft: FftSpectrum,
    alive: Arc<AtomicBool>,
    scratch: Vec<f32>,
}

impl LiveSource {
    /// Move every complete frame from the ring into the FFT source
    fn drain(&mut self) {
        let channels = self.fft.channels();
        loop {
            let occupied = self.consumer.occupied_len();
            let whole = occupied - occupied % channels;
            let take = whole.min(self.scratch.len());
            if take == 0 {
                break;
            }
            let popped = self.consumer.pop_slice(&mut self.scratch[..take]);
            self.fft.push_interleaved(&self.scratch[..popped]);
        }
    }
}

impl SpectrumSource for LiveSource {
    fn is_available(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    fn spectrum(&mut self, buffer: &mut [f32], channel: usize, window: WindowFunction) {
        self.drain();
        self.fft.spectrum(buffer, channel, window);
    }
}
