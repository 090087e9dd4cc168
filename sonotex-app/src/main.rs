//! Sonotex - live audio spectrum sampler
//!
//! Captures audio from an input device, samples its spectrum at the
//! configured cadence and logs band summaries. Material and effect-graph
//! binders run against in-memory property maps, the same way a render host
//! would wire them.

mod capture;
mod config;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sonotex_analysis::{SpectrumSample, SpectrumSampler};
use sonotex_bind::{
    EffectGraphBinder, EffectGraphNames, Property, PropertyBinder, PropertyMap, SharedPropertyMap,
};
use tracing_subscriber::EnvFilter;

use capture::Capture;
use config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    tracing::info!(
        sample_count = config.sampler.sample_count,
        history_depth = config.sampler.history_depth,
        update_hz = config.sampler.update_frequency_hz,
        window = %config.sampler.window,
        path = %Config::config_path().display(),
        "starting sonotex"
    );

    let (capture, source) = Capture::open(config.device.as_deref())?;
    capture.play()?;

    let mut sampler = SpectrumSampler::with_source(config.sampler, Box::new(source));

    // Material stand-in: every property under a `_Name` shader-style key
    let material = SharedPropertyMap::default();
    for property in Property::ALL {
        sampler.subscribe(Box::new(PropertyBinder::new(
            property,
            format!("_{}", property.name()),
            material.clone(),
        )));
    }

    // Effect-graph stand-in exposing the default attributes
    let names = EffectGraphNames::default();
    let mut graph = PropertyMap::new();
    graph
        .expose_texture(names.texture.as_str())
        .expose_texture(names.history.as_str())
        .expose_uint(names.count.as_str())
        .expose_uint(names.history_count.as_str());
    let graph: SharedPropertyMap = Arc::new(Mutex::new(graph));
    sampler.subscribe(Box::new(EffectGraphBinder::with_names(names, graph.clone())));

    if config.log_every > 0 {
        let log_every = u64::from(config.log_every);
        let mut seen = 0u64;
        sampler.subscribe(Box::new(move |sample: &SpectrumSample<'_>| {
            seen += 1;
            if seen % log_every == 0 {
                tracing::info!(
                    bass = format_args!("{:.4}", sample.bass()),
                    mid = format_args!("{:.4}", sample.mid()),
                    treble = format_args!("{:.4}", sample.treble()),
                    sum = format_args!("{:.4}", sample.sum()),
                    avg = format_args!("{:.4}", sample.avg()),
                    "{}",
                    meter(sample)
                );
            }
        }));
    }

    run(&mut sampler, &config);

    tracing::info!(
        device = %capture.device_name,
        sample_rate = capture.sample_rate,
        channels = capture.channels,
        samples = sampler.samples_emitted(),
        material_writes = material.lock().writes(),
        graph_writes = graph.lock().writes(),
        "stopped"
    );
    Ok(())
}

/// Drive the sampler at the host frame rate until the duration elapses
fn run(sampler: &mut SpectrumSampler, config: &Config) {
    let frame_duration = Duration::from_secs_f32(1.0 / config.fps.max(1) as f32);
    let deadline = config
        .run_duration()
        .and_then(|duration| Instant::now().checked_add(duration));
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        if deadline.is_some_and(|d| now >= d) {
            break;
        }

        let elapsed = now.duration_since(last_frame);
        last_frame = now;
        sampler.tick(elapsed.as_secs_f32());

        let spent = now.elapsed();
        if spent < frame_duration {
            thread::sleep(frame_duration - spent);
        }
    }
}

/// Three-band bar meter for log output
fn meter(sample: &SpectrumSample<'_>) -> String {
    const WIDTH: usize = 16;
    let peak = sample.bass().max(sample.mid()).max(sample.treble());
    let bar = |value: f32| {
        let filled = if peak > 0.0 {
            ((value / peak) * WIDTH as f32).round() as usize
        } else {
            0
        };
        format!("{:<width$}", "#".repeat(filled.min(WIDTH)), width = WIDTH)
    };
    format!(
        "B[{}] M[{}] T[{}]",
        bar(sample.bass()),
        bar(sample.mid()),
        bar(sample.treble())
    )
}
