//! Offline renderer: runs the engine against a virtual control surface
//! and writes the result to a WAV file. Handy for auditioning the
//! effects and playback behavior without hardware.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::Parser;

use grit_core::app::{GritApp, Instrument};
use grit_core::config::load_config;
use grit_core::hal::{CvInput, PotChannel, VirtualBoard};
use grit_core::qmath::map;
use grit_core::{Frame, Q15, POT_HALF, POT_MAX, POT_MIN};

#[derive(Parser)]
#[command(name = "grit", about = "Render the sample scrubber offline")]
struct Cli {
    /// Input WAV sample (16-bit PCM); a plucked test tone is generated
    /// when omitted
    input: Option<PathBuf>,

    /// Output WAV path
    #[arg(short, long, default_value = "grit-out.wav")]
    output: PathBuf,

    /// Seconds of audio to render
    #[arg(short, long, default_value_t = 4.0)]
    seconds: f32,

    /// YAML config file (missing file falls back to defaults)
    #[arg(short, long, default_value = "grit.yaml")]
    config: PathBuf,

    /// Density knob position (0..=4095)
    #[arg(long, default_value_t = 0)]
    density: i32,

    /// Transient shaper knob position (0..=4095)
    #[arg(long, default_value_t = 0)]
    fx: i32,

    /// Pitch knob position (0..=4095, 2047 is unity)
    #[arg(long, default_value_t = POT_HALF)]
    pitch: i32,

    /// Sweep the scrub knob across the sample over the render
    #[arg(long)]
    sweep_scrub: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli.config);
    let frames = match &cli.input {
        Some(path) => load_sample(path)?,
        None => pluck_tone(config.sample_rate),
    };
    log::info!("sample: {} frames", frames.len());

    let board = Arc::new(VirtualBoard::new());
    board.set_pot(PotChannel::Pot3, cli.density);
    board.set_pot(PotChannel::Pot4, cli.pitch);
    board.set_pot(PotChannel::Pot5, cli.fx);
    board.set_pot(PotChannel::Pot6, POT_HALF);
    board.set_cv(CvInput::Note, POT_HALF);

    let (mut app, effect) = GritApp::new(&config, frames, board.clone())
        .context("failed to assemble engine")?;

    app.init();
    let worker = thread::spawn(move || effect.run());

    let total_frames = (cli.seconds * config.sample_rate as f32) as usize;
    let block_frames = config.block_size;
    let blocks = total_frames.div_ceil(block_frames);

    let input = vec![0; block_frames * 2];
    let mut rendered: Vec<Q15> = Vec::with_capacity(blocks * block_frames * 2);
    for block in 0..blocks {
        if cli.sweep_scrub {
            let pos = map(block as i32, 0, blocks as i32, POT_MIN, POT_MAX);
            board.set_pot(PotChannel::Pot2, pos);
        }
        let mut output = vec![0; block_frames * 2];
        app.process_block(&input, &mut output);
        app.ui_tick();
        rendered.extend_from_slice(&output);
    }

    app.deinit();
    if worker.join().is_err() {
        bail!("effect core thread panicked");
    }

    rendered.truncate(total_frames * 2);
    write_wav(&cli.output, config.sample_rate, &rendered)?;
    log::info!("wrote {} frames to {:?}", total_frames, cli.output);
    Ok(())
}

/// Load a 16-bit WAV as stereo frames (mono inputs are duplicated)
fn load_sample(path: &PathBuf) -> Result<Arc<[Frame]>> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("failed to open {:?}", path))?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 {
        bail!("{:?}: only 16-bit WAV is supported", path);
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("failed to decode {:?}", path))?;

    let frames: Vec<Frame> = match spec.channels {
        1 => samples.iter().map(|&s| Frame::mono(s)).collect(),
        2 => samples
            .chunks_exact(2)
            .map(|pair| Frame::new(pair[0], pair[1]))
            .collect(),
        n => bail!("{:?}: unsupported channel count {}", path, n),
    };
    Ok(frames.into())
}

/// One second of a decaying 220 Hz pluck, for running without an input
fn pluck_tone(sample_rate: u32) -> Arc<[Frame]> {
    let len = sample_rate as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let envelope = (-4.0 * t).exp();
            let s = (std::f32::consts::TAU * 220.0 * t).sin() * envelope * 0.8;
            Frame::mono((s * i16::MAX as f32) as Q15)
        })
        .collect()
}

fn write_wav(path: &PathBuf, sample_rate: u32, samples: &[Q15]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {:?}", path))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize().context("failed to finalize WAV")?;
    Ok(())
}
