//! Chromasense CLI
//!
//! Command-line interface for testing and demonstrating the color
//! sensing pipeline against mock sensors.

use chromasense::{
    calibration::{white_balance, CalibrationStore, MemoryStore},
    pipeline,
    reader::ChannelReader,
    sensing::{ChannelId, FileConfig, MockSensor},
    SignalStatus,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "chromasense", version, about = "Calibrated multi-channel color sensing demo")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of acquisition cycles.
    #[arg(long)]
    cycles: Option<u32>,

    /// Run until interrupted (Ctrl-C).
    #[arg(long)]
    continuous: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(cycles) = cli.cycles {
        config.output.cycles = cycles;
    }
    if cli.continuous {
        config.output.continuous = true;
    }

    info!("Chromasense v{}", chromasense::VERSION);
    info!("This is a demonstration using mock sensor input");

    // A small bank of mock channels with distinct scenes: warm white,
    // strongly red, and a dim blue that never leaves the Dim band.
    let scenes: [(ChannelId, [f64; 3]); 3] = [
        (0, [9.0, 8.2, 7.5]),
        (2, [14.0, 4.0, 3.0]),
        (5, [0.02, 0.03, 0.06]),
    ];
    let mut readers: Vec<(ChannelId, ChannelReader<MockSensor>)> = scenes
        .iter()
        .map(|&(ch, scene)| {
            (
                ch,
                ChannelReader::new(
                    MockSensor::new(scene),
                    config.exposure.clone(),
                    config.capture.settle(),
                ),
            )
        })
        .collect();
    let mut store = MemoryStore::new();

    // Let auto-exposure settle before calibrating.
    for _ in 0..8 {
        for (ch, reader) in readers.iter_mut() {
            if let Err(e) = reader.acquire() {
                warn!("Channel {}: warmup read failed: {}", ch, e);
            }
        }
    }

    // Gray-world white balance against each channel's current scene.
    for (ch, reader) in readers.iter_mut() {
        match reader
            .capture(config.capture.wb_samples as usize)
            .map_err(|e| e.to_string())
            .and_then(|capture| white_balance::estimate(&capture).map_err(|e| e.to_string()))
        {
            Ok(wb) => {
                let record = store.load_or_default(*ch).with_white_balance(wb);
                if let Err(e) = store.save(*ch, record) {
                    warn!("Channel {}: failed to store calibration: {}", ch, e);
                }
                info!(
                    "Channel {}: white balance set to [{:.3}, {:.3}, {:.3}]",
                    ch, wb[0], wb[1], wb[2]
                );
            }
            Err(e) => warn!("Channel {}: white balance failed: {}", ch, e),
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    if config.output.continuous {
        let flag = running.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
        info!("Running continuously; Ctrl-C to stop");
    }

    info!("Processing acquisition cycles...");

    let mut cycle: u32 = 0;
    let mut in_band = 0u32;
    let mut out_of_band = 0u32;

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || cycle < config.output.cycles)
    {
        for (ch, reader) in readers.iter_mut() {
            let acq = match reader.acquire() {
                Ok(acq) => acq,
                Err(e) => {
                    warn!("Channel {}: acquisition failed: {}", ch, e);
                    continue;
                }
            };

            let cal = store.load_or_default(*ch);
            let rgb = pipeline::render(&acq.sample, &cal);

            match acq.status {
                SignalStatus::Ok => in_band += 1,
                _ => out_of_band += 1,
            }

            info!(
                "cycle {:>3}  ch {}  {}  raw R {:>5} G {:>5} B {:>5} C {:>5}  gain {:>2}x  it {:>5.1} ms  [{}]",
                cycle,
                ch,
                rgb.hex(),
                acq.sample.red,
                acq.sample.green,
                acq.sample.blue,
                acq.sample.clear,
                acq.exposure.gain(),
                acq.exposure.integration_ms(),
                acq.status,
            );
        }

        cycle += 1;
        std::thread::sleep(std::time::Duration::from_millis(config.output.refresh_ms));
    }

    info!(
        "Processed {} cycles: {} in-band acquisitions, {} dim/bright/clipping",
        cycle, in_band, out_of_band
    );

    // Final swatch summary
    for (ch, reader) in readers.iter_mut() {
        if let Ok(acq) = reader.acquire() {
            let cal = store.load_or_default(*ch);
            let rgb = pipeline::render(&acq.sample, &cal);
            println!("channel {}: {} ({})", ch, rgb.hex(), acq.status);
        }
    }
}
