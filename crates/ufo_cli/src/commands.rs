use crate::config::{ConfigError, ProbeConfig};
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;
use ufo_probe::{probe, ProbeError, Registry, Sample, VirtualTemperatureUfo};

/// Standardized exit codes.
/// 0 = OK, 2 = config/input error, 3 = cannot connect, 4 = read failed, 1 = other.
pub const EXIT_OTHER: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_CONNECT: i32 = 3;
pub const EXIT_READ: i32 = 4;

pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_INPUT;
        }
        if let Some(e) = cause.downcast_ref::<ProbeError>() {
            return match e {
                e if e.is_connect() => EXIT_CONNECT,
                ProbeError::Client(_) | ProbeError::Implausible { .. } => EXIT_READ,
                _ => EXIT_OTHER,
            };
        }
    }
    EXIT_OTHER
}

// ── describe ────────────────────────────────────────────────────

pub fn describe(cfg: &ProbeConfig) -> Result<()> {
    let descriptor = probe::descriptor(cfg.name.as_str());
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

// ── read ────────────────────────────────────────────────────────

pub fn read(cfg: &ProbeConfig, json: bool) -> Result<()> {
    info!(instrument = %cfg.name, tip = %cfg.tip.target(), validate = cfg.validate, "reading");
    let ufo = VirtualTemperatureUfo::connect_with(&cfg.name, &cfg.tip)
        .with_context(|| format!("open tip session at {}", cfg.tip.target()))?
        .with_validation(cfg.validate);

    let mut registry = Registry::new();
    registry.register(Box::new(ufo))?;
    let samples = registry.snapshot().context("read temperature")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
    } else {
        for sample in &samples {
            println!("{}", render(sample));
        }
    }
    Ok(())
}

fn render(sample: &Sample) -> String {
    format!(
        "{} {} {}",
        format!("{}.{}", sample.instrument, sample.parameter).dimmed(),
        format!("{:.2}", sample.value).cyan().bold(),
        sample.unit.as_deref().unwrap_or(""),
    )
}
