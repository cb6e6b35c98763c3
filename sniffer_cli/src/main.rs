#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;
mod commands;
mod display;
mod error_fmt;
mod logging;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;
use sniffer_core::error::SnifferError;
use sniffer_core::{SettingDefaults, locate};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::run::{RunOptions, Source};

fn load_config(path: Option<&Path>) -> eyre::Result<sniffer_config::Config> {
    let cfg = match path {
        None => sniffer_config::Config::default(),
        Some(p) => {
            let text = std::fs::read_to_string(p).map_err(|e| {
                eyre::Report::new(SnifferError::Config(format!("{}: {e}", p.display())))
            })?;
            sniffer_config::load_toml(&text).map_err(|e| {
                eyre::Report::new(SnifferError::Config(format!("{}: {e}", p.display())))
            })?
        }
    };
    cfg.validate()
        .map_err(|e| eyre::Report::new(SnifferError::Config(e.to_string())))?;
    Ok(cfg)
}

fn cmd_locate(
    cfg: &sniffer_config::Config,
    r1: f64,
    r2: f64,
    baseline: Option<f64>,
    json: bool,
) -> eyre::Result<()> {
    let baseline_m = baseline.unwrap_or(cfg.geometry.baseline_m);
    let p = locate(
        r1,
        r2,
        baseline_m,
        cfg.geometry.sensor1_offset_m,
        cfg.geometry.sensor2_offset_m,
    );
    if !p.is_plausible() {
        return Err(eyre::Report::new(SnifferError::InvalidGeometry {
            r1_cm: r1,
            r2_cm: r2,
            baseline_m,
        }));
    }
    if json {
        let v = serde_json::json!({
            "event": "locate",
            "r1_cm": r1,
            "r2_cm": r2,
            "baseline_m": baseline_m,
            "x_m": p.x,
            "y_m": p.y,
            "distance_m": p.norm(),
        });
        println!("{v}");
    } else {
        println!(
            "x: {:.4} m, y: {:.4} m, distance: {:.4} m",
            p.x,
            p.y,
            p.norm()
        );
    }
    Ok(())
}

fn cmd_self_check(cfg: &sniffer_config::Config, json: bool) {
    let g = &cfg.geometry;
    let d = &cfg.detection;
    if json {
        let v = serde_json::json!({
            "event": "self_check",
            "ok": true,
            "baseline_m": g.baseline_m,
            "sensor1_offset_m": g.sensor1_offset_m,
            "sensor2_offset_m": g.sensor2_offset_m,
            "safety_radius_m": d.safety_radius_m,
            "horizon_s": d.horizon_s,
            "tick_ms": d.tick_ms,
            "tone_ms": cfg.alarm.tone_ms,
            "repeat_ms": cfg.alarm.repeat_ms,
            "read_buf_bytes": cfg.ingest.read_buf_bytes,
        });
        println!("{v}");
    } else {
        println!("config ok");
        println!(
            "geometry: baseline {} m, offsets {} m / {} m",
            g.baseline_m, g.sensor1_offset_m, g.sensor2_offset_m
        );
        println!(
            "detection: radius {} m, horizon {} s, tick {} ms",
            d.safety_radius_m, d.horizon_s, d.tick_ms
        );
        println!(
            "alarm: tone {} ms every {} ms",
            cfg.alarm.tone_ms, cfg.alarm.repeat_ms
        );
    }
}

fn dispatch(cli: Cli, cfg: &sniffer_config::Config) -> eyre::Result<()> {
    match cli.cmd {
        Commands::Run {
            source,
            baseline,
            radius,
            horizon,
            duration_ms,
            mute,
            no_stdin,
            stats,
        } => {
            let base = SettingDefaults::from(cfg);
            let defaults = SettingDefaults {
                baseline_m: baseline.unwrap_or(base.baseline_m),
                safety_radius_m: radius.unwrap_or(base.safety_radius_m),
                horizon_s: horizon.unwrap_or(base.horizon_s),
            };
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "cannot install Ctrl-C handler");
                }
            }
            let opts = RunOptions {
                source: Source::from(&source),
                defaults,
                duration: duration_ms.map(Duration::from_millis),
                mute,
                read_stdin: !no_stdin,
                json: cli.json,
            };
            let summary = run::run_monitor(cfg, &opts, &shutdown)?;
            if stats {
                run::print_stats(&summary, cli.json);
            }
            Ok(())
        }
        Commands::Locate { r1, r2, baseline } => cmd_locate(cfg, r1, r2, baseline, cli.json),
        Commands::SelfCheck => {
            cmd_self_check(cfg, cli.json);
            Ok(())
        }
    }
}

fn try_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    logging::init_logging(cli.json, &level, &cfg.logging).wrap_err("logging setup failed")?;
    tracing::debug!(?cfg, "effective configuration");
    dispatch(cli, &cfg)
}

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);

    if let Err(err) = try_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(error_fmt::exit_code_for_error(&err));
    }
}
