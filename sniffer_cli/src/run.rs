//! `run` subcommand: transport assembly, session control and the stdin
//! command loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel as xch;
use eyre::WrapErr;
use sniffer_core::error::{Result, SnifferError};
use sniffer_core::{DetectionSession, LiveSettings, SessionBuilder, SettingDefaults, StatsSnapshot};
use sniffer_hardware::{
    DeviceTransport, ReplayTransport, SilentTone, SimScenario, SimulatedTransport, TcpTransport,
    TerminalBell,
};
use sniffer_traits::Transport;
use sniffer_traits::clock::MonotonicClock;

use crate::cli::SourceArgs;
use crate::commands::{Command, parse_command};

/// Control loop wake-up period for commands, Ctrl-C and the deadline.
const POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub enum Source {
    Tcp(String),
    Device(PathBuf),
    Sim,
    Replay(PathBuf),
}

impl From<&SourceArgs> for Source {
    fn from(a: &SourceArgs) -> Self {
        if let Some(addr) = &a.connect {
            Self::Tcp(addr.clone())
        } else if let Some(path) = &a.device {
            Self::Device(path.clone())
        } else if let Some(path) = &a.replay {
            Self::Replay(path.clone())
        } else {
            Self::Sim
        }
    }
}

pub fn sim_scenario(cfg: &sniffer_config::Config) -> SimScenario {
    SimScenario {
        start_m: (cfg.sim.start_x_m, cfg.sim.start_y_m),
        velocity_mps: (cfg.sim.velocity_x_mps, cfg.sim.velocity_y_mps),
        stop_x_m: cfg.sim.stop_x_m,
        rate_hz: cfg.sim.rate_hz,
        baseline_m: cfg.geometry.baseline_m,
        sensor1_offset_m: cfg.geometry.sensor1_offset_m,
        sensor2_offset_m: cfg.geometry.sensor2_offset_m,
    }
}

/// Open a fresh transport for `source`. Called on every (re)start.
pub fn open_transport(
    source: &Source,
    cfg: &sniffer_config::Config,
) -> Result<Box<dyn Transport + Send>> {
    let transport: Box<dyn Transport + Send> = match source {
        Source::Tcp(addr) => {
            let timeout = Duration::from_millis(cfg.transport.connect_timeout_ms);
            let t = TcpTransport::connect(addr, timeout)
                .map_err(|e| eyre::Report::new(SnifferError::Transport(e.to_string())))
                .wrap_err_with(|| format!("connect to {addr}"))?;
            Box::new(t)
        }
        Source::Device(path) => {
            let t = DeviceTransport::open(path)
                .map_err(|e| eyre::Report::new(SnifferError::Transport(e.to_string())))
                .wrap_err_with(|| format!("open device {}", path.display()))?;
            Box::new(t)
        }
        Source::Sim => Box::new(SimulatedTransport::new(
            sim_scenario(cfg),
            MonotonicClock::new(),
        )),
        Source::Replay(path) => {
            let rows = sniffer_config::load_recording_csv(path)
                .map_err(|e| eyre::Report::new(SnifferError::Config(e.to_string())))?;
            tracing::info!(rows = rows.len(), file = %path.display(), "replaying recording");
            Box::new(ReplayTransport::new(
                rows.iter().map(|r| (r.r1_cm, r.r2_cm)).collect(),
                cfg.sim.rate_hz,
                MonotonicClock::new(),
            ))
        }
    };
    Ok(transport)
}

pub struct RunOptions {
    pub source: Source,
    pub defaults: SettingDefaults,
    pub duration: Option<Duration>,
    pub mute: bool,
    pub read_stdin: bool,
    pub json: bool,
}

fn spawn_stdin_reader() -> xch::Receiver<String> {
    let (tx, rx) = xch::unbounded();
    let spawned = std::thread::Builder::new()
        .name("sniffer-stdin".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if tx.send(line.clone()).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("stdin closed; interactive commands disabled");
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "cannot read stdin commands");
    }
    rx
}

pub fn print_stats(stats: &StatsSnapshot, json: bool) {
    if json {
        let v = serde_json::json!({
            "event": "summary",
            "ticks": stats.ticks,
            "skipped": stats.skipped,
            "rejected_geometry": stats.rejected_geometry,
            "positions": stats.positions,
            "warnings_entered": stats.warnings_entered,
            "samples_applied": stats.samples_applied,
            "samples_malformed": stats.samples_malformed,
        });
        println!("{v}");
    } else {
        eprintln!("\n--- Sniffer Stats ---");
        eprintln!("Ticks: {} (no signal: {})", stats.ticks, stats.skipped);
        eprintln!(
            "Positions: {} (rejected geometry: {})",
            stats.positions, stats.rejected_geometry
        );
        eprintln!("Warnings raised: {}", stats.warnings_entered);
        eprintln!(
            "Samples applied/malformed: {} / {}",
            stats.samples_applied, stats.samples_malformed
        );
        eprintln!("---------------------\n");
    }
}

/// Apply one interactive command. Returns false on quit.
fn handle_command(
    cmd: Command,
    session: &mut DetectionSession,
    settings: &LiveSettings,
    connect: &dyn Fn() -> Result<Box<dyn Transport + Send>>,
    json: bool,
) -> bool {
    let outcome = match cmd {
        Command::Quit => return false,
        Command::Start => connect().and_then(|t| session.start(t)),
        Command::Stop => {
            session.stop();
            Ok(())
        }
        Command::Toggle => session.toggle(connect).map(|_| ()),
        Command::Stats => {
            print_stats(&session.stats(), json);
            if let Some(ms) = session.ingest_stalled_ms() {
                tracing::info!(stalled_ms = ms, active = session.ingest_active(), "time since last applied sample");
            }
            Ok(())
        }
        Command::Set(setting, raw) => {
            tracing::info!(setting = setting.key(), value = %raw, "live setting updated");
            settings.set(setting, raw);
            Ok(())
        }
        Command::Reset(setting) => {
            tracing::info!(setting = setting.key(), "live setting reset to default");
            settings.clear(setting);
            Ok(())
        }
    };
    if let Err(e) = outcome {
        // Interactive failures are reported, not fatal.
        tracing::warn!(error = %e, "command failed");
        eprintln!("{}", crate::error_fmt::humanize(&e));
    }
    true
}

pub fn run_monitor(
    cfg: &sniffer_config::Config,
    opts: &RunOptions,
    shutdown: &Arc<AtomicBool>,
) -> Result<StatsSnapshot> {
    let settings = LiveSettings::new();
    let builder = SessionBuilder::from_config(cfg)
        .with_defaults(opts.defaults)
        .with_settings(settings.clone())
        .with_display(crate::display::ConsoleDisplay::new(opts.json));
    let builder = if opts.mute {
        builder.with_tone(SilentTone::new())
    } else {
        builder.with_tone(TerminalBell)
    };
    let mut session = builder.build()?;

    let connect = || open_transport(&opts.source, cfg);
    session.start(connect()?)?;

    let commands = opts.read_stdin.then(spawn_stdin_reader);
    let deadline = opts.duration.map(|d| Instant::now() + d);
    let mut reported_ingest_end = false;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("interrupted");
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::info!("duration elapsed");
            break;
        }

        if session.is_running() && !session.ingest_active() {
            if !reported_ingest_end {
                tracing::warn!(
                    "range input ended; detection continues on stale ranges (use `stop` then `start` to reconnect)"
                );
                reported_ingest_end = true;
            }
        } else {
            reported_ingest_end = false;
        }

        let next = match &commands {
            Some(rx) => match rx.recv_timeout(POLL) {
                Ok(line) => Some(line),
                Err(xch::RecvTimeoutError::Timeout) => None,
                // Stdin closed; keep running until quit by other means.
                Err(xch::RecvTimeoutError::Disconnected) => {
                    std::thread::sleep(POLL);
                    None
                }
            },
            None => {
                std::thread::sleep(POLL);
                None
            }
        };
        let Some(line) = next else {
            continue;
        };
        match parse_command(&line) {
            Ok(Some(cmd)) => {
                if !handle_command(cmd, &mut session, &settings, &connect, opts.json) {
                    tracing::info!("quit requested");
                    break;
                }
            }
            Ok(None) => {}
            Err(msg) => eprintln!("{msg} (try: start, stop, toggle, stats, quit, w <m>, r <m>, t <s>)"),
        }
    }

    session.stop();
    Ok(session.stats())
}
