mod config;
mod life;
mod output;
mod shutdown;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use mapsight::{
    Area, Frame, Monitor, OffsetsCollection, ProcessProvider, SnapshotBuilder,
    SystemProcessProvider, Tables,
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::life::LifeWatch;
use crate::output::{SnapshotSink, status_line};
use crate::shutdown::ShutdownSignal;

#[derive(Parser)]
#[command(name = "mapsight")]
#[command(version, about = "Live game state reader")]
struct Args {
    /// Config file (defaults to mapsight/config.toml in the user config directory)
    #[arg(short, long, env = "MAPSIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Offsets file
    #[arg(short, long, default_value = "offsets.json")]
    offsets: PathBuf,

    /// Area level table (JSON, keyed by area name)
    #[arg(long)]
    area_levels: Option<PathBuf>,

    /// Follow only this process id
    #[arg(long)]
    pid: Option<u32>,

    /// Print one JSON line per ready frame to stdout
    #[arg(long)]
    json: bool,
}

/// Last reported state of one process, for transition logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unavailable,
    NotInGame,
    InGame(Area),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mapsight=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("mapsight starting...");

    let config_path = args.config.clone().or_else(Config::default_path);
    let config = Config::load_or_default(config_path.as_deref())?;

    let offsets = match mapsight::load_offsets(&args.offsets) {
        Ok(o) => {
            info!("Loaded offsets version: {}", o.version);
            o
        }
        Err(e) => {
            warn!("Failed to load offsets: {}, using built-in set", e);
            OffsetsCollection::default()
        }
    };

    let tables = match &args.area_levels {
        Some(path) => Tables::load(path)?,
        None => Tables::default(),
    };

    let signal = Arc::new(ShutdownSignal::new());
    {
        let signal = Arc::clone(&signal);
        ctrlc::set_handler(move || {
            info!("Shutting down...");
            signal.trigger();
        })?;
    }

    let provider = SystemProcessProvider::new(config.process_name.clone());
    let mut monitor = Monitor::new(provider, SnapshotBuilder::new(offsets, tables));
    let mut sink = SnapshotSink::new(config.snapshot_output.as_deref(), args.json)?;

    run(&mut monitor, &config, args.pid, &mut sink, &signal);

    info!("mapsight stopped");
    Ok(())
}

fn run<P: ProcessProvider>(
    monitor: &mut Monitor<P>,
    config: &Config,
    pid: Option<u32>,
    sink: &mut SnapshotSink,
    signal: &ShutdownSignal,
) {
    let tick = Duration::from_millis(config.tick_interval_ms);
    let mut statuses: HashMap<u32, Status> = HashMap::new();
    let mut life_watches: HashMap<u32, LifeWatch> = HashMap::new();

    info!("Waiting for {}...", config.process_name);

    loop {
        let frames = match pid {
            Some(pid) => vec![(pid, monitor.get(pid))],
            None => match monitor.poll() {
                Ok(frames) => frames,
                Err(e) => {
                    error!("Failed to list processes: {}", e);
                    Vec::new()
                }
            },
        };

        if pid.is_none() {
            statuses.retain(|known, _| frames.iter().any(|(p, _)| p == known));
            life_watches.retain(|known, _| frames.iter().any(|(p, _)| p == known));
        }

        for (pid, frame) in frames {
            let now = Instant::now();
            let status = match frame {
                Ok(Frame::Ready(data)) => {
                    let watch = life_watches
                        .entry(pid)
                        .or_insert_with(|| LifeWatch::new(config.life_warning_percent));
                    if let Some(percent) = watch.check(&data) {
                        warn!(
                            "{} life at {:.0}% in {}",
                            data.player_name, percent, data.area
                        );
                    }
                    if let Err(e) = sink.write(&data, now) {
                        error!("Failed to write snapshot: {}", e);
                    }
                    if data.new_instance {
                        info!("{}", status_line(&data.summary(now)));
                    }
                    Some(Status::InGame(data.area))
                }
                Ok(Frame::NotInGame) => Some(Status::NotInGame),
                Ok(Frame::Unavailable) => Some(Status::Unavailable),
                // Already reported when first raised; the state is unchanged
                Ok(Frame::Suppressed(_)) => None,
                Err(e) if e.is_transient() => None,
                Err(e) => {
                    warn!("Process {}: {}", pid, e);
                    None
                }
            };

            if let Some(status) = status {
                let previous = statuses.insert(pid, status);
                if previous != Some(status) {
                    log_transition(pid, previous, status);
                }
            }
        }

        if signal.wait(tick) {
            break;
        }
    }
}

fn log_transition(pid: u32, previous: Option<Status>, status: Status) {
    match status {
        Status::InGame(area) => match previous {
            Some(Status::InGame(_)) => debug!("Process {} entered {}", pid, area),
            _ => info!("Process {} in game ({})", pid, area),
        },
        Status::NotInGame => info!("Process {} not in game", pid),
        Status::Unavailable => info!("Process {} not available", pid),
    }
}
