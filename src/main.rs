//! CLI for fixbus
//!
//! Runs the broker walkthroughs against an in-process broker:
//! - `basic`: point-to-point send and process
//! - `pubsub`: topic fan-out to several domains
//! - `priority`: priority is carried but delivery stays FIFO
//! - `queue`: pending count and queue clearing
//! - `stats`: statistics snapshot as JSON
//! - `custom`: application-defined ids
//! - `request`: request/response across threads through `SharedBroker`
//! - `all`: every walkthrough in order

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fixbus::broker::{Broker, Clock, SharedBroker, SystemClock, TickClock, handler};
use fixbus::config::{ClockKind, Settings, load_config};
use fixbus::ids::names::priority_name;
use fixbus::ids::{msg, msg_name, priority, server, server_name, topic, topic_name};
use fixbus::utils::logging;
use tracing::{error, info};

type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Clone, Copy)]
#[command(name = "fixbus")]
enum Command {
    /// Point-to-point send and process
    Basic,
    /// Publish/subscribe fan-out
    Pubsub,
    /// Messages with different priorities
    Priority,
    /// Pending count and queue clearing
    Queue,
    /// Statistics snapshot
    Stats,
    /// Application-defined server, message and topic ids
    Custom,
    /// Request/response between two threads
    Request,
    /// Every walkthrough in order
    All,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            Settings::default()
        }
    };
    logging::init(&settings.logging.level);

    let cmd = Command::parse();

    if let Err(e) = run(cmd, &settings).await {
        error!("Walkthrough failed: {}", e);
    }
}

async fn run(cmd: Command, settings: &Settings) -> AppResult<()> {
    match cmd {
        Command::Basic => basic_messaging(settings),
        Command::Pubsub => pub_sub(settings),
        Command::Priority => priority_messaging(settings),
        Command::Queue => queue_management(settings),
        Command::Stats => statistics(settings),
        Command::Custom => custom_domain(settings),
        Command::Request => request_response(settings).await,
        Command::All => {
            basic_messaging(settings)?;
            pub_sub(settings)?;
            priority_messaging(settings)?;
            queue_management(settings)?;
            statistics(settings)?;
            custom_domain(settings)?;
            request_response(settings).await
        }
    }
}

fn new_broker(settings: &Settings) -> AppResult<Broker> {
    let clock: Arc<dyn Clock> = match settings.broker.clock {
        ClockKind::System => Arc::new(SystemClock::new()),
        ClockKind::Tick => Arc::new(TickClock::new()),
    };
    let mut broker = Broker::with_clock(clock);
    broker.init()?;
    Ok(broker)
}

fn basic_messaging(settings: &Settings) -> AppResult<()> {
    info!("=== basic point-to-point messaging ===");
    let mut broker = new_broker(settings)?;

    broker.register_server(
        server::SENSOR,
        Some(handler(|_, m| {
            info!(
                "[SENSOR] received {} from {}",
                msg_name(m.kind),
                server_name(m.src)
            );
            Ok(())
        })),
    )?;

    broker.send(
        server::SYSTEM,
        server::SENSOR,
        msg::SENSOR_CALIBRATE,
        &[],
        priority::NORMAL,
    )?;
    broker.process(server::SENSOR, settings.broker.process_batch)?;

    broker.deinit()?;
    Ok(())
}

fn pub_sub(settings: &Settings) -> AppResult<()> {
    info!("=== publish/subscribe ===");
    let mut broker = new_broker(settings)?;

    broker.create_topic(topic::SENSOR_DATA)?;
    for (id, label) in [(server::STORAGE, "STORAGE"), (server::DISPLAY, "DISPLAY")] {
        broker.subscribe(
            topic::SENSOR_DATA,
            id,
            Some(handler(move |_, m| {
                let reading = String::from_utf8_lossy(m.payload());
                info!("[{label}] {} on {}: {reading}", msg_name(m.kind), topic_name(m.topic));
                Ok(())
            })),
        )?;
    }

    let delivered = broker.publish(
        server::SENSOR,
        topic::SENSOR_DATA,
        msg::SENSOR_DATA,
        b"T=25.5C H=60%",
        priority::NORMAL,
    )?;
    info!("[SENSOR] published to {delivered} subscribers");

    broker.deinit()?;
    Ok(())
}

fn priority_messaging(settings: &Settings) -> AppResult<()> {
    info!("=== priority metadata ===");
    let mut broker = new_broker(settings)?;

    broker.register_server(
        server::SYSTEM,
        Some(handler(|_, m| {
            info!(
                "[SYSTEM] {} with priority {}",
                msg_name(m.kind),
                priority_name(m.priority)
            );
            Ok(())
        })),
    )?;

    for (kind, level) in [
        (msg::SYSTEM_STATUS, priority::LOW),
        (msg::SYSTEM_CONFIG, priority::NORMAL),
        (msg::SYSTEM_RESET, priority::CRITICAL),
    ] {
        broker.send(server::TIMER, server::SYSTEM, kind, &[], level)?;
    }
    broker.process(server::SYSTEM, 0)?;

    broker.deinit()?;
    Ok(())
}

fn queue_management(settings: &Settings) -> AppResult<()> {
    info!("=== queue management ===");
    let mut broker = new_broker(settings)?;

    broker.register_server(server::STORAGE, None)?;
    for i in 0..10_u8 {
        broker.send(
            server::SYSTEM,
            server::STORAGE,
            msg::STORAGE_WRITE,
            &[i],
            priority::NORMAL,
        )?;
    }
    info!("pending messages: {}", broker.pending_count(server::STORAGE)?);

    broker.clear_queue(server::STORAGE)?;
    info!("after clear: {}", broker.pending_count(server::STORAGE)?);

    broker.deinit()?;
    Ok(())
}

fn statistics(settings: &Settings) -> AppResult<()> {
    info!("=== broker statistics ===");
    let mut broker = new_broker(settings)?;

    for id in [server::SYSTEM, server::SENSOR, server::STORAGE] {
        broker.register_server(id, None)?;
    }
    for _ in 0..5 {
        broker.send(
            server::SYSTEM,
            server::SENSOR,
            msg::SENSOR_DATA,
            &[],
            priority::NORMAL,
        )?;
    }

    info!("stats: {}", serde_json::to_string(&broker.stats()?)?);
    info!(
        "sensor: {}",
        serde_json::to_string(&broker.server_info(server::SENSOR)?)?
    );

    broker.deinit()?;
    Ok(())
}

const AUDIO_DSP: u16 = server::USER_BASE + 1;
const AUDIO_PLAY: u16 = msg::USER_BASE + 1;
const AUDIO_STOP: u16 = msg::USER_BASE + 2;
const AUDIO_VOLUME: u16 = msg::USER_BASE + 3;

fn custom_domain(settings: &Settings) -> AppResult<()> {
    info!("=== custom audio domain ===");
    let mut broker = new_broker(settings)?;

    broker.register_server(
        AUDIO_DSP,
        Some(handler(|_, m| {
            match m.kind {
                AUDIO_PLAY => info!("[AUDIO_DSP] start playing"),
                AUDIO_STOP => info!("[AUDIO_DSP] stop playing"),
                AUDIO_VOLUME => match m.payload() {
                    [volume, mute, ..] => {
                        info!("[AUDIO_DSP] volume {volume}%, mute: {}", *mute != 0)
                    }
                    _ => info!("[AUDIO_DSP] malformed volume command"),
                },
                other => info!("[AUDIO_DSP] unknown command {other:#06x}"),
            }
            Ok(())
        })),
    )?;

    broker.send(server::SYSTEM, AUDIO_DSP, AUDIO_PLAY, &[], priority::NORMAL)?;
    broker.send(server::SYSTEM, AUDIO_DSP, AUDIO_VOLUME, &[75, 0], priority::NORMAL)?;
    broker.process(AUDIO_DSP, 0)?;

    broker.deinit()?;
    Ok(())
}

async fn request_response(settings: &Settings) -> AppResult<()> {
    info!("=== request/response ===");
    let mut broker = new_broker(settings)?;

    broker.register_server(server::COMM, None)?;
    broker.register_server(
        server::STORAGE,
        Some(handler(|broker, m| {
            info!("[STORAGE] answering {}", msg_name(m.kind));
            broker.respond(m, b"block-0: ok")
        })),
    )?;
    let shared = SharedBroker::new(broker);

    let responder = {
        let shared = shared.clone();
        tokio::task::spawn_blocking(move || -> AppResult<usize> {
            for _ in 0..100 {
                let handled = shared.process(server::STORAGE, 0)?;
                if handled > 0 {
                    return Ok(handled);
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            Ok(0)
        })
    };

    let timeout = Duration::from_millis(settings.broker.request_timeout_ms);
    let requester = {
        let shared = shared.clone();
        tokio::task::spawn_blocking(move || {
            shared.request(server::COMM, server::STORAGE, msg::STORAGE_READ, &[0], timeout)
        })
    };

    let reply = requester.await??;
    let handled = responder.await??;
    info!(
        "[COMM] reply from {} after {handled} handled request(s): {}",
        server_name(reply.src),
        String::from_utf8_lossy(reply.payload())
    );
    info!("stats: {}", serde_json::to_string(&shared.stats()?)?);
    Ok(())
}
