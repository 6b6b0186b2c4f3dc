use clap::Parser;
use log::info;
use miette::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};

use envrec::recording::Recorder;
use envrec::storage::FsStorage;
use envrec::transport::{Liveness, UdpSession};
use envrec::{Cli, RecorderConfig, RecorderError};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp_millis()
        .init();

    info!("envrec {} recording session {}", envrec::VERSION, args.cid);

    let config = RecorderConfig::from(&args);
    let liveness = Liveness::new();
    let (tx, rx) = mpsc::channel(config.queue_capacity);

    // Bind before anything else so a bad CID or busy port ends the process
    // before a recording file is created.
    let session = UdpSession::bind(args.cid, liveness.clone(), tx)?;

    Toplevel::new(move |s| async move {
        let recorder = Recorder::new(config, FsStorage::new());
        let scheduler = recorder.flush_scheduler(liveness);

        s.start(SubsystemBuilder::new("Session", |subsys| session.run(subsys)));
        s.start(SubsystemBuilder::new(
            "Recorder",
            |subsys: SubsystemHandle| async move {
                recorder.run(rx, subsys.on_shutdown_requested()).await;
                Ok::<(), RecorderError>(())
            },
        ));
        s.start(SubsystemBuilder::new(
            "Flush",
            |subsys: SubsystemHandle| async move {
                scheduler.run(subsys.on_shutdown_requested()).await;
                Ok::<(), RecorderError>(())
            },
        ));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_secs(5))
    .await
    .map_err(|e| miette::miette!("{}", e))
}
