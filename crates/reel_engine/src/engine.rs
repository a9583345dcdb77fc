use std::io;
use std::sync::mpsc;
use std::thread;

use crate::config::LoaderConfig;
use crate::loader::{ProgressSink, SheetLoader};
use crate::{LoadEvent, RequestId};

enum LoaderCommand {
    Load { request_id: RequestId, url: String },
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<LoadEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<LoadEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: LoadEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs loads on a background tokio runtime, one at a time, in request order.
pub struct LoaderHandle {
    cmd_tx: mpsc::Sender<LoaderCommand>,
    event_rx: mpsc::Receiver<LoadEvent>,
}

impl LoaderHandle {
    pub fn new(config: LoaderConfig) -> io::Result<Self> {
        Self::with_loader(SheetLoader::new(config))
    }

    pub fn with_loader(loader: SheetLoader) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("reel-loader".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    runtime.block_on(handle_command(&loader, command, &event_tx));
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(LoaderCommand::Load {
            request_id,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<LoadEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event arrives or the worker has gone away.
    pub fn recv(&self) -> Option<LoadEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    loader: &SheetLoader,
    command: LoaderCommand,
    event_tx: &mpsc::Sender<LoadEvent>,
) {
    match command {
        LoaderCommand::Load { request_id, url } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = loader.load_records(request_id, &url, &sink).await;
            let _ = event_tx.send(LoadEvent::Finished { request_id, result });
        }
    }
}
