use crate::batch::{run_batch, BatchSummary};
use crate::convert::{convert, Conversion};
use crate::{ConversionRequest, Error, Result};
use log::debug;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Convert(ConversionRequest, oneshot::Sender<Result<Conversion>>),
    Batch(PathBuf, ConversionRequest, oneshot::Sender<Result<BatchSummary>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly converter backed by a dedicated worker thread.
///
/// The worker runs the synchronous pipeline (including the blocking browser
/// backend) so async callers never block their runtime. Requests are handled
/// one at a time in submission order.
#[derive(Clone)]
pub struct Converter {
    cmd_tx: Sender<Command>,
}

impl Converter {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Convert(request, resp) => {
                        let _ = resp.send(convert(&request));
                    }
                    Command::Batch(dir, template, resp) => {
                        let res = run_batch(&dir, &template, |index, total, outcome| {
                            debug!("[{}/{}] {}", index + 1, total, outcome.input.display());
                        });
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    /// Convert one file.
    pub async fn convert(&self, request: ConversionRequest) -> Result<Conversion> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Convert(request, tx))
            .map_err(|_| Error::Other("Converter worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Convert canceled: {}", e)))?
    }

    /// Convert every `*.svg` in `dir` with the settings of `template`.
    pub async fn run_batch(&self, dir: impl Into<PathBuf>, template: ConversionRequest) -> Result<BatchSummary> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Batch(dir.into(), template, tx))
            .map_err(|_| Error::Other("Converter worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Batch canceled: {}", e)))?
    }

    /// Stop the worker after queued work finishes.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
