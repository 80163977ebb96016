use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use wf_app::{AnalysisConfig, AnalysisProgressEvent, AnalysisReport};

pub struct RunWorker {
    pub progress_rx: Receiver<WorkerMessage>,
    _handle: JoinHandle<()>,
}

#[derive(Debug)]
pub enum WorkerMessage {
    Progress(AnalysisProgressEvent),
    Complete(Box<AnalysisReport>),
    Error { message: String },
}

impl RunWorker {
    pub fn start(config: AnalysisConfig, ctx: egui::Context) -> Self {
        let (tx, rx) = channel();

        let handle = thread::spawn(move || {
            let result = Self::run_analysis(&config, &tx, &ctx);
            let msg = match result {
                Ok(report) => WorkerMessage::Complete(Box::new(report)),
                Err(message) => WorkerMessage::Error { message },
            };
            let _ = tx.send(msg);
            ctx.request_repaint();
        });

        Self {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_analysis(
        config: &AnalysisConfig,
        tx: &Sender<WorkerMessage>,
        ctx: &egui::Context,
    ) -> Result<AnalysisReport, String> {
        let mut forward = |event: AnalysisProgressEvent| {
            let _ = tx.send(WorkerMessage::Progress(event));
            ctx.request_repaint();
        };
        wf_app::run_analysis_with_progress(config, Some(&mut forward))
            .map_err(|e| format!("Analysis failed: {}", e))
    }
}
