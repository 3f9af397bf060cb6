use std::sync::{mpsc, Arc};

use healthai_core::llm::{ChatError, ModelClient as _};
use healthai_core::prompts::Task;
use providers::openrouter::OpenRouterClient;
use tracing::{error, info, warn};

use super::input::InputBuffer;
use super::Notice;
use crate::strings::{PENDING_NOTICE, STILL_WAITING_NOTICE, WORKER_GONE_NOTICE};

type Reply = Result<String, ChatError>;

/// One prompt-driven tab: its input, the last outcome, and at most one
/// request in flight.
pub struct TaskPane {
    pub task: Task,
    pub input: InputBuffer,
    pub notice: Option<Notice>,
    pub scroll: u16,
    pending: Option<mpsc::Receiver<Reply>>,
}

impl TaskPane {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            input: InputBuffer::default(),
            notice: None,
            scroll: 0,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn success(&self, text: String) -> Notice {
        match self.task {
            Task::DiseasePrediction => Notice::Info(text),
            Task::PatientChat | Task::TreatmentPlan => Notice::Success(text),
        }
    }

    /// Validates the input and, when it is usable, starts exactly one
    /// completion call on a worker thread.
    pub fn submit(&mut self, client: &Arc<OpenRouterClient>) {
        if self.is_pending() {
            self.notice = Some(Notice::Info(STILL_WAITING_NOTICE.to_string()));
            return;
        }
        let prompt = match self.task.build_prompt(&self.input.text) {
            Ok(p) => p,
            Err(e) => {
                warn!(target: "tui", "submit rejected: task={:?} reason={}", self.task, e);
                self.notice = Some(Notice::Warning(e.to_string()));
                return;
            }
        };
        info!(target: "tui", "submit: task={:?} input_chars={}", self.task, self.input.char_count());

        let (tx, rx) = mpsc::channel::<Reply>();
        let client = Arc::clone(client);
        std::thread::spawn(move || {
            let res = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(client.complete(&prompt)),
                Err(e) => Err(ChatError::Transport(format!("runtime: {}", e))),
            };
            let _ = tx.send(res);
        });
        self.pending = Some(rx);
        self.scroll = 0;
        self.notice = Some(Notice::Info(PENDING_NOTICE.to_string()));
    }

    /// Picks up a finished call, if any. Returns true when the pane changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let notice = match rx.try_recv() {
            Ok(Ok(text)) => {
                info!(target: "tui", "reply: task={:?} len={}", self.task, text.len());
                self.success(text)
            }
            Ok(Err(e)) => {
                error!(target: "tui", "reply error: task={:?} {}", self.task, e);
                Notice::Error(e.to_string())
            }
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                error!(target: "tui", "request worker vanished: task={:?}", self.task);
                Notice::Error(WORKER_GONE_NOTICE.to_string())
            }
        };
        self.pending = None;
        self.notice = Some(notice);
        true
    }
}
