use std::sync::mpsc::Sender;

use crate::{EngineEvent, JobId, JobProgress, Stage};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) fn report(sink: &dyn ProgressSink, job_id: JobId, stage: Stage, message: impl Into<String>) {
    sink.emit(EngineEvent::Progress(JobProgress {
        job_id,
        stage,
        message: message.into(),
    }));
}

pub struct ChannelProgressSink {
    tx: Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        // A closed receiver means the front-end is gone.
        let _ = self.tx.send(event);
    }
}
