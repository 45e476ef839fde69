use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    Start { frames: usize },
    Advance { fraction: f32 },
    Finish,
}

pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Counts finished frames and forwards them to an optional sink.
pub(crate) struct ProgressReporter<'a> {
    sink: Option<&'a ProgressSink>,
    total: usize,
    done: usize,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn start(sink: Option<&'a ProgressSink>, total: usize) -> Self {
        if let Some(sink) = sink {
            (sink)(ProgressEvent::Start { frames: total });
        }
        Self {
            sink,
            total,
            done: 0,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.done += 1;
        let Some(sink) = self.sink else {
            return;
        };
        let fraction = if self.total == 0 {
            1.0
        } else {
            self.done as f32 / self.total as f32
        };
        (sink)(ProgressEvent::Advance {
            fraction: fraction.clamp(0.0, 1.0),
        });
    }

    pub(crate) fn finish(self) {
        if let Some(sink) = self.sink {
            (sink)(ProgressEvent::Finish);
        }
    }
}
