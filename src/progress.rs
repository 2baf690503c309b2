//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::MindMapConfigBuilder::progress_callback`] to hear about
//! each stage as the run reaches it. The CLI uses this to print status lines
//! and spin a progress indicator while the model is thinking; library users
//! can forward the events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2mindmap::{MindMapConfig, RunProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl RunProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("→ {stage}");
//!     }
//! }
//!
//! let config = MindMapConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn RunProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::outcome::{ModelReply, RenderOutcome};
use std::fmt;
use std::sync::Arc;

/// Pipeline stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Request,
    Parse,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Request => "request",
            Stage::Parse => "parse",
            Stage::Render => "render",
        };
        f.pad(name)
    }
}

/// Called by the pipeline as it moves through its stages.
///
/// All methods default to no-ops so implementors only override what they
/// need. Implementations must be `Send + Sync`: a run may move between
/// tokio worker threads.
pub trait RunProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage ends, with a one-line human summary.
    fn on_stage_complete(&self, stage: Stage, summary: &str) {
        let _ = (stage, summary);
    }

    /// Called with the raw reply before it is parsed.
    fn on_reply(&self, reply: &ModelReply) {
        let _ = reply;
    }

    /// Called with the final render outcome.
    fn on_render(&self, outcome: &RenderOutcome) {
        let _ = outcome;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::MindMapConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl RunProgressCallback for Recorder {
        fn on_stage_start(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("start {stage}"));
        }

        fn on_stage_complete(&self, stage: Stage, summary: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {stage}: {summary}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(Stage::Extract);
        cb.on_stage_complete(Stage::Extract, "2 pages");
        cb.on_reply(&ModelReply::from_model("* Tópico 1: A"));
        cb.on_render(&RenderOutcome::Skipped {
            reason: "no dot".into(),
        });
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let rec = Recorder::default();
        rec.on_stage_start(Stage::Parse);
        rec.on_stage_complete(Stage::Parse, "2 topics");
        assert_eq!(
            *rec.events.lock().unwrap(),
            vec!["start parse".to_string(), "done parse: 2 topics".to_string()]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_stage_start(Stage::Render);
    }
}
