use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::SessionState;
use crate::detection::RuleClassifier;
use crate::detection::remote::{HttpPredictionClient, PredictionClient, RemoteError, parse_prediction};
use crate::models::{ClassificationResult, Frame, LandmarkSet, SignLabel};
use crate::source::LandmarkSource;

/// Which classification path drives the display.
pub enum PipelineMode<C> {
    /// Local rules only.
    RuleOnly,
    /// Local rules, then overridden by the remote model whenever it answers.
    /// A failed remote call clears the display instead of keeping the rule
    /// result.
    RemoteOverride(C),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Ignore remote answers for frames older than one already applied.
    /// Off by default: whichever answer arrives last wins.
    pub drop_stale_remote: bool,
}

/// What changed the session, as reported to the `run` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The rules classified frame `n`.
    Frame(u64),
    /// A remote answer for frame `n` replaced the display.
    Remote(u64),
}

/// A remote completion posted back to the pipeline's inbox.
#[derive(Debug)]
pub struct RemoteOutcome {
    /// Sequence number of the frame whose hand was sent.
    pub frame: u64,
    pub result: Result<SignLabel, RemoteError>,
}

/// Per-frame driver that owns the session state.
///
/// Frames are processed strictly one at a time on the caller's task. Each
/// frame may start one remote request; its answer comes back through a
/// single-consumer inbox. `run` applies answers as soon as they arrive;
/// callers driving `process_frame` by hand apply them with `poll_remote` or
/// `next_remote`.
pub struct FramePipeline<C: PredictionClient = HttpPredictionClient> {
    classifier: RuleClassifier,
    remote: Option<C>,
    config: PipelineConfig,
    state: SessionState,
    inbox_tx: UnboundedSender<RemoteOutcome>,
    inbox_rx: UnboundedReceiver<RemoteOutcome>,
    frame_seq: u64,
    in_flight: usize,
    newest_applied: u64,
}

impl FramePipeline {
    pub fn rule_only() -> Self {
        Self::new(PipelineMode::RuleOnly)
    }
}

impl<C: PredictionClient> FramePipeline<C> {
    pub fn new(mode: PipelineMode<C>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let remote = match mode {
            PipelineMode::RuleOnly => None,
            PipelineMode::RemoteOverride(client) => Some(client),
        };
        Self {
            classifier: RuleClassifier::new(),
            remote,
            config: PipelineConfig::default(),
            state: SessionState::new(),
            inbox_tx,
            inbox_rx,
            frame_seq: 0,
            in_flight: 0,
            newest_applied: 0,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_classifier(mut self, classifier: RuleClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn uses_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access for user actions (label selection, capture).
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_seq
    }

    /// Remote requests started but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Frame callback. Never blocks on the remote service and never touches
    /// the inbox; answers still queued there are applied later, in arrival
    /// order, by whoever polls it.
    ///
    /// When several hands are supplied, each is classified in order and the
    /// last one processed is what the session keeps.
    pub fn process_frame(&mut self, frame: &Frame) -> ClassificationResult {
        self.frame_seq += 1;
        let seq = self.frame_seq;

        let mut latest: Option<LandmarkSet> = None;
        let mut displayed = ClassificationResult::cleared();
        for hand in &frame.hands {
            match LandmarkSet::from_slice(hand) {
                Ok(set) => {
                    displayed = ClassificationResult::from_rules(self.classifier.classify_set(&set));
                    latest = Some(set);
                }
                Err(e) => {
                    tracing::debug!(frame = seq, "Ignoring hand: {}", e);
                    displayed = ClassificationResult::from_rules(SignLabel::Unknown);
                    latest = None;
                }
            }
        }

        if let (Some(client), Some(set)) = (&self.remote, &latest) {
            self.in_flight += 1;
            spawn_remote(self.inbox_tx.clone(), seq, client.predict(set));
        }

        tracing::debug!(
            frame = seq,
            hands = frame.hands.len(),
            "Rule engine: {}",
            displayed.label
        );
        self.state.record_frame(latest, displayed);
        displayed
    }

    /// Returns whether the outcome reached the display.
    fn apply_outcome(&mut self, outcome: RemoteOutcome) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.config.drop_stale_remote && outcome.frame < self.newest_applied {
            tracing::debug!(
                frame = outcome.frame,
                newest = self.newest_applied,
                "Dropping stale remote result"
            );
            return false;
        }
        self.newest_applied = self.newest_applied.max(outcome.frame);

        let displayed = match outcome.result {
            Ok(label) => {
                tracing::debug!(frame = outcome.frame, "Remote model: {}", label);
                ClassificationResult::from_remote(label)
            }
            Err(e) => {
                tracing::warn!(
                    session = %self.state.id(),
                    frame = outcome.frame,
                    "Remote inference failed, clearing sign: {}",
                    e
                );
                ClassificationResult::cleared()
            }
        };
        self.state.show(displayed);
        true
    }

    /// Apply every remote answer that has already arrived, in arrival order.
    pub fn poll_remote(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.inbox_rx.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next remote answer and apply it.
    ///
    /// Returns the displayed result afterwards, or `None` immediately when
    /// nothing is in flight.
    pub async fn next_remote(&mut self) -> Option<ClassificationResult> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.inbox_rx.recv().await?;
        self.apply_outcome(outcome);
        Some(self.state.displayed())
    }

    /// Wait until every outstanding remote request has been applied.
    pub async fn settle(&mut self) {
        while self.next_remote().await.is_some() {}
    }

    /// Drive the pipeline from `source` until it runs dry.
    ///
    /// While waiting for the next frame, remote answers are applied the moment
    /// they arrive. `on_event` sees the session after every change: once per
    /// frame and once per remote answer that reached the display. The source
    /// is started before the first frame and stopped afterwards. Answers still
    /// in flight when the source runs dry are left for `settle`.
    pub async fn run<S, F>(&mut self, source: &mut S, mut on_event: F) -> anyhow::Result<u64>
    where
        S: LandmarkSource,
        F: FnMut(PipelineEvent, &mut SessionState),
    {
        source.start()?;
        let mut frames = 0;
        loop {
            let next = source.next_frame();
            tokio::pin!(next);
            let frame = loop {
                tokio::select! {
                    biased;
                    Some(outcome) = self.inbox_rx.recv(), if self.in_flight > 0 => {
                        let frame = outcome.frame;
                        if self.apply_outcome(outcome) {
                            on_event(PipelineEvent::Remote(frame), &mut self.state);
                        }
                    }
                    frame = &mut next => break frame,
                }
            };
            let Some(frame) = frame else { break };

            self.process_frame(&frame);
            frames += 1;
            on_event(PipelineEvent::Frame(self.frame_seq), &mut self.state);
        }
        source.stop();
        tracing::info!(
            session = %self.state.id(),
            "Processed {} frames ({} remote requests still in flight)",
            frames,
            self.in_flight
        );
        Ok(frames)
    }

    /// Tear down the pipeline and keep the session. In-flight requests are
    /// not cancelled; their answers are discarded when they arrive.
    pub fn into_state(self) -> SessionState {
        if self.in_flight > 0 {
            tracing::debug!("Closing session with {} remote requests in flight", self.in_flight);
        }
        self.state
    }
}

/// Run one remote request off the frame path and post its answer to `inbox`.
/// Without an async runtime the request is reported as failed right away.
fn spawn_remote<F>(inbox: UnboundedSender<RemoteOutcome>, frame: u64, request: F)
where
    F: Future<Output = Result<String, RemoteError>> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let result = request.await.and_then(|text| parse_prediction(&text));
                // The session may be gone by the time the answer arrives.
                if inbox.send(RemoteOutcome { frame, result }).is_err() {
                    tracing::debug!(frame, "Discarding remote result for a closed session");
                }
            });
        }
        Err(_) => {
            let _ = inbox.send(RemoteOutcome {
                frame,
                result: Err(RemoteError::NoRuntime),
            });
        }
    }
}
