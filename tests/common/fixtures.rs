use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use signsight::detection::remote::{PredictionClient, RemoteError};
use signsight::{Frame, Landmark, LandmarkSet, LandmarkSource};
use tokio::sync::oneshot;

/// Builds a hand with the wrist at `wrist` and the five fingertips at the
/// given offsets from the wrist (thumb, index, middle, ring, pinky).
/// Intermediate joints sit evenly along each finger.
pub fn hand_at(wrist: (f64, f64), tips: [(f64, f64); 5]) -> Vec<Landmark> {
    let (wx, wy) = wrist;
    let mut points = vec![Landmark::new(wx, wy, 0.0)];
    for (dx, dy) in tips {
        for step in 1..=4 {
            let t = step as f64 / 4.0;
            points.push(Landmark::new(wx + dx * t, wy + dy * t, -0.01 * step as f64));
        }
    }
    points
}

/// Same as [`hand_at`] with the wrist at the origin.
pub fn hand(tips: [(f64, f64); 5]) -> Vec<Landmark> {
    hand_at((0.0, 0.0), tips)
}

pub fn set(points: &[Landmark]) -> LandmarkSet {
    LandmarkSet::from_slice(points).expect("fixture hands have 21 points")
}

fn polar(r: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (r * rad.cos(), r * rad.sin())
}

/// All fingertips within 0.10 of the wrist.
pub fn fist() -> Vec<Landmark> {
    hand([
        polar(0.08, 0.0),
        polar(0.09, 45.0),
        polar(0.10 - 1e-3, 90.0),
        polar(0.07, 135.0),
        polar(0.06, 180.0),
    ])
}

/// All fingertips 0.30 from the wrist, spread wide apart.
pub fn open_palm() -> Vec<Landmark> {
    hand([
        polar(0.30, 0.0),
        polar(0.30, 60.0),
        polar(0.30, 90.0),
        polar(0.30, 120.0),
        polar(0.30, 150.0),
    ])
}

/// Fingertips 0.20 out, thumb and index tips pinched together.
pub fn c_shape() -> Vec<Landmark> {
    hand([
        polar(0.20, 0.0),
        polar(0.20, 30.0),
        polar(0.20, 90.0),
        polar(0.20, 120.0),
        polar(0.20, 150.0),
    ])
}

/// Index and middle extended, ring and pinky curled, thumb tucked.
pub fn peace() -> Vec<Landmark> {
    hand([
        polar(0.10, 0.0),
        polar(0.30, 80.0),
        polar(0.30, 100.0),
        polar(0.10, 120.0),
        polar(0.10, 140.0),
    ])
}

/// Thumb and index extended, the other fingers curled.
pub fn l_shape() -> Vec<Landmark> {
    hand([
        polar(0.25, 0.0),
        polar(0.30, 90.0),
        polar(0.10, 100.0),
        polar(0.10, 120.0),
        polar(0.10, 140.0),
    ])
}

/// Every fingertip 0.20 from the wrist and the thumb-index gap 0.20:
/// between every threshold pair, matches no rule.
pub fn boundary_hand() -> Vec<Landmark> {
    hand([
        polar(0.20, 0.0),
        polar(0.20, 60.0),
        polar(0.20, 90.0),
        polar(0.20, 180.0),
        polar(0.20, 270.0),
    ])
}

pub type Reply = Result<String, RemoteError>;

#[derive(Default)]
struct Script {
    replies: VecDeque<oneshot::Receiver<Reply>>,
    requests: Vec<Vec<f64>>,
}

/// In-memory prediction client whose answers the test releases by hand.
///
/// Each `predict` call takes the next reply slot registered with
/// [`ScriptedClient::expect_request`]; the request stays pending until the
/// test sends on the returned sender, so completion order is fully scripted.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_request(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().replies.push_back(rx);
        tx
    }

    /// Register a reply that is already available.
    pub fn answer_with(&self, reply: Reply) {
        let tx = self.expect_request();
        let _ = tx.send(reply);
    }

    /// Flattened landmarks of every request made so far.
    pub fn requests(&self) -> Vec<Vec<f64>> {
        self.script.lock().unwrap().requests.clone()
    }
}

impl PredictionClient for ScriptedClient {
    fn predict(
        &self,
        landmarks: &LandmarkSet,
    ) -> impl Future<Output = Reply> + Send + 'static {
        let mut script = self.script.lock().unwrap();
        script.requests.push(landmarks.flatten());
        let reply = script.replies.pop_front();
        async move {
            match reply {
                Some(rx) => rx.await.unwrap_or(Err(RemoteError::Status(599))),
                None => Err(RemoteError::Status(404)),
            }
        }
    }
}

/// Client that gives the same answer to every request after a fixed delay.
/// `Err(code)` replies fail with that HTTP status.
#[derive(Clone)]
pub struct DelayedClient {
    delay: Duration,
    reply: Result<String, u16>,
}

impl DelayedClient {
    pub fn new(delay: Duration, reply: Result<&str, u16>) -> Self {
        Self {
            delay,
            reply: reply.map(str::to_string),
        }
    }
}

impl PredictionClient for DelayedClient {
    fn predict(
        &self,
        _landmarks: &LandmarkSet,
    ) -> impl Future<Output = Reply> + Send + 'static {
        let delay = self.delay;
        let reply = self.reply.clone();
        async move {
            tokio::time::sleep(delay).await;
            reply.map_err(RemoteError::Status)
        }
    }
}

/// Source that waits `interval` before every frame, like a camera running at
/// a fixed rate.
pub struct PacedSource {
    frames: VecDeque<Frame>,
    interval: Duration,
    running: bool,
}

impl PacedSource {
    pub fn new(frames: Vec<Frame>, interval: Duration) -> Self {
        Self {
            frames: frames.into(),
            interval,
            running: false,
        }
    }
}

impl LandmarkSource for PacedSource {
    fn start(&mut self) -> anyhow::Result<()> {
        self.running = true;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Frame> {
        if !self.running {
            return None;
        }
        tokio::time::sleep(self.interval).await;
        self.frames.pop_front()
    }

    fn stop(&mut self) {
        self.running = false;
    }
}
