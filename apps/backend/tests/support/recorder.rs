// Stand-in session that records what a room pushes to it

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix::prelude::*;
use drieslag::domain::snapshot::RoomSnapshot;
use drieslag::services::RoomEvent;

#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<RoomEvent>>>,
}

impl Actor for Recorder {
    type Context = Context<Self>;
}

impl Handler<RoomEvent> for Recorder {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, _ctx: &mut Self::Context) {
        self.events.lock().expect("recorder lock").push(msg);
    }
}

impl Recorder {
    /// Start a recorder; the returned handle shares its event log.
    pub fn spawn() -> (Self, Recipient<RoomEvent>) {
        let recorder = Recorder::default();
        let addr = recorder.clone().start();
        (recorder, addr.recipient())
    }

    pub fn states(&self) -> Vec<RoomSnapshot> {
        self.events
            .lock()
            .expect("recorder lock")
            .iter()
            .filter_map(|e| match e {
                RoomEvent::State(snapshot) => Some((**snapshot).clone()),
                RoomEvent::YourTurn { .. } => None,
            })
            .collect()
    }

    pub fn your_turns(&self) -> usize {
        self.events
            .lock()
            .expect("recorder lock")
            .iter()
            .filter(|e| matches!(e, RoomEvent::YourTurn { .. }))
            .count()
    }

    /// Poll until some pushed snapshot satisfies `pred`; returns the latest
    /// such snapshot.
    pub async fn wait_for_state(
        &self,
        timeout: Duration,
        pred: impl Fn(&RoomSnapshot) -> bool,
    ) -> RoomSnapshot {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(found) = self.states().into_iter().rev().find(|s| pred(s)) {
                return found;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "no matching snapshot within {timeout:?}"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Let in-flight pushes land.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
