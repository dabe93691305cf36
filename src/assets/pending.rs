use std::path::PathBuf;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec3;

use super::LoadError;
use crate::scene::Prototype;

/// An external model request that has been issued but not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub model_id: String,
    pub mesh_path: PathBuf,
    pub texture_path: PathBuf,
    pub target_position: Vec3,
}

/// Resolution of a [`PendingLoad`], delivered from a loader thread.
#[derive(Debug)]
pub struct LoadCompletion {
    pub request: PendingLoad,
    pub result: Result<Prototype, LoadError>,
}

/// Completion queue shared between the scene thread and loader threads.
///
/// Loader threads only ever send; the scene thread drains the queue
/// between ticks, so a resolved model can never land mid-frame.
#[derive(Debug)]
pub struct PendingLoads {
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
    in_flight: usize,
}

impl Default for PendingLoads {
    fn default() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }
}

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-flight request and returns the sender its loader
    /// must report back on.
    pub(crate) fn issue(&mut self) -> Sender<LoadCompletion> {
        self.in_flight += 1;
        self.sender.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Takes every completion that has arrived, without blocking.
    pub fn drain_ready(&mut self) -> Vec<LoadCompletion> {
        let ready: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(ready.len());
        ready
    }

    /// Blocks until the next completion arrives. Returns `None` when nothing
    /// is in flight.
    pub fn wait_next(&mut self) -> Option<LoadCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.receiver.recv().ok()?;
        self.in_flight -= 1;
        Some(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PendingLoad {
        PendingLoad {
            model_id: "bird".into(),
            mesh_path: "bird.obj".into(),
            texture_path: "bird.jpg".into(),
            target_position: Vec3::ZERO,
        }
    }

    #[test]
    fn tracks_in_flight_requests() {
        let mut loads = PendingLoads::new();
        assert!(loads.wait_next().is_none());
        let sender = loads.issue();
        assert_eq!(loads.in_flight(), 1);
        assert!(loads.drain_ready().is_empty());

        sender
            .send(LoadCompletion {
                request: request(),
                result: Err(LoadError {
                    model_id: "bird".into(),
                    cause: "missing".into(),
                }),
            })
            .unwrap();

        let ready = loads.drain_ready();
        assert_eq!(ready.len(), 1);
        assert_eq!(loads.in_flight(), 0);
    }
}
