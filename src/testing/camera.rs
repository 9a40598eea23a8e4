use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::photo::{Camera, CameraStream, PhotoError, RgbaFrame, VideoConstraints};

/// What the fake device does on the next `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraBehavior {
    /// Streams a solid grey frame of this size
    Available { width: u32, height: u32 },
    /// Refuses with this reason (no device, permission denied)
    Denied(String),
    /// Opens, but every frame read fails
    BrokenFrames { width: u32, height: u32 },
}

#[derive(Debug, Default)]
struct Counters {
    opened: AtomicUsize,
    stopped: AtomicUsize,
    live: AtomicUsize,
}

/// Camera double that counts opens and stops and tracks live streams.
#[derive(Debug, Clone)]
pub struct FakeCamera {
    behavior: Arc<Mutex<CameraBehavior>>,
    counters: Arc<Counters>,
}

impl FakeCamera {
    pub fn new(behavior: CameraBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn set_behavior(&self, behavior: CameraBehavior) {
        if let Ok(mut current) = self.behavior.lock() {
            *current = behavior;
        }
    }

    pub fn open_calls(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.counters.stopped.load(Ordering::SeqCst)
    }

    /// Whether any stream handed out is still running.
    pub fn any_live(&self) -> bool {
        self.counters.live.load(Ordering::SeqCst) > 0
    }

    fn current(&self) -> CameraBehavior {
        self.behavior
            .lock()
            .map(|b| b.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn open(&self, _constraints: &VideoConstraints) -> Result<Box<dyn CameraStream>, PhotoError> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let (width, height, broken) = match self.current() {
            CameraBehavior::Available { width, height } => (width, height, false),
            CameraBehavior::BrokenFrames { width, height } => (width, height, true),
            CameraBehavior::Denied(reason) => return Err(PhotoError::CameraUnavailable(reason)),
        };
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            width,
            height,
            broken,
            live: true,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeStream {
    width: u32,
    height: u32,
    broken: bool,
    live: bool,
    counters: Arc<Counters>,
}

impl CameraStream for FakeStream {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn grab_frame(&mut self) -> Result<RgbaFrame, PhotoError> {
        if !self.live {
            return Err(PhotoError::CaptureFailure("stream stopped".to_string()));
        }
        if self.broken {
            return Err(PhotoError::CaptureFailure("device returned an empty frame".to_string()));
        }
        Ok(RgbaFrame::filled(self.width, self.height, [128, 128, 128, 255]))
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.counters.live.fetch_sub(1, Ordering::SeqCst);
            self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
