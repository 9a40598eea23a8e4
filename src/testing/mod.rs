//! In-process stand-ins for the camera and the record service.
//!
//! Used by unit and integration tests, and by `run --dry-run` to walk the
//! whole wizard without touching the network.
//!
//! ```rust
//! use tg_onboarding::testing::{CameraBehavior, FakeCamera, InMemoryRecords};
//!
//! let camera = FakeCamera::new(CameraBehavior::Available { width: 640, height: 480 });
//! let records = InMemoryRecords::new();
//! assert_eq!(records.create_count(), 0);
//! assert!(!camera.any_live());
//! ```

pub mod camera;
pub mod records;

pub use camera::{CameraBehavior, FakeCamera};
pub use records::{InMemoryRecords, RecordCall};
