//! This module contains the capture pipeline: the shared buffer of captured
//! entries, the single-slot flush scheduler and subscriber registration.
pub mod hub;
pub mod scheduler;

pub use hub::{CaptureHub, Subscriber, Subscription, DEFAULT_TIME_FORMAT};
pub use scheduler::FlushScheduler;
