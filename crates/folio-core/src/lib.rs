#![forbid(unsafe_code)]

//! Core: page geometry, sections, scroll-spy, typewriter, and reveal animations.
//!
//! Everything in this crate is plain state. Nothing here owns a timer, a
//! listener, or a clock; hosts drive it by calling into the state machines.

pub mod animation;
pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod icon;
pub mod nav;
pub mod scroll_spy;
pub mod section;
pub mod theme;
pub mod typewriter;
