//! Core song representation for the Oktalyzer module loader.
//!
//! This crate defines the in-memory form of a decoded module: samples,
//! patterns, order list and per-channel settings. The format parser emits
//! these types, and a playback engine consumes them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod effects;
mod pattern;
mod sample;
pub mod song;

pub use effects::Effect;
pub use pattern::{Cell, Note, Pattern};
pub use sample::{LoopType, Sample, SampleData};
pub use song::{ChannelSettings, OrderEntry, Song};
