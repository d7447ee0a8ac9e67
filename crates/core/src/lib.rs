#![deny(warnings)]

pub mod clock;
pub mod config;
pub mod emotion;
pub mod render;
pub mod session;
pub mod speech;
pub mod visualizer;
pub mod waveform;
