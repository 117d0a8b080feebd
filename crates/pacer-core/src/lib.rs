//! Text-to-unit pipeline and timed RSVP playback engine.
//!
//! The crate is `no_std` and only needs an allocator: hosts bring their own clock,
//! renderer and settings storage through the traits in [`timer`], [`render`] and
//! [`settings`].

#![no_std]

extern crate alloc;

pub mod content;
pub mod focus;
pub mod input;
pub mod playback;
pub mod render;
pub mod settings;
pub mod timer;
