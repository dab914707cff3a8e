//! Core of the webwindow bridge: the engine object model, the opaque
//! handle registry, host listener lifetime management and the event
//! translation protocol.
//!
//! This crate is host-agnostic. The Node.js addon
//! (`webwindow-native`) plugs in on both sides: it implements
//! [`engine::Engine`] over the vendor SDK's embedding API and
//! [`host::HostWindowListener`] / [`host::HostViewListener`] over
//! JavaScript objects. Everything in between — which events reach the
//! host, what the host's return values mean to the engine, and when a
//! host reference is released — lives here, where it can be tested
//! without a Node.js process or a vendor SDK.
//!
//! All state is thread-local: the engine runs one UI loop and every
//! entry point and callback executes on that loop's thread.

pub mod bridge;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod listener;
pub mod registry;
pub mod window;

#[cfg(test)]
pub(crate) mod mock;
