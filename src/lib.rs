//! Wayfinder - navigation session core for an accessible pedestrian
//! guidance screen
//!
//! A pure state machine drives a fixed walking route, speech preferences
//! and a rule-based assistant; a small tokio runtime owns the state and
//! runs the auto-advance and reroute timers.

pub mod assistant;
pub mod config;
pub mod route;
pub mod runtime;
pub mod settings;
pub mod state_machine;
pub mod view;
