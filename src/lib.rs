#![doc(test(attr(deny(warnings))))]

//! Tutor Core keeps the records of a small tutoring center (students,
//! teachers, courses, payments, sessions, and expenses), tracks each
//! student's remaining prepaid hours per course, and derives financial,
//! attendance, and trend reports from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod reports;
pub mod storage;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tutor Core tracing initialized.");
    });
}
