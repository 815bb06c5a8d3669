//! Modules bundled with the core.

pub mod demo;

pub use demo::DemoModule;
