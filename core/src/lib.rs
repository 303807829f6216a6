//! # onnxport core
//!
//! Drives an ONNX conversion of a hub model:
//! * [`dependencies`]: checks the Python packages the exporter needs.
//! * [`exporter`]: runs the optimum ONNX exporter in a staging directory.
//! * [`hub`]: fetches the preprocessor configuration from the hub.
//! * [`verify`]: checks the output directory and reads the class labels.
//! * [`pipeline`]: sequences the above behind a single error boundary.

pub mod artifacts;
pub mod dependencies;
pub mod exporter;
pub mod hub;
pub mod pipeline;
pub mod verify;
