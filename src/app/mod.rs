//! Application core: pure domain logic, zero I/O.
//!
//! The press → link → request cycle lives here: link lifecycle, request
//! dispatch, and the controller that sequences them. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod dispatcher;
pub mod events;
pub mod link;
pub mod ports;
pub mod service;
