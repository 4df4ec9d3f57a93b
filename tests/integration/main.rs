//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against recording adapters and the simulated bus.  All tests run on
//! the host with no real hardware required.

mod end_to_end_tests;
mod master_tests;
mod mock_hw;
