//! # Marching Voxels Entry Point
//!
//! This is the main entry point for the headless engine binary. It simply calls
//! into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- config.json
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match marching_voxels::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
