// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod config;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From config.rs
pub use config::{SensorConfig, WarmupPolicy};

// From error.rs
pub use error::{error_code, ConfigError, Mhz14Error, ReadError};

// From frame.rs
pub use frame::{
    checksum, encode_request, parse_response, verify_frame, FrameError, Reading, FRAME_LEN,
};

// From hal_traits.rs
pub use hal_traits::{Mhz14Serial, Mhz14Timer};

// Native HAL integration (from hal_traits.rs)
#[cfg(feature = "impl-generic-hal")]
pub use hal_traits::DelayClock;
