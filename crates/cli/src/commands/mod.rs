//! Command implementations.

mod device;
mod info;
mod run;
mod validate;

pub use device::{run_bootloader, run_led, run_servo};
pub use info::run_info;
pub use run::run_sweep;
pub use validate::run_validate;
