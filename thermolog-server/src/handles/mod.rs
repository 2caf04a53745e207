mod log_temp_handle;
mod statistics_handle;

pub use log_temp_handle::*;
pub use statistics_handle::*;
