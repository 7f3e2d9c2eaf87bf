mod dispatch;
mod params;
mod read;

pub use dispatch::build_dispatch_config;
pub use params::build_toolkit;
pub use read::build_read_options;
