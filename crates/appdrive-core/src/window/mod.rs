pub mod errors;
pub mod handler;
pub mod native;
pub mod registry;
pub mod types;

pub use errors::WindowError;
pub use handler::{
    count_windows, find_ready_window, find_windows, require_window, wait_for_window,
    wait_for_window_closed,
};
pub use native::NativeWindowRegistry;
pub use registry::WindowRegistry;
pub use types::{TitleMatch, WaitOptions, WindowInfo, WindowQuery};
