pub mod errors;
pub mod handler;

pub use errors::InteractError;
pub use handler::{
    click_and_expect_window, click_control, find_control, focus, send_keys, wait_for_text,
};
