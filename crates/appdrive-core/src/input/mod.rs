pub mod driver;
pub mod errors;
pub mod handler;
pub mod keys;
pub mod types;

pub use driver::{EnigoInputDriver, InputDriver};
pub use errors::InputError;
pub use handler::send_strokes;
pub use keys::parse_key_sequence;
pub use types::{KeyCode, KeyStroke, Modifiers};
