use tracing::info;

use super::driver::InputDriver;
use super::errors::InputError;
use super::types::KeyStroke;

/// Send already-parsed keystrokes through the driver. Returns how many were
/// sent.
pub fn send_strokes(driver: &dyn InputDriver, strokes: &[KeyStroke]) -> Result<usize, InputError> {
    info!(
        event = "core.input.send_started",
        strokes = strokes.len(),
        backend = driver.name()
    );

    driver.send_keys(strokes)?;

    info!(event = "core.input.send_completed", strokes = strokes.len());
    Ok(strokes.len())
}
