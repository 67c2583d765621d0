//! In-memory desktop for integration tests.
//!
//! Hosts two fake applications: a calculator and a multi-window app whose
//! "Regular" button opens child windows. Windows can be scheduled to appear
//! and become interactive after a delay, clicks are hit-tested against the
//! topmost window, and keys go to the focused window.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use appdrive_core::control::{ControlError, ControlInfo, ControlRole, ControlTree};
use appdrive_core::desktop::Desktop;
use appdrive_core::input::{InputDriver, InputError, KeyCode, KeyStroke};
use appdrive_core::window::{WindowError, WindowInfo, WindowRegistry};

pub const CALCULATOR_TITLE: &str = "Calculator";
pub const MAIN_TITLE: &str = "Multi-Window Reference Application";
pub const REGULAR_TITLE: &str = "Regular";

const CALCULATOR_KEYS: [&str; 16] = [
    "7", "8", "9", "÷", "4", "5", "6", "×", "1", "2", "3", "−", "0", "C", "=", "+",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppKind {
    Calculator,
    MultiWindowMain,
    Regular,
}

#[derive(Debug, Default)]
struct Calc {
    entry: String,
    acc: Option<f64>,
    op: Option<char>,
    display: String,
}

impl Calc {
    fn input(&mut self, key: &str) {
        match key {
            "C" => *self = Calc::default(),
            "=" => {
                self.commit();
                self.op = None;
            }
            "×" | "*" | "÷" | "/" | "+" | "−" | "-" => {
                self.commit();
                self.op = key.chars().next();
            }
            digit if digit.chars().all(|c| c.is_ascii_digit()) => {
                self.entry.push_str(digit);
                self.display = self.entry.clone();
            }
            _ => {}
        }
    }

    fn commit(&mut self) {
        let Ok(value) = self.entry.parse::<f64>() else {
            return;
        };
        let result = match (self.acc, self.op) {
            (Some(acc), Some('×' | '*')) => acc * value,
            (Some(acc), Some('÷' | '/')) => acc / value,
            (Some(acc), Some('+')) => acc + value,
            (Some(acc), Some('−' | '-')) => acc - value,
            _ => value,
        };
        self.acc = Some(result);
        self.entry.clear();
        self.display = if result.fract() == 0.0 {
            format!("{}", result as i64)
        } else {
            format!("{}", result)
        };
    }

    fn display(&self) -> &str {
        if self.display.is_empty() {
            "0"
        } else {
            &self.display
        }
    }
}

#[derive(Debug)]
struct SimWindow {
    id: u32,
    title: String,
    app: &'static str,
    pid: u32,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    visible_at: Instant,
    ready_at: Option<Instant>,
    minimized: bool,
    kind: AppKind,
    calc: Calc,
}

impl SimWindow {
    fn info(&self, now: Instant) -> WindowInfo {
        let interactive = self.ready_at.is_some_and(|t| now >= t);
        WindowInfo::new(
            self.id,
            self.title.clone(),
            self.app.to_string(),
            self.x,
            self.y,
            self.width,
            self.height,
            self.minimized,
            interactive,
            Some(self.pid),
        )
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }

    fn controls(&self) -> Vec<ControlInfo> {
        let button = |title: &str, rx: i32, ry: i32, w: u32, h: u32| {
            ControlInfo::new(
                ControlRole::Button,
                Some(title.to_string()),
                None,
                self.x + rx,
                self.y + ry,
                w,
                h,
                true,
            )
        };
        match self.kind {
            AppKind::Calculator => {
                let mut controls = vec![ControlInfo::new(
                    ControlRole::Text,
                    None,
                    Some(self.calc.display().to_string()),
                    self.x + 10,
                    self.y + 10,
                    280,
                    40,
                    true,
                )];
                for (i, label) in CALCULATOR_KEYS.iter().enumerate() {
                    let col = (i % 4) as i32;
                    let row = (i / 4) as i32;
                    controls.push(button(label, 10 + col * 70, 60 + row * 50, 60, 40));
                }
                controls
            }
            AppKind::MultiWindowMain => vec![button("Regular", 20, 20, 120, 30)],
            AppKind::Regular => vec![
                button("Close", 20, 20, 100, 30),
                button("Create Regular Window", 20, 70, 200, 30),
            ],
        }
    }
}

#[derive(Debug, Default)]
struct SimState {
    windows: Vec<SimWindow>,
    next_id: u32,
    focused: Option<u32>,
    ignore_close: bool,
    refuse_close: bool,
    close_requests: usize,
    clicks: Vec<(i32, i32)>,
    keys: Vec<KeyStroke>,
}

impl SimState {
    fn add_window(
        &mut self,
        kind: AppKind,
        title: &str,
        app: &'static str,
        geometry: (i32, i32, u32, u32),
        appear_after: Duration,
        ready_after: Option<Duration>,
    ) -> u32 {
        self.next_id += 1;
        let now = Instant::now();
        let (x, y, width, height) = geometry;
        self.windows.push(SimWindow {
            id: self.next_id,
            title: title.to_string(),
            app,
            pid: 4242,
            x,
            y,
            width,
            height,
            visible_at: now + appear_after,
            ready_at: ready_after.map(|d| now + appear_after + d),
            minimized: false,
            kind,
            calc: Calc::default(),
        });
        self.next_id
    }

    fn open_regular(&mut self) {
        let n = self
            .windows
            .iter()
            .filter(|w| w.kind == AppKind::Regular)
            .count() as i32;
        let id = self.add_window(
            AppKind::Regular,
            REGULAR_TITLE,
            "multi_window_ref_app",
            (700 + n * 40, 100 + n * 40, 400, 300),
            Duration::ZERO,
            Some(Duration::ZERO),
        );
        self.focused = Some(id);
    }

    fn visible(&self, now: Instant) -> impl Iterator<Item = &SimWindow> {
        self.windows.iter().filter(move |w| now >= w.visible_at)
    }

    fn remove(&mut self, id: u32) {
        self.windows.retain(|w| w.id != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    fn press(&mut self, window_id: u32, label: &str) {
        let Some(index) = self.windows.iter().position(|w| w.id == window_id) else {
            return;
        };
        match (self.windows[index].kind, label) {
            (AppKind::Calculator, _) => self.windows[index].calc.input(label),
            (AppKind::MultiWindowMain, "Regular") => self.open_regular(),
            (AppKind::Regular, "Close") => self.remove(window_id),
            (AppKind::Regular, "Create Regular Window") => self.open_regular(),
            _ => {}
        }
    }
}

/// Shared handle; every clone drives the same desktop
#[derive(Debug, Clone, Default)]
pub struct SimulatedDesktop {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Desktop`] whose three backends all point at this simulation
    pub fn desktop(&self) -> Desktop {
        Desktop::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap()
    }

    /// Calculator window that is listed after `appear_after` and becomes
    /// interactive `ready_after` later
    pub fn open_calculator(&self, appear_after: Duration, ready_after: Duration) -> u32 {
        self.state().add_window(
            AppKind::Calculator,
            CALCULATOR_TITLE,
            "gnome-calculator",
            (100, 100, 300, 300),
            appear_after,
            Some(ready_after),
        )
    }

    pub fn open_multi_window_app(&self, appear_after: Duration) -> u32 {
        self.state().add_window(
            AppKind::MultiWindowMain,
            MAIN_TITLE,
            "multi_window_ref_app",
            (100, 100, 500, 400),
            appear_after,
            Some(Duration::ZERO),
        )
    }

    /// A window that is listed but never becomes interactive
    pub fn open_stuck_window(&self, title: &str) -> u32 {
        self.state().add_window(
            AppKind::Regular,
            title,
            "stuck",
            (0, 0, 200, 200),
            Duration::ZERO,
            None,
        )
    }

    pub fn minimize(&self, id: u32) {
        if let Some(window) = self.state().windows.iter_mut().find(|w| w.id == id) {
            window.minimized = true;
        }
    }

    /// Accept close requests but leave windows open
    pub fn ignore_close_requests(&self) {
        self.state().ignore_close = true;
    }

    /// Fail close requests the way a registry without a close mechanism does
    pub fn refuse_close_requests(&self) {
        self.state().refuse_close = true;
    }

    pub fn close_requests(&self) -> usize {
        self.state().close_requests
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.state().clicks.clone()
    }

    pub fn keys(&self) -> Vec<KeyStroke> {
        self.state().keys.clone()
    }

    pub fn window_count(&self, title: &str) -> usize {
        self.state().windows.iter().filter(|w| w.title == title).count()
    }
}

impl WindowRegistry for SimulatedDesktop {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let now = Instant::now();
        Ok(self.state().visible(now).map(|w| w.info(now)).collect())
    }

    fn focus_window(&self, window: &WindowInfo) -> Result<(), WindowError> {
        let mut state = self.state();
        let Some(index) = state.windows.iter().position(|w| w.id == window.id()) else {
            return Err(WindowError::FocusFailed {
                title: window.title().to_string(),
                reason: "window is gone".to_string(),
            });
        };
        // Raise to the top of the stacking order
        let raised = state.windows.remove(index);
        state.windows.push(raised);
        state.focused = Some(window.id());
        Ok(())
    }

    fn close_window(&self, window: &WindowInfo) -> Result<(), WindowError> {
        let mut state = self.state();
        state.close_requests += 1;
        if state.refuse_close {
            return Err(WindowError::Unsupported {
                operation: "close",
                platform: "simulated",
            });
        }
        if !state.windows.iter().any(|w| w.id == window.id()) {
            return Err(WindowError::CloseFailed {
                title: window.title().to_string(),
                reason: "window is gone".to_string(),
            });
        }
        if !state.ignore_close {
            state.remove(window.id());
        }
        Ok(())
    }
}

impl ControlTree for SimulatedDesktop {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn controls(&self, window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        self.state()
            .windows
            .iter()
            .find(|w| w.id == window.id())
            .map(SimWindow::controls)
            .ok_or_else(|| ControlError::AccessibilityQueryFailed {
                reason: format!("window {} is gone", window.id()),
            })
    }
}

impl InputDriver for SimulatedDesktop {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn click_at(&self, x: i32, y: i32) -> Result<(), InputError> {
        let mut state = self.state();
        state.clicks.push((x, y));

        let now = Instant::now();
        let hit = state
            .visible(now)
            .filter(|w| w.contains(x, y))
            .last()
            .and_then(|w| {
                w.controls()
                    .into_iter()
                    .find(|c| {
                        x >= c.x()
                            && y >= c.y()
                            && x < c.x() + c.width() as i32
                            && y < c.y() + c.height() as i32
                    })
                    .and_then(|c| c.title().map(|t| (w.id, t.to_string())))
            });

        if let Some((window_id, label)) = hit {
            state.press(window_id, &label);
        }
        Ok(())
    }

    fn send_keys(&self, strokes: &[KeyStroke]) -> Result<(), InputError> {
        let mut state = self.state();
        state.keys.extend_from_slice(strokes);

        for stroke in strokes {
            let Some(focused) = state.focused else {
                continue;
            };
            if stroke.modifiers.alt && stroke.key == KeyCode::F(4) {
                state.remove(focused);
                continue;
            }
            let label = match stroke.key {
                KeyCode::Char(c) => c.to_string(),
                KeyCode::Enter => "=".to_string(),
                KeyCode::Escape => "C".to_string(),
                _ => continue,
            };
            state.press(focused, &label);
        }
        Ok(())
    }
}

/// Retry interval short enough to keep tests fast
pub fn fast_wait(timeout_ms: u64) -> appdrive_core::window::WaitOptions {
    appdrive_core::window::WaitOptions::from_millis(timeout_ms, 20)
}
