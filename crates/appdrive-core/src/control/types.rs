use serde::{Deserialize, Serialize};

/// Normalized control type.
///
/// Accessibility backends name roles differently (`AXButton` on macOS,
/// `push button` in AT-SPI, `Button` in UI Automation); all of them map onto
/// this enum so queries stay platform-neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlRole {
    Button,
    Text,
    TextField,
    Window,
    Group,
    MenuItem,
    Other(String),
}

impl ControlRole {
    /// Map a backend-specific role name onto a normalized role
    pub fn from_platform(role: &str) -> Self {
        let normalized = role
            .trim_start_matches("AX")
            .to_lowercase()
            .replace([' ', '_'], "");
        match normalized.as_str() {
            "button" | "pushbutton" | "togglebutton" => ControlRole::Button,
            "statictext" | "text" | "label" => ControlRole::Text,
            "textfield" | "textarea" | "entry" | "edit" => ControlRole::TextField,
            "window" | "frame" | "dialog" => ControlRole::Window,
            "group" | "pane" | "panel" | "scrollarea" => ControlRole::Group,
            "menuitem" => ControlRole::MenuItem,
            _ => ControlRole::Other(role.to_string()),
        }
    }
}

impl std::fmt::Display for ControlRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlRole::Button => write!(f, "button"),
            ControlRole::Text => write!(f, "text"),
            ControlRole::TextField => write!(f, "text_field"),
            ControlRole::Window => write!(f, "window"),
            ControlRole::Group => write!(f, "group"),
            ControlRole::MenuItem => write!(f, "menu_item"),
            ControlRole::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Snapshot of one accessibility element inside a window.
///
/// Coordinates are screen-absolute so they can be handed straight to the
/// input driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlInfo {
    role: ControlRole,
    title: Option<String>,
    value: Option<String>,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    enabled: bool,
}

impl ControlInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        role: ControlRole,
        title: Option<String>,
        value: Option<String>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        enabled: bool,
    ) -> Self {
        Self {
            role,
            title,
            value,
            x,
            y,
            width,
            height,
            enabled,
        }
    }

    pub fn role(&self) -> &ControlRole {
        &self.role
    }
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
    pub fn x(&self) -> i32 {
        self.x
    }
    pub fn y(&self) -> i32 {
        self.y
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Screen-absolute center point, used as the click target
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Whether the control displays `text` as its title or value
    pub fn shows_text(&self, text: &str) -> bool {
        self.title() == Some(text) || self.value() == Some(text)
    }

    /// Whether `text` is content shown by the control rather than a label.
    ///
    /// Button captions do not count, so a calculator's "4" key does not
    /// satisfy a check for a result of 4.
    pub fn displays_text(&self, text: &str) -> bool {
        self.value() == Some(text)
            || (self.role == ControlRole::Text && self.title() == Some(text))
    }
}

/// Which control a lookup targets.
///
/// `title` matches the control's title or, failing that, its value exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlQuery {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<ControlRole>,
}

impl ControlQuery {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            role: None,
        }
    }

    pub fn button(title: impl Into<String>) -> Self {
        Self::new(title).with_role(ControlRole::Button)
    }

    pub fn with_role(mut self, role: ControlRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> Option<&ControlRole> {
        self.role.as_ref()
    }

    pub fn matches(&self, control: &ControlInfo) -> bool {
        if let Some(ref role) = self.role
            && control.role() != role
        {
            return false;
        }
        control.shows_text(&self.title)
    }
}

impl std::fmt::Display for ControlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.role {
            Some(ref role) => write!(f, "{} '{}'", role, self.title),
            None => write!(f, "'{}'", self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(title: &str) -> ControlInfo {
        ControlInfo::new(
            ControlRole::Button,
            Some(title.to_string()),
            None,
            100,
            200,
            40,
            20,
            true,
        )
    }

    #[test]
    fn test_role_from_platform_names() {
        assert_eq!(ControlRole::from_platform("AXButton"), ControlRole::Button);
        assert_eq!(ControlRole::from_platform("push button"), ControlRole::Button);
        assert_eq!(ControlRole::from_platform("AXStaticText"), ControlRole::Text);
        assert_eq!(ControlRole::from_platform("AXTextField"), ControlRole::TextField);
        assert_eq!(ControlRole::from_platform("frame"), ControlRole::Window);
        assert_eq!(
            ControlRole::from_platform("AXSlider"),
            ControlRole::Other("AXSlider".to_string())
        );
    }

    #[test]
    fn test_role_from_atspi_and_uia_names() {
        assert_eq!(ControlRole::from_platform("toggle button"), ControlRole::Button);
        assert_eq!(ControlRole::from_platform("label"), ControlRole::Text);
        assert_eq!(ControlRole::from_platform("entry"), ControlRole::TextField);
        assert_eq!(ControlRole::from_platform("menu item"), ControlRole::MenuItem);
        assert_eq!(
            ControlRole::from_platform("scroll pane"),
            ControlRole::Other("scroll pane".to_string())
        );
        assert_eq!(ControlRole::from_platform("Button"), ControlRole::Button);
        assert_eq!(ControlRole::from_platform("Edit"), ControlRole::TextField);
        assert_eq!(ControlRole::from_platform("Pane"), ControlRole::Group);
        assert_eq!(ControlRole::from_platform("MenuItem"), ControlRole::MenuItem);
    }

    #[test]
    fn test_center() {
        assert_eq!(button("2").center(), (120, 210));
    }

    #[test]
    fn test_query_matches_title_and_role() {
        let query = ControlQuery::button("Regular");
        assert!(query.matches(&button("Regular")));
        assert!(!query.matches(&button("Close")));

        let text = ControlInfo::new(
            ControlRole::Text,
            Some("Regular".to_string()),
            None,
            0,
            0,
            10,
            10,
            true,
        );
        assert!(!query.matches(&text));
        assert!(ControlQuery::new("Regular").matches(&text));
    }

    #[test]
    fn test_query_matches_value() {
        let display = ControlInfo::new(
            ControlRole::TextField,
            None,
            Some("42".to_string()),
            0,
            0,
            200,
            30,
            true,
        );
        assert!(ControlQuery::new("42").matches(&display));
        assert!(!ControlQuery::new("4").matches(&display));
    }

    #[test]
    fn test_displays_text_ignores_button_captions() {
        let key = ControlInfo::new(ControlRole::Button, Some("4".into()), None, 0, 0, 10, 10, true);
        let label = ControlInfo::new(ControlRole::Text, Some("4".into()), None, 0, 0, 10, 10, true);
        let entry = ControlInfo::new(ControlRole::TextField, None, Some("4".into()), 0, 0, 10, 10, true);
        assert!(key.shows_text("4"));
        assert!(!key.displays_text("4"));
        assert!(label.displays_text("4"));
        assert!(entry.displays_text("4"));
    }

    #[test]
    fn test_query_display() {
        assert_eq!(ControlQuery::button("Close").to_string(), "button 'Close'");
        assert_eq!(ControlQuery::new("=").to_string(), "'='");
    }
}
