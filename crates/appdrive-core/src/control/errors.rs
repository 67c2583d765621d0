use crate::errors::DriveError;

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error(
        "Accessibility permission required: enable in System Settings > Privacy & Security > Accessibility"
    )]
    AccessibilityPermissionDenied,

    #[error("No control {query} in window '{window}'")]
    ControlNotFound { query: String, window: String },

    #[error("Multiple controls match {query} in window '{window}': found {count}, expected 1")]
    ControlAmbiguous {
        query: String,
        window: String,
        count: usize,
    },

    #[error("Window '{title}' has no PID available (required for Accessibility API)")]
    NoPidAvailable { title: String },

    #[error("Accessibility query failed: {reason}")]
    AccessibilityQueryFailed { reason: String },

    #[error("Control enumeration is not supported on {platform}")]
    Unsupported { platform: &'static str },
}

impl DriveError for ControlError {
    fn error_code(&self) -> &'static str {
        match self {
            ControlError::AccessibilityPermissionDenied => "CONTROL_ACCESSIBILITY_DENIED",
            ControlError::ControlNotFound { .. } => "CONTROL_NOT_FOUND",
            ControlError::ControlAmbiguous { .. } => "CONTROL_AMBIGUOUS",
            ControlError::NoPidAvailable { .. } => "CONTROL_NO_PID",
            ControlError::AccessibilityQueryFailed { .. } => "CONTROL_QUERY_FAILED",
            ControlError::Unsupported { .. } => "CONTROL_UNSUPPORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, ControlError::AccessibilityQueryFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_not_found_error() {
        let error = ControlError::ControlNotFound {
            query: "button 'Regular'".to_string(),
            window: "Main".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No control button 'Regular' in window 'Main'"
        );
        assert_eq!(error.error_code(), "CONTROL_NOT_FOUND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_control_ambiguous_error() {
        let error = ControlError::ControlAmbiguous {
            query: "'2'".to_string(),
            window: "Calculator".to_string(),
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "Multiple controls match '2' in window 'Calculator': found 3, expected 1"
        );
        assert_eq!(error.error_code(), "CONTROL_AMBIGUOUS");
    }

    #[test]
    fn test_query_failed_is_not_user_error() {
        let error = ControlError::AccessibilityQueryFailed {
            reason: "timeout".to_string(),
        };
        assert_eq!(error.to_string(), "Accessibility query failed: timeout");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_permission_denied_error() {
        let error = ControlError::AccessibilityPermissionDenied;
        assert!(error.to_string().contains("Accessibility permission"));
        assert_eq!(error.error_code(), "CONTROL_ACCESSIBILITY_DENIED");
    }
}
