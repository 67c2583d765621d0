//! Thin owning wrapper over macOS Accessibility (AX) elements.
//!
//! Every `AxElement` holds a +1 retained `AXUIElementRef` and releases it on
//! drop, so callers never pair Create/Copy with CFRelease by hand.

use std::ffi::c_void;
use std::ptr;

use accessibility_sys::{
    AXError, AXUIElementCopyAttributeValue, AXUIElementCreateApplication,
    AXUIElementPerformAction, AXUIElementRef, AXUIElementSetAttributeValue,
    AXUIElementSetMessagingTimeout, AXValueGetValue, AXValueRef, kAXErrorSuccess,
    kAXValueTypeCGPoint, kAXValueTypeCGSize,
};
use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFRelease, CFRetain, CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::string::CFString;
use core_graphics::geometry::{CGPoint, CGSize};

/// Timeout for AX messaging (seconds)
const AX_MESSAGING_TIMEOUT: f32 = 1.0;

pub(crate) const ATTR_WINDOWS: &str = "AXWindows";
pub(crate) const ATTR_CHILDREN: &str = "AXChildren";
pub(crate) const ATTR_ROLE: &str = "AXRole";
pub(crate) const ATTR_TITLE: &str = "AXTitle";
pub(crate) const ATTR_VALUE: &str = "AXValue";
pub(crate) const ATTR_DESCRIPTION: &str = "AXDescription";
pub(crate) const ATTR_ENABLED: &str = "AXEnabled";
pub(crate) const ATTR_POSITION: &str = "AXPosition";
pub(crate) const ATTR_SIZE: &str = "AXSize";
pub(crate) const ATTR_CLOSE_BUTTON: &str = "AXCloseButton";
pub(crate) const ATTR_RAISED: &str = "AXRaised";
pub(crate) const ATTR_MAIN: &str = "AXMain";
pub(crate) const ACTION_PRESS: &str = "AXPress";

// SAFETY: FFI declaration for AXIsProcessTrusted from macOS ApplicationServices framework.
// Returns false when the process lacks accessibility permissions (does not crash).
#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

/// Whether this process has been granted accessibility permission
pub(crate) fn is_trusted() -> bool {
    unsafe { AXIsProcessTrusted() }
}

pub(crate) struct AxElement(AXUIElementRef);

impl AxElement {
    /// AX element for a running application
    pub(crate) fn application(pid: i32) -> Option<Self> {
        // SAFETY: AXUIElementCreateApplication creates a +1 retained AXUIElementRef.
        let element = unsafe { AXUIElementCreateApplication(pid) };
        if element.is_null() {
            return None;
        }
        // SAFETY: element is a valid AXUIElementRef we just created.
        unsafe {
            AXUIElementSetMessagingTimeout(element, AX_MESSAGING_TIMEOUT);
        }
        Some(Self(element))
    }

    fn copy_attribute(&self, attribute: &str) -> Option<CFType> {
        let cf_attr = CFString::new(attribute);
        let mut value: CFTypeRef = ptr::null();

        // SAFETY: Standard AXUIElementCopyAttributeValue (Copy Rule: +1 retained on success).
        let result = unsafe {
            AXUIElementCopyAttributeValue(self.0, cf_attr.as_concrete_TypeRef(), &mut value)
        };

        if result != kAXErrorSuccess as AXError || value.is_null() {
            return None;
        }

        // SAFETY: value is a +1 retained CFTypeRef. wrap_under_create_rule takes ownership.
        Some(unsafe { CFType::wrap_under_create_rule(value) })
    }

    pub(crate) fn string_attribute(&self, attribute: &str) -> Option<String> {
        self.copy_attribute(attribute)?
            .downcast::<CFString>()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    }

    pub(crate) fn bool_attribute(&self, attribute: &str) -> Option<bool> {
        self.copy_attribute(attribute)?
            .downcast::<CFBoolean>()
            .map(bool::from)
    }

    /// Read an attribute holding an array of AX elements (AXWindows, AXChildren)
    pub(crate) fn elements_attribute(&self, attribute: &str) -> Vec<AxElement> {
        let Some(value) = self.copy_attribute(attribute) else {
            return Vec::new();
        };

        // SAFETY: AXWindows/AXChildren are CFArrays of AXUIElementRefs. The array keeps
        // its own retain on `value`; get_rule does not take ownership.
        let array: CFArray<CFType> =
            unsafe { CFArray::wrap_under_get_rule(value.as_CFTypeRef() as CFArrayRef) };

        array
            .iter()
            .map(|item| {
                let raw = item.as_CFTypeRef();
                // SAFETY: Items are borrowed from the array; retain so the wrapper owns one.
                unsafe { CFRetain(raw) };
                AxElement(raw as AXUIElementRef)
            })
            .collect()
    }

    /// Read a single-element attribute (e.g. AXCloseButton)
    pub(crate) fn element_attribute(&self, attribute: &str) -> Option<AxElement> {
        let value = self.copy_attribute(attribute)?;
        let raw = value.as_CFTypeRef();
        // SAFETY: `value` releases its reference on drop; take our own first.
        unsafe { CFRetain(raw) };
        Some(AxElement(raw as AXUIElementRef))
    }

    /// Screen-absolute top-left corner
    pub(crate) fn position(&self) -> Option<(f64, f64)> {
        let value = self.copy_attribute(ATTR_POSITION)?;
        let mut point = CGPoint::new(0.0, 0.0);
        // SAFETY: AXPosition is an AXValue of type CGPoint; point is a valid out-pointer.
        let ok = unsafe {
            AXValueGetValue(
                value.as_CFTypeRef() as AXValueRef,
                kAXValueTypeCGPoint,
                &mut point as *mut CGPoint as *mut c_void,
            )
        };
        ok.then_some((point.x, point.y))
    }

    pub(crate) fn size(&self) -> Option<(f64, f64)> {
        let value = self.copy_attribute(ATTR_SIZE)?;
        let mut size = CGSize::new(0.0, 0.0);
        // SAFETY: AXSize is an AXValue of type CGSize; size is a valid out-pointer.
        let ok = unsafe {
            AXValueGetValue(
                value.as_CFTypeRef() as AXValueRef,
                kAXValueTypeCGSize,
                &mut size as *mut CGSize as *mut c_void,
            )
        };
        ok.then_some((size.width, size.height))
    }

    pub(crate) fn perform_action(&self, action: &str) -> Result<(), AXError> {
        let cf_action = CFString::new(action);
        // SAFETY: Performing an action on a valid element.
        let result = unsafe { AXUIElementPerformAction(self.0, cf_action.as_concrete_TypeRef()) };
        if result != kAXErrorSuccess {
            return Err(result);
        }
        Ok(())
    }

    pub(crate) fn set_bool_attribute(&self, attribute: &str, value: bool) -> Result<(), AXError> {
        let cf_attr = CFString::new(attribute);
        let cf_value = if value {
            CFBoolean::true_value()
        } else {
            CFBoolean::false_value()
        };
        // SAFETY: Setting attribute value on a valid element.
        let result = unsafe {
            AXUIElementSetAttributeValue(
                self.0,
                cf_attr.as_concrete_TypeRef(),
                cf_value.as_CFTypeRef(),
            )
        };
        if result != kAXErrorSuccess {
            return Err(result);
        }
        Ok(())
    }

    /// Find one of the app's windows whose title equals `title`
    pub(crate) fn find_window(&self, title: &str) -> Option<AxElement> {
        self.elements_attribute(ATTR_WINDOWS)
            .into_iter()
            .find(|w| w.string_attribute(ATTR_TITLE).as_deref() == Some(title))
    }
}

impl Drop for AxElement {
    fn drop(&mut self) {
        // SAFETY: We own exactly one retain on this element.
        unsafe { CFRelease(self.0 as *mut c_void) };
    }
}
