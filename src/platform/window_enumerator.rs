//! Cross-platform window enumeration facade
//!
//! Lists the top-level windows a user could mirror. Window-mode target
//! resolution searches this list for a title match.

use serde::{Deserialize, Serialize};

/// A window that can be picked as a capture target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableWindow {
    /// Platform window identifier (HWND value on Windows).
    pub id: isize,
    /// User-visible title; untitled windows are filtered out upstream.
    pub title: String,
}

/// Contract every platform must implement to list capturable windows.
pub trait WindowEnumerator {
    /// Enumerate visible, titled top-level windows in z-order.
    fn enumerate_windows() -> anyhow::Result<Vec<AvailableWindow>>;
}

/// Platform-dispatched enumeration entrypoint.
pub fn enumerate_windows() -> anyhow::Result<Vec<AvailableWindow>> {
    PlatformWindowEnumerator::enumerate_windows()
}

// --- Windows implementation ---------------------------------------------

#[cfg(target_os = "windows")]
mod windows_impl {
    use super::{AvailableWindow, WindowEnumerator};
    use anyhow::{Context, Result};

    use windows::core::BOOL;
    use windows::Win32::Foundation::{HWND, LPARAM};
    use windows::Win32::Graphics::Dwm::{DwmGetWindowAttribute, DWMWA_CLOAKED};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowLongW, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible,
        GWL_EXSTYLE, WS_EX_TOOLWINDOW,
    };

    pub struct PlatformWindowEnumerator;

    impl WindowEnumerator for PlatformWindowEnumerator {
        fn enumerate_windows() -> Result<Vec<AvailableWindow>> {
            let mut windows: Vec<AvailableWindow> = Vec::new();

            unsafe {
                EnumWindows(
                    Some(enum_window),
                    LPARAM(&mut windows as *mut Vec<AvailableWindow> as isize),
                )
                .context("EnumWindows failed")?;
            }

            log::debug!("[WinEnum] Found {} titled top-level windows", windows.len());
            Ok(windows)
        }
    }

    /// Callback for EnumWindows - returns TRUE to keep enumerating
    unsafe extern "system" fn enum_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let list_ptr = lparam.0 as *mut Vec<AvailableWindow>;
        if list_ptr.is_null() {
            return BOOL(0);
        }

        if !IsWindowVisible(hwnd).as_bool() {
            return BOOL(1);
        }

        // Tool windows (palettes, notifications) are not mirror targets
        let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
        if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
            return BOOL(1);
        }

        // Cloaked windows live on another virtual desktop or are UWP shells
        let mut cloaked: i32 = 0;
        let _ = DwmGetWindowAttribute(
            hwnd,
            DWMWA_CLOAKED,
            &mut cloaked as *mut _ as *mut _,
            std::mem::size_of::<i32>() as u32,
        );
        if cloaked != 0 {
            return BOOL(1);
        }

        let Some(title) = read_title(hwnd) else {
            return BOOL(1);
        };

        (*list_ptr).push(AvailableWindow {
            id: hwnd.0 as isize,
            title,
        });

        BOOL(1)
    }

    /// Read a window title; `None` for untitled windows
    pub fn window_title(hwnd: HWND) -> Option<String> {
        unsafe { read_title(hwnd) }
    }

    unsafe fn read_title(hwnd: HWND) -> Option<String> {
        let length = GetWindowTextLengthW(hwnd);
        if length <= 0 {
            return None;
        }
        let mut buffer: Vec<u16> = vec![0; (length + 1) as usize];
        let read = GetWindowTextW(hwnd, &mut buffer);
        if read <= 0 {
            return None;
        }
        buffer.truncate(read as usize);
        let title = String::from_utf16_lossy(&buffer);
        if title.trim().is_empty() {
            return None;
        }
        Some(title)
    }
}

#[cfg(target_os = "windows")]
use windows_impl::PlatformWindowEnumerator;
#[cfg(target_os = "windows")]
pub use windows_impl::window_title;

// --- Fallback for platforms without a capture backend -------------------

#[cfg(not(target_os = "windows"))]
mod unsupported_impl {
    use super::{AvailableWindow, WindowEnumerator};
    use anyhow::Result;

    pub struct PlatformWindowEnumerator;

    impl WindowEnumerator for PlatformWindowEnumerator {
        fn enumerate_windows() -> Result<Vec<AvailableWindow>> {
            log::info!(
                "[WinEnum] Window enumeration not available on {} - returning empty list",
                std::env::consts::OS
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(not(target_os = "windows"))]
use unsupported_impl::PlatformWindowEnumerator;

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn enumeration_is_empty_without_backend() {
        assert!(enumerate_windows().unwrap().is_empty());
    }

    #[test]
    fn available_window_serializes() {
        let window = AvailableWindow {
            id: 0x1234,
            title: "Game".to_string(),
        };
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"id":4660,"title":"Game"}"#);
    }
}
