// capture/windows.rs - Windows GDI capture backend
//
// Copies a window's client area (or the primary display) with BitBlt into a
// compatible bitmap, then reads it back as a bottom-up 32-bit DIB.
// Each GDI handle is held by a guard so every exit path releases it, and the
// session's field order gives reverse-acquisition teardown.

use log::{debug, info};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC,
    HGDIOBJ, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetSystemMetrics, IsWindow, SM_CXSCREEN, SM_CYSCREEN,
};

use super::target::title_matches;
use super::{
    CaptureCriteria, CaptureError, CapturePlatform, CaptureResult, CaptureSession, CaptureTarget,
    FrameSize, RowOrder,
};
use crate::platform::window_enumerator::{enumerate_windows, window_title};

fn hwnd_from(handle: isize) -> HWND {
    HWND(handle as *mut std::ffi::c_void)
}

/// Device context of the capture source, from `GetDC`
struct SourceDc {
    hwnd: Option<HWND>,
    hdc: HDC,
}

impl SourceDc {
    fn acquire(hwnd: Option<HWND>) -> CaptureResult<Self> {
        let hdc = unsafe { GetDC(hwnd) };
        if hdc.is_invalid() {
            return Err(CaptureError::ResourceAllocationFailed(
                "GetDC returned no device context".to_string(),
            ));
        }
        Ok(Self { hwnd, hdc })
    }
}

impl Drop for SourceDc {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseDC(self.hwnd, self.hdc);
        }
    }
}

/// Off-screen DC compatible with the source
struct MemoryDc {
    hdc: HDC,
}

impl MemoryDc {
    fn create(source: &SourceDc) -> CaptureResult<Self> {
        let hdc = unsafe { CreateCompatibleDC(Some(source.hdc)) };
        if hdc.is_invalid() {
            return Err(CaptureError::ResourceAllocationFailed(
                "CreateCompatibleDC failed".to_string(),
            ));
        }
        Ok(Self { hdc })
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.hdc);
        }
    }
}

/// Compatible bitmap selected into the memory DC.
/// Dropping restores the DC's previous object before deleting the bitmap.
struct SelectedBitmap {
    dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
}

impl SelectedBitmap {
    fn create(source: &SourceDc, memory: &MemoryDc, size: FrameSize) -> CaptureResult<Self> {
        unsafe {
            let bitmap =
                CreateCompatibleBitmap(source.hdc, size.width() as i32, size.height() as i32);
            if bitmap.is_invalid() {
                return Err(CaptureError::ResourceAllocationFailed(format!(
                    "CreateCompatibleBitmap failed for {}",
                    size
                )));
            }

            let previous = SelectObject(memory.hdc, bitmap.into());
            if previous.0.is_null() {
                let _ = DeleteObject(bitmap.into());
                return Err(CaptureError::ResourceAllocationFailed(
                    "SelectObject failed for capture bitmap".to_string(),
                ));
            }

            Ok(Self {
                dc: memory.hdc,
                bitmap,
                previous,
            })
        }
    }
}

impl Drop for SelectedBitmap {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
            let _ = DeleteObject(self.bitmap.into());
        }
    }
}

/// GDI resources for one target at one size.
///
/// Fields drop top to bottom: bitmap, memory DC, then source DC.
pub struct GdiSession {
    bitmap: SelectedBitmap,
    memory: MemoryDc,
    source: SourceDc,
    staging: Vec<u8>,
    size: FrameSize,
}

impl GdiSession {
    fn new(target: &CaptureTarget, size: FrameSize) -> CaptureResult<Self> {
        let hwnd = match target {
            CaptureTarget::PrimaryDisplay => None,
            CaptureTarget::Window { handle, .. } => Some(hwnd_from(*handle)),
        };

        let source = SourceDc::acquire(hwnd)?;
        let memory = MemoryDc::create(&source)?;
        let bitmap = SelectedBitmap::create(&source, &memory, size)?;

        let mut staging = Vec::new();
        staging
            .try_reserve_exact(size.staging_len())
            .map_err(|e| {
                CaptureError::ResourceAllocationFailed(format!(
                    "staging buffer for {}: {}",
                    size, e
                ))
            })?;
        staging.resize(size.staging_len(), 0);

        debug!("Allocated GDI capture session for {} at {}", target, size);
        Ok(Self {
            bitmap,
            memory,
            source,
            staging,
            size,
        })
    }
}

impl CaptureSession for GdiSession {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn row_order(&self) -> RowOrder {
        RowOrder::BottomUp
    }

    fn transfer(&mut self) -> CaptureResult<&[u8]> {
        let width = self.size.width() as i32;
        let height = self.size.height() as i32;

        unsafe {
            BitBlt(
                self.memory.hdc,
                0,
                0,
                width,
                height,
                Some(self.source.hdc),
                0,
                0,
                SRCCOPY,
            )
            .map_err(|e| CaptureError::TransferFailed(format!("BitBlt failed: {}", e)))?;

            // Positive height asks for a bottom-up DIB
            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let scanlines = GetDIBits(
                self.memory.hdc,
                self.bitmap.bitmap,
                0,
                height as u32,
                Some(self.staging.as_mut_ptr() as *mut _),
                &mut bmi,
                DIB_RGB_COLORS,
            );
            if scanlines == 0 {
                return Err(CaptureError::TransferFailed(
                    "GetDIBits copied no scanlines".to_string(),
                ));
            }
        }

        Ok(&self.staging)
    }
}

/// GDI capture backend (BitBlt + GetDIBits)
pub struct GdiCapturePlatform;

impl GdiCapturePlatform {
    pub fn new() -> Self {
        info!("Using GDI capture backend");
        Self
    }
}

impl Default for GdiCapturePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CapturePlatform for GdiCapturePlatform {
    type Session = GdiSession;

    fn name(&self) -> &'static str {
        "gdi"
    }

    fn resolve(&self, criteria: &CaptureCriteria) -> CaptureResult<CaptureTarget> {
        let wanted = match criteria {
            CaptureCriteria::PrimaryDisplay => return Ok(CaptureTarget::PrimaryDisplay),
            CaptureCriteria::Window { title } => title,
        };

        let windows = enumerate_windows().map_err(|e| {
            CaptureError::TargetUnavailable(format!("window enumeration failed: {:#}", e))
        })?;

        windows
            .into_iter()
            .find(|w| title_matches(&w.title, wanted))
            .map(|w| CaptureTarget::Window {
                handle: w.id,
                title: w.title,
            })
            .ok_or_else(|| {
                CaptureError::TargetUnavailable(format!("no window titled \"{}\"", wanted))
            })
    }

    fn is_still_valid(&self, target: &CaptureTarget) -> bool {
        match target {
            CaptureTarget::PrimaryDisplay => true,
            CaptureTarget::Window { handle, .. } => {
                let hwnd = hwnd_from(*handle);
                if !unsafe { IsWindow(Some(hwnd)) }.as_bool() {
                    return false;
                }
                target.still_answers_to(window_title(hwnd).as_deref())
            }
        }
    }

    fn current_size(&self, target: &CaptureTarget) -> Option<FrameSize> {
        match target {
            CaptureTarget::PrimaryDisplay => unsafe {
                FrameSize::new(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN))
            },
            CaptureTarget::Window { handle, .. } => {
                let mut rect = RECT::default();
                unsafe { GetClientRect(hwnd_from(*handle), &mut rect) }.ok()?;
                FrameSize::new(rect.right - rect.left, rect.bottom - rect.top)
            }
        }
    }

    fn create_session(
        &self,
        target: &CaptureTarget,
        size: FrameSize,
    ) -> CaptureResult<Self::Session> {
        GdiSession::new(target, size)
    }
}
