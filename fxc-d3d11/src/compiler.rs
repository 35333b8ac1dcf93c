//! Vendor HLSL compiler loading and invocation.
//!
//! `D3DCompile` usage (entry point CString, `ID3DBlob` error-buffer
//! extraction via `GetBufferPointer`/`GetBufferSize`) follows the same
//! shape as `gfx-rs/gfx`'s `compile_hlsl_shader`. The "try d3dcompiler_47,
//! fall back to 43" library resolution follows `legion-labs/legion`'s
//! compiler-library-selection shape (there: a `TargetProfile`-keyed
//! compiler handle wrapped for reuse across calls; here: a versioned DLL
//! name list tried in order).

#![cfg(windows)]

use fxc_diag::CompileError;
use std::ffi::{CString, OsStr};
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use wio::com::ComPtr;

use winapi::shared::minwindef::HMODULE;
use winapi::shared::winerror::SUCCEEDED;
use winapi::um::d3dcommon::ID3DBlob;
use winapi::um::d3dcompiler::{pD3DCompile, D3DCOMPILE_ENABLE_STRICTNESS};
use winapi::um::libloaderapi::{FreeLibrary, GetProcAddress, LoadLibraryW};

const PREFERRED_VERSIONS: &[u32] = &[47, 43];

fn wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

/// A loaded `d3dcompiler_NN.dll`, freed on drop.
pub struct VendorCompiler {
    module: HMODULE,
    compile_fn: pD3DCompile,
}

impl VendorCompiler {
    /// Loads the first available library from [`PREFERRED_VERSIONS`]
    ///. Environment error if none load.
    pub fn load(versions: &[u32]) -> Result<VendorCompiler, CompileError> {
        let versions = if versions.is_empty() { PREFERRED_VERSIONS } else { versions };
        for &version in versions {
            let name = format!("d3dcompiler_{}.dll", version);
            let wide_name = wide(&name);
            let module = unsafe { LoadLibraryW(wide_name.as_ptr()) };
            if module.is_null() {
                continue;
            }
            let proc_name = CString::new("D3DCompile").unwrap();
            let proc = unsafe { GetProcAddress(module, proc_name.as_ptr()) };
            if proc.is_null() {
                unsafe {
                    FreeLibrary(module);
                }
                continue;
            }
            let compile_fn: pD3DCompile = unsafe { std::mem::transmute(proc) };
            return Ok(VendorCompiler { module, compile_fn });
        }
        Err(CompileError::Environment(
            "could not load d3dcompiler_47.dll or d3dcompiler_43.dll".to_string(),
        ))
    }

    /// Compiles one entry point to 5_0 bytecode.
    pub fn compile(
        &self,
        source: &str,
        entry: &str,
        is_pixel_stage: bool,
    ) -> Result<ComPtr<ID3DBlob>, CompileError> {
        let target = if is_pixel_stage { "ps_5_0\0" } else { "vs_5_0\0" };
        let entry_c = CString::new(entry).unwrap();
        let mut blob: *mut ID3DBlob = ptr::null_mut();
        let mut error_blob: *mut ID3DBlob = ptr::null_mut();
        let hr = unsafe {
            (self.compile_fn)(
                source.as_ptr() as *const _,
                source.len(),
                ptr::null(),
                ptr::null(),
                ptr::null_mut(),
                entry_c.as_ptr(),
                target.as_ptr() as *const i8,
                D3DCOMPILE_ENABLE_STRICTNESS,
                0,
                &mut blob,
                &mut error_blob,
            )
        };
        if !SUCCEEDED(hr) {
            let message = if error_blob.is_null() {
                format!("D3DCompile failed with hresult 0x{:08x}", hr)
            } else {
                let error = unsafe { ComPtr::from_raw(error_blob) };
                unsafe {
                    let ptr = error.GetBufferPointer();
                    let size = error.GetBufferSize();
                    let bytes = std::slice::from_raw_parts(ptr as *const u8, size);
                    String::from_utf8_lossy(bytes).into_owned()
                }
            };
            return Err(CompileError::BackendCompile(message));
        }
        Ok(unsafe { ComPtr::from_raw(blob) })
    }
}

impl Drop for VendorCompiler {
    fn drop(&mut self) {
        unsafe {
            FreeLibrary(self.module);
        }
    }
}
