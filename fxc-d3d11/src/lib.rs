//! D3D11 effect linker.
//!
//! Follows `gfx-rs/gfx`'s vendor compiler invocation and `ComPtr`/`HRESULT`
//! idiom, and `legion-labs/legion`'s compiler-library resolution shape.
//! Only this crate in the workspace touches Windows system crates — `hash`
//! and `arena` are platform-neutral and are exercised by unit tests on any
//! host; `compiler` and `linker` are `cfg(windows)`.

pub mod arena;
pub mod hash;

#[cfg(windows)]
pub mod compiler;
#[cfg(windows)]
pub mod linker;

#[cfg(windows)]
pub use linker::{EffectLinker, LinkerOptions};
