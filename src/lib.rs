// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The presentation core of Metronome Amplified.

The app draws a handful of screens (the main metronome screen, a settings hub and an
animated help carousel) from a small, fixed catalogue of GPU resources.  This crate owns
everything between the platform window and the GPU:

| Layer              | Module                 | Responsibility                                                          |
|--------------------|------------------------|-------------------------------------------------------------------------|
| Device facade      | [device]               | Device and swap-chain lifetime, DPI and orientation, loss recovery      |
| Resource caches    | [cache]                | Asynchronous builds, fulfillment gating per partition                   |
| Resource catalogue | [resources]            | Shaders, textures and vertex buffers the app knows how to build         |
| Text               | [font]                 | BMFont parsing, line breaking and glyph quad layout                     |
| Scenes             | [scenes], [shell]      | Screens, the navigation stack and per-frame drive                       |
| Backends           | [gpu], [headless]      | The device seam, with a recording backend and a wgpu one                |

# Fulfillment

Nothing is drawn until everything a screen needs has been built.  Scenes declare what they
require, the caches build the missing pieces on an executor, and the shell renders only once
[device::DeviceResources::are_all_fulfilled] says so.  Resources whose geometry depends on the
output size are kept in their own partition so a resize or DPI change rebuilds only those.

# Backends

The wgpu backend (feature `backend_wgpu`, on by default) drives a real GPU.  [headless]
records every call instead; it is what the tests run against, and it can inject creation
failures, device loss and present errors.
*/

pub mod assets;
pub mod cache;
pub mod device;
pub mod display;
pub mod font;
pub mod geometry;
pub mod gpu;
mod imp;
pub mod pixel_formats;
pub mod resources;
pub mod scenes;
pub mod shell;
pub mod spawn;

pub use imp::headless;
#[cfg(feature = "backend_wgpu")]
pub use imp::wgpu as wgpu_backend;

pub type Priority = some_executor::Priority;
