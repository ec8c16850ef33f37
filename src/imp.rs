// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Backends behind [crate::gpu::Backend].

pub mod headless;

#[cfg(feature = "backend_wgpu")]
pub mod wgpu;
