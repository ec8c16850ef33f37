// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::gpu::{AdapterId, GpuError};
use crate::imp::wgpu::entry_point::EntryPoint;

/// An adapter picked but not yet opened.
pub struct UnboundDevice {
    pub(super) adapter: wgpu::Adapter,
}

impl UnboundDevice {
    /**
    Picks the system's default adapter.

    Blocks until wgpu answers; adapter requests complete without a surface on native
    platforms.
    */
    pub fn pick(entry_point: &EntryPoint) -> Result<UnboundDevice, GpuError> {
        let options = wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        };
        let adapter = test_executors::spin_on(entry_point.0.request_adapter(&options))
            .map_err(|e| GpuError::NoAdapter(e.to_string()))?;
        Ok(UnboundDevice { adapter })
    }

    pub fn adapter_id(&self) -> AdapterId {
        adapter_id(&self.adapter.get_info())
    }
}

/// Identity of an adapter, stable for as long as the same hardware and driver are present.
pub(super) fn adapter_id(info: &wgpu::AdapterInfo) -> AdapterId {
    let mut hasher = DefaultHasher::new();
    info.vendor.hash(&mut hasher);
    info.device.hash(&mut hasher);
    info.name.hash(&mut hasher);
    info.driver_info.hash(&mut hasher);
    info.backend.hash(&mut hasher);
    AdapterId(hasher.finish())
}
