// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use wgpu::{AddressMode, FilterMode, SamplerDescriptor};

use crate::gpu::SamplerKind;

pub(super) fn descriptor(kind: SamplerKind) -> SamplerDescriptor<'static> {
    let filter = match kind {
        SamplerKind::Linear => FilterMode::Linear,
        SamplerKind::Point => FilterMode::Nearest,
    };
    SamplerDescriptor {
        label: Some(match kind {
            SamplerKind::Linear => "linear sampler",
            SamplerKind::Point => "point sampler",
        }),
        address_mode_u: AddressMode::Repeat,
        address_mode_v: AddressMode::Repeat,
        address_mode_w: AddressMode::Repeat,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: filter,
        lod_min_clamp: 0.0,
        lod_max_clamp: 32.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color: None,
    }
}
