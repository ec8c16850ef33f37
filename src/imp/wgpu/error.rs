// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::gpu::GpuError;

/**
Runs `create` inside a validation error scope.

wgpu reports creation errors asynchronously; popping the scope right away turns them into a
[GpuError] for the object that caused them.
*/
pub(super) fn scoped<T>(
    device: &wgpu::Device,
    kind: &'static str,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let value = create();
    let out_of_memory = test_executors::spin_on(device.pop_error_scope());
    let validation = test_executors::spin_on(device.pop_error_scope());
    match out_of_memory.or(validation) {
        Some(error) => {
            logwise::error_sync!(
                "wgpu rejected {kind} {label}: {err}",
                kind = kind,
                label = label,
                err = logwise::privacy::LogIt(&error)
            );
            Err(GpuError::create(kind, label, error))
        }
        None => Ok(value),
    }
}
