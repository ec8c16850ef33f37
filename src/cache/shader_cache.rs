// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::cache::{Cache, CacheError};
use crate::gpu::Device;
use crate::resources::{BuildContext, Partition, ResourceClass, Shader, ShaderClass};
use crate::spawn::Spawner;

/**
Programs, keyed by [ShaderClass].

Programs never depend on the output size, so there is a single partition.
*/
pub struct ShaderCache<D: Device> {
    cache: Cache<ShaderClass, Shader<D>>,
}

impl<D: Device> Default for ShaderCache<D> {
    fn default() -> Self {
        ShaderCache { cache: Cache::new() }
    }
}

impl<D: Device> ShaderCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `ids`, spawning a build for each one not yet built.
    pub fn require(&mut self, ids: &[ShaderClass], cx: &BuildContext<D>, spawner: &dyn Spawner) {
        for ticket in self.cache.begin_require(ids, Partition::SizeIndependent) {
            let class = ticket.class();
            let cx = cx.clone();
            spawner.spawn(
                &format!("build shader {}", class.name()),
                Box::pin(async move {
                    ticket.complete(class.build(cx).await);
                }),
            );
        }
    }

    pub fn pump(&mut self) -> Result<(), CacheError> {
        self.cache.pump()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.cache.is_fulfilled(Partition::SizeIndependent)
    }

    pub fn get(&self, id: ShaderClass) -> Option<&Shader<D>> {
        self.cache.get(id)
    }

    pub fn required(&self) -> &[ShaderClass] {
        self.cache.required(Partition::SizeIndependent)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
