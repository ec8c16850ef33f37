// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::cache::{BuildFailure, Cache, CacheError};
use crate::gpu::{Device, GpuError, RenderContext, SamplerKind};
use crate::resources::{BuildContext, BuildError, Partition, ResourceClass, Texture, TextureClass};
use crate::spawn::Spawner;

/// The fixed-function state every textured draw picks from.
pub struct TextureStates<D: Device> {
    pub linear_sampler: D::Sampler,
    pub point_sampler: D::Sampler,
    pub blend_state: D::BlendState,
}

impl<D: Device> TextureStates<D> {
    fn create(device: &D) -> Result<Self, GpuError> {
        Ok(TextureStates {
            linear_sampler: device.create_sampler(SamplerKind::Linear)?,
            point_sampler: device.create_sampler(SamplerKind::Point)?,
            blend_state: device.create_blend_state()?,
        })
    }
}

/**
Textures keyed by [TextureClass], plus the samplers and blend state used to draw them.

The states are created on the first require and count towards fulfillment of any partition
with requirements.
*/
pub struct TextureCache<D: Device> {
    cache: Cache<TextureClass, Texture<D>>,
    states: Option<TextureStates<D>>,
    state_error: Option<GpuError>,
}

impl<D: Device> Default for TextureCache<D> {
    fn default() -> Self {
        TextureCache {
            cache: Cache::new(),
            states: None,
            state_error: None,
        }
    }
}

impl<D: Device> TextureCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, ids: &[TextureClass], partition: Partition, cx: &BuildContext<D>, spawner: &dyn Spawner) {
        if self.states.is_none() {
            match TextureStates::create(cx.device.as_ref()) {
                Ok(states) => {
                    self.states = Some(states);
                    self.state_error = None;
                }
                Err(e) => {
                    logwise::error_sync!("Creating sampler and blend states failed: {err}", err = logwise::privacy::LogIt(&e));
                    self.state_error = Some(e);
                }
            }
        }
        for ticket in self.cache.begin_require(ids, partition) {
            let class = ticket.class();
            let cx = cx.clone();
            spawner.spawn(
                &format!("build texture {}", class.name()),
                Box::pin(async move {
                    ticket.complete(class.build(cx).await);
                }),
            );
        }
    }

    /// Applies finished builds; also reports a failure to create the states, once.
    pub fn pump(&mut self) -> Result<(), CacheError> {
        let states = match self.state_error.take() {
            Some(error) => Err(CacheError {
                failures: vec![BuildFailure {
                    kind: TextureClass::KIND,
                    class: "sampler and blend states",
                    id: u32::MAX,
                    error: BuildError::Gpu(error),
                }],
            }),
            None => Ok(()),
        };
        CacheError::merge([states, self.cache.pump()])
    }

    pub fn is_fulfilled(&self, partition: Partition) -> bool {
        let needs_states = !self.cache.required(partition).is_empty();
        self.cache.is_fulfilled(partition) && (!needs_states || self.states.is_some())
    }

    pub fn get(&self, id: TextureClass) -> Option<&Texture<D>> {
        self.cache.get(id)
    }

    pub fn required(&self, partition: Partition) -> &[TextureClass] {
        self.cache.required(partition)
    }

    pub fn states(&self) -> Option<&TextureStates<D>> {
        self.states.as_ref()
    }

    /// Binds the alpha blend state.  Returns `false` before the states exist.
    pub fn activate_blend_state(&self, ctx: &mut RenderContext<D>) -> bool {
        self.states.as_ref().map(|s| ctx.set_blend_state(&s.blend_state)).is_some()
    }

    pub fn activate_linear_sampler(&self, ctx: &mut RenderContext<D>) -> bool {
        self.states.as_ref().map(|s| ctx.set_sampler(&s.linear_sampler)).is_some()
    }

    pub fn activate_point_sampler(&self, ctx: &mut RenderContext<D>) -> bool {
        self.states.as_ref().map(|s| ctx.set_sampler(&s.point_sampler)).is_some()
    }

    pub fn invalidate_size_dependent(&mut self) {
        self.cache.invalidate(Partition::SizeDependent);
    }

    /// Drops every texture and the states.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.states = None;
        self.state_error = None;
    }
}
