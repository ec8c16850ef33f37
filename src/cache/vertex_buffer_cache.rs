// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::cache::{Cache, CacheError};
use crate::font::Font;
use crate::gpu::Device;
use crate::resources::{BuildContext, BuildError, Partition, ResourceClass, VertexBuffer, VertexBufferClass, load_font};
use crate::spawn::Spawner;

type FontLoad = Shared<BoxFuture<'static, Result<Arc<Font>, BuildError>>>;

/**
Vertex buffers keyed by [VertexBufferClass], and the font their text layouts share.

The font is loaded once, on the first require, and every text layout awaits that one load.
If it fails, each of them fails with the same error.
*/
pub struct VertexBufferCache<D: Device> {
    cache: Cache<VertexBufferClass, VertexBuffer<D>>,
    font: Option<FontLoad>,
}

impl<D: Device> Default for VertexBufferCache<D> {
    fn default() -> Self {
        VertexBufferCache {
            cache: Cache::new(),
            font: None,
        }
    }
}

impl<D: Device> VertexBufferCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_load(&mut self, cx: &BuildContext<D>) -> FontLoad {
        //a failed load is retried by the next require
        if let Some(load) = &self.font
            && matches!(load.peek(), Some(Err(_)))
        {
            self.font = None;
        }
        self.font
            .get_or_insert_with(|| {
                logwise::trace_sync!("Scheduling font load");
                let assets = cx.assets.clone();
                async move { load_font(&assets).await.map(Arc::new) }.boxed().shared()
            })
            .clone()
    }

    pub fn require(&mut self, ids: &[VertexBufferClass], partition: Partition, cx: &BuildContext<D>, spawner: &dyn Spawner) {
        let font = self.font_load(cx);
        for ticket in self.cache.begin_require(ids, partition) {
            let class = ticket.class();
            let cx = cx.clone();
            let font = font.clone();
            spawner.spawn(
                &format!("build vertex buffer {}", class.name()),
                Box::pin(async move {
                    let result = if class.needs_font() {
                        match font.await {
                            Ok(font) => class.build(cx, Some(font)).await,
                            Err(e) => Err(e),
                        }
                    } else {
                        class.build(cx, None).await
                    };
                    ticket.complete(result);
                }),
            );
        }
    }

    pub fn pump(&mut self) -> Result<(), CacheError> {
        self.cache.pump()
    }

    pub fn is_fulfilled(&self, partition: Partition) -> bool {
        self.cache.is_fulfilled(partition)
    }

    pub fn get(&self, id: VertexBufferClass) -> Option<&VertexBuffer<D>> {
        self.cache.get(id)
    }

    pub fn required(&self, partition: Partition) -> &[VertexBufferClass] {
        self.cache.required(partition)
    }

    /// The shared font, once its load has finished successfully.
    pub fn font(&self) -> Option<Arc<Font>> {
        match self.font.as_ref()?.peek()? {
            Ok(font) => Some(font.clone()),
            Err(_) => None,
        }
    }

    pub fn invalidate_size_dependent(&mut self) {
        self.cache.invalidate(Partition::SizeDependent);
    }

    /// Drops every buffer and releases the font.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.font = None;
    }
}
