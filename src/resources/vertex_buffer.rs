// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Vertex buffers: one static buffer per screen layer, split into sub-buffers.

A sub-buffer is a contiguous vertex range a scene draws on its own, for instance the heading
and the body of a text layout.  Some buffers also carry regions of interest, rectangles a
scene hit-tests pointer presses against.
*/

use std::ops::Range;
use std::sync::Arc;

use crate::font::Font;
use crate::geometry::{Rect, VertexTexCoord};
use crate::gpu::{Device, RenderContext};
use crate::resources::{BuildContext, BuildError, Partition, ResourceClass, UnknownClassId, class_from_id, layouts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexBufferClass {
    Background,
    MainScreenTranslucentOverlay,
    MainScreenIcons,
    MainScreenIconLabels,
    SettingsHubLabels,
    HelpDetailsOverlay,
    HelpDetailsIcons,
    HelpNavigatingImages,
    HelpNavigatingTexts,
}

impl ResourceClass for VertexBufferClass {
    const KIND: &'static str = "vertex buffer";
    const ALL: &'static [Self] = &[
        VertexBufferClass::Background,
        VertexBufferClass::MainScreenTranslucentOverlay,
        VertexBufferClass::MainScreenIcons,
        VertexBufferClass::MainScreenIconLabels,
        VertexBufferClass::SettingsHubLabels,
        VertexBufferClass::HelpDetailsOverlay,
        VertexBufferClass::HelpDetailsIcons,
        VertexBufferClass::HelpNavigatingImages,
        VertexBufferClass::HelpNavigatingTexts,
    ];

    /// Every layout is in normalised units derived from the output size.
    fn partition(self) -> Partition {
        Partition::SizeDependent
    }

    fn name(self) -> &'static str {
        match self {
            VertexBufferClass::Background => "Background",
            VertexBufferClass::MainScreenTranslucentOverlay => "MainScreenTranslucentOverlay",
            VertexBufferClass::MainScreenIcons => "MainScreenIcons",
            VertexBufferClass::MainScreenIconLabels => "MainScreenIconLabels",
            VertexBufferClass::SettingsHubLabels => "SettingsHubLabels",
            VertexBufferClass::HelpDetailsOverlay => "HelpDetailsOverlay",
            VertexBufferClass::HelpDetailsIcons => "HelpDetailsIcons",
            VertexBufferClass::HelpNavigatingImages => "HelpNavigatingImages",
            VertexBufferClass::HelpNavigatingTexts => "HelpNavigatingTexts",
        }
    }
}

impl TryFrom<u32> for VertexBufferClass {
    type Error = UnknownClassId;
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        class_from_id(id)
    }
}

impl VertexBufferClass {
    /// Whether the layout contains text, and so waits for the shared font.
    pub fn needs_font(self) -> bool {
        matches!(
            self,
            VertexBufferClass::MainScreenIconLabels
                | VertexBufferClass::SettingsHubLabels
                | VertexBufferClass::HelpNavigatingTexts
        )
    }

    /// Computes the layout and uploads it.
    pub async fn build<D: Device>(self, cx: BuildContext<D>, font: Option<Arc<Font>>) -> Result<VertexBuffer<D>, BuildError> {
        let data = layouts::generate(self, &cx.metrics, font.as_deref())?;
        let buffer = cx.device.create_vertex_buffer(self.name(), &data.vertices)?;
        Ok(VertexBuffer {
            class: self,
            buffer,
            table: Arc::new(data.table),
        })
    }
}

/**
Sub-buffer boundaries and regions of interest.

`sub_buffers` is `[start_0, start_1, ..., end]`: sub-buffer `i` spans
`sub_buffers[i]..sub_buffers[i + 1]`.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct VertexTable {
    sub_buffers: Vec<u32>,
    regions: Vec<Rect>,
}

impl VertexTable {
    pub fn new(sub_buffers: Vec<u32>, regions: Vec<Rect>) -> Self {
        debug_assert!(sub_buffers.len() >= 2, "a table needs at least one sub-buffer");
        debug_assert!(sub_buffers.windows(2).all(|w| w[0] <= w[1]), "sub-buffers must be ordered");
        VertexTable { sub_buffers, regions }
    }

    pub fn sub_buffer_count(&self) -> usize {
        self.sub_buffers.len().saturating_sub(1)
    }

    /// The vertex range of sub-buffer `index`, or `None` past the end.
    pub fn sub_buffer_range(&self, index: usize) -> Option<Range<u32>> {
        let start = *self.sub_buffers.get(index)?;
        let end = *self.sub_buffers.get(index + 1)?;
        Some(start..end)
    }

    /// Vertices in sub-buffer `index`; zero past the end.
    pub fn vertices_in_sub_buffer(&self, index: usize) -> u32 {
        self.sub_buffer_range(index).map_or(0, |r| r.end - r.start)
    }

    /// First vertex of sub-buffer `index`; the end of the buffer past the end.
    pub fn index_of_sub_buffer(&self, index: usize) -> u32 {
        self.sub_buffer_range(index).map_or(self.sub_buffer_end(), |r| r.start)
    }

    /// One past the last vertex of the last sub-buffer.
    pub fn sub_buffer_end(&self) -> u32 {
        self.sub_buffers.last().copied().unwrap_or(0)
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Index of the first region containing `(x, y)`, scanning in order.
    pub fn region_of_interest_at(&self, x: f32, y: f32) -> Option<usize> {
        self.regions.iter().position(|r| r.contains(x, y))
    }
}

/// CPU output of a layout, before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexData {
    pub vertices: Vec<VertexTexCoord>,
    pub table: VertexTable,
}

/// A vertex buffer resident on the device.
pub struct VertexBuffer<D: Device> {
    class: VertexBufferClass,
    buffer: D::Buffer,
    table: Arc<VertexTable>,
}

impl<D: Device> Clone for VertexBuffer<D> {
    fn clone(&self) -> Self {
        VertexBuffer {
            class: self.class,
            buffer: self.buffer.clone(),
            table: self.table.clone(),
        }
    }
}

impl<D: Device> std::fmt::Debug for VertexBuffer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("class", &self.class)
            .field("buffer", &self.buffer)
            .field("table", &self.table)
            .finish()
    }
}

impl<D: Device> VertexBuffer<D> {
    pub fn class(&self) -> VertexBufferClass {
        self.class
    }
    pub fn handle(&self) -> &D::Buffer {
        &self.buffer
    }
    pub fn table(&self) -> &VertexTable {
        &self.table
    }

    pub fn sub_buffer_count(&self) -> usize {
        self.table.sub_buffer_count()
    }
    pub fn sub_buffer_range(&self, index: usize) -> Option<Range<u32>> {
        self.table.sub_buffer_range(index)
    }
    pub fn vertices_in_sub_buffer(&self, index: usize) -> u32 {
        self.table.vertices_in_sub_buffer(index)
    }
    pub fn index_of_sub_buffer(&self, index: usize) -> u32 {
        self.table.index_of_sub_buffer(index)
    }
    pub fn regions(&self) -> &[Rect] {
        self.table.regions()
    }
    pub fn region_of_interest_at(&self, x: f32, y: f32) -> Option<usize> {
        self.table.region_of_interest_at(x, y)
    }

    /// Binds this buffer for the next draw.
    pub fn activate(&self, ctx: &mut RenderContext<D>) {
        ctx.set_vertex_buffer(&self.buffer);
    }

    /**
    Draws sub-buffer `index` with whatever else is bound.  Returns `false` when nothing was
    drawn.
    */
    pub fn draw_sub_buffer(&self, ctx: &mut RenderContext<D>, index: usize) -> bool {
        match self.table.sub_buffer_range(index) {
            Some(range) => ctx.draw(range.end - range.start, range.start),
            None => {
                logwise::warn_sync!(
                    "{class} has no sub-buffer {index}",
                    class = self.class.name(),
                    index = index
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VertexTable {
        VertexTable::new(
            vec![0, 6, 18],
            vec![Rect::new(-1.0, -1.0, 1.0, 1.0), Rect::new(-0.5, -0.5, 1.0, 1.0)],
        )
    }

    #[test]
    fn sub_buffer_ranges() {
        let t = table();
        assert_eq!(t.sub_buffer_count(), 2);
        assert_eq!(t.sub_buffer_range(1), Some(6..18));
        assert_eq!(t.sub_buffer_range(2), None);
        assert_eq!(t.vertices_in_sub_buffer(0), 6);
        assert_eq!(t.index_of_sub_buffer(1), 6);
        assert_eq!(t.vertices_in_sub_buffer(7), 0);
        assert_eq!(t.index_of_sub_buffer(7), 18);
    }

    #[test]
    fn first_matching_region_wins() {
        let t = table();
        //inside both
        assert_eq!(t.region_of_interest_at(-0.25, -0.25), Some(0));
        assert_eq!(t.region_of_interest_at(0.25, 0.25), Some(1));
        assert_eq!(t.region_of_interest_at(0.9, 0.9), None);
    }

    #[test]
    fn text_classes_need_font() {
        let text: Vec<_> = VertexBufferClass::ALL.iter().filter(|c| c.needs_font()).collect();
        assert_eq!(text.len(), 3);
        assert!(VertexBufferClass::ALL.iter().all(|c| c.partition() == Partition::SizeDependent));
    }
}
