// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The app's closed set of GPU resources.

Each resource kind is an exhaustive enum of class ids ([ShaderClass], [TextureClass],
[VertexBufferClass]).  A class id knows how to build its resource: load or compute the CPU
data (the only suspension points), then create the GPU objects on a [Device].  Builds never
touch a cache; the cache inserts the finished resource.
*/

pub mod layouts;
pub mod overlay;
pub mod shader;
pub mod texture;
pub mod vertex_algorithms;
pub mod vertex_buffer;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

pub use shader::{Shader, ShaderClass};
pub use texture::{Texture, TextureClass};
pub use vertex_buffer::{VertexBuffer, VertexBufferClass, VertexData};

use crate::assets::{AssetError, AssetStore};
use crate::font::{Font, FontError};
use crate::geometry::Size;
use crate::gpu::{Device, GpuError};
use crate::pixel_formats::DecodeError;

/**
Whether a resource survives output-size changes.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    SizeIndependent,
    SizeDependent,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::SizeIndependent, Partition::SizeDependent];

    pub(crate) fn index(self) -> usize {
        match self {
            Partition::SizeIndependent => 0,
            Partition::SizeDependent => 1,
        }
    }
}

/**
A class id of one resource kind.
*/
pub trait ResourceClass: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Kind name for logs and errors, e.g. `"shader"`.
    const KIND: &'static str;
    /// Every class of this kind, in id order.
    const ALL: &'static [Self];

    fn partition(self) -> Partition;
    fn name(self) -> &'static str;

    /// Numeric id, the position in [ResourceClass::ALL].
    fn id(self) -> u32 {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(usize::MAX) as u32
    }
}

/// Converting a raw number that names no class.  This is a programming error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No {kind} class has id {id}")]
pub struct UnknownClassId {
    pub kind: &'static str,
    pub id: u32,
}

pub(crate) fn class_from_id<C: ResourceClass>(id: u32) -> Result<C, UnknownClassId> {
    C::ALL
        .get(id as usize)
        .copied()
        .ok_or(UnknownClassId { kind: C::KIND, id })
}

/**
Failure building one resource.

Cloneable so a single font failure can be reported by every build that waited on it.
*/
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Decode(Arc<DecodeError>),
    #[error(transparent)]
    Font(Arc<FontError>),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    /// A text layout was built without the shared font.
    #[error("The font is not available to lay out text")]
    FontUnavailable,
}

impl From<DecodeError> for BuildError {
    fn from(e: DecodeError) -> Self {
        BuildError::Decode(Arc::new(e))
    }
}

impl From<FontError> for BuildError {
    fn from(e: FontError) -> Self {
        BuildError::Font(Arc::new(e))
    }
}

/// Display parameters a size-dependent build lays out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildMetrics {
    /// Output size in physical pixels.
    pub output_size: Size,
    /// Effective DPI.
    pub dpi: f32,
}

impl BuildMetrics {
    /// The quarter-inch margin used throughout the layouts, in normalised units.
    pub fn margin_units(&self) -> (f32, f32) {
        let margin_pixels = 0.25 * self.dpi;
        (
            2.0 * margin_pixels / self.output_size.width,
            2.0 * margin_pixels / self.output_size.height,
        )
    }
}

/**
What a build task gets: the device, assets and a metrics snapshot taken when it was scheduled.
*/
pub struct BuildContext<D: Device> {
    pub device: Arc<D>,
    pub assets: AssetStore,
    pub metrics: BuildMetrics,
}

impl<D: Device> Clone for BuildContext<D> {
    fn clone(&self) -> Self {
        BuildContext {
            device: self.device.clone(),
            assets: self.assets.clone(),
            metrics: self.metrics,
        }
    }
}

/// Path of the font definition shared by text layouts.
pub const FONT_DEFINITION_PATH: &str = "Definitions/Orkney.fnt";

/// Loads and parses the shared font.
pub async fn load_font(assets: &AssetStore) -> Result<Font, BuildError> {
    let bytes = assets.read(FONT_DEFINITION_PATH).await?;
    Ok(Font::parse(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ids_round_trip() {
        for class in TextureClass::ALL {
            assert_eq!(TextureClass::try_from(class.id()).unwrap(), *class);
        }
        for class in VertexBufferClass::ALL {
            assert_eq!(VertexBufferClass::try_from(class.id()).unwrap(), *class);
        }
        for class in ShaderClass::ALL {
            assert_eq!(ShaderClass::try_from(class.id()).unwrap(), *class);
        }
    }

    #[test]
    fn unknown_ids_are_errors() {
        let err = VertexBufferClass::try_from(99).unwrap_err();
        assert_eq!(err, UnknownClassId { kind: "vertex buffer", id: 99 });
        assert!(ShaderClass::try_from(4).is_err());
        assert!(TextureClass::try_from(5).is_err());
    }

    #[test]
    fn margins_scale_with_dpi() {
        let m = BuildMetrics {
            output_size: Size::new(960.0, 480.0),
            dpi: 96.0,
        };
        assert_eq!(m.margin_units(), (0.05, 0.1));
    }
}
