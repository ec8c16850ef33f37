// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Textures: decoded image assets plus the procedural overlay.
*/

use crate::gpu::{Device, RenderContext, TextureDescriptor};
use crate::pixel_formats::{DecodeError, ImageEncoding, RgbaImage};
use crate::resources::{BuildContext, BuildError, Partition, ResourceClass, UnknownClassId, class_from_id, overlay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureClass {
    Wood,
    /// Procedural; sized from the DPI, so rebuilt when the output changes.
    Overlay,
    Font,
    Icons,
    SampleImage,
}

impl ResourceClass for TextureClass {
    const KIND: &'static str = "texture";
    const ALL: &'static [Self] = &[
        TextureClass::Wood,
        TextureClass::Overlay,
        TextureClass::Font,
        TextureClass::Icons,
        TextureClass::SampleImage,
    ];

    fn partition(self) -> Partition {
        match self {
            TextureClass::Overlay => Partition::SizeDependent,
            _ => Partition::SizeIndependent,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TextureClass::Wood => "Wood",
            TextureClass::Overlay => "Overlay",
            TextureClass::Font => "Font",
            TextureClass::Icons => "Icons",
            TextureClass::SampleImage => "SampleImage",
        }
    }
}

impl TryFrom<u32> for TextureClass {
    type Error = UnknownClassId;
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        class_from_id(id)
    }
}

impl TextureClass {
    /// The image asset backing this class, or `None` for procedural textures.
    pub fn asset_path(self) -> Option<&'static str> {
        match self {
            TextureClass::Wood => Some("Textures/wood_bg_texture.jpg"),
            TextureClass::Overlay => None,
            TextureClass::Font => Some("Textures/Orkney.png"),
            TextureClass::Icons => Some("Textures/icons.png"),
            TextureClass::SampleImage => Some("Textures/sample_screenshot.png"),
        }
    }

    /// Produces the CPU image: decoded from the asset, or generated.
    pub async fn load_image(self, cx: &BuildContext<impl Device>) -> Result<RgbaImage, BuildError> {
        match self.asset_path() {
            Some(path) => {
                let bytes = cx.assets.read(path).await?;
                let encoding = ImageEncoding::from_path(path).ok_or_else(|| DecodeError::UnknownEncoding(path.to_string()))?;
                Ok(RgbaImage::decode(&bytes, encoding)?)
            }
            None => Ok(overlay::generate(overlay::corner_radius_pixels(cx.metrics.dpi))),
        }
    }

    pub async fn build<D: Device>(self, cx: BuildContext<D>) -> Result<Texture<D>, BuildError> {
        let image = self.load_image(&cx).await?;
        let texture = cx.device.create_texture(&TextureDescriptor {
            label: self.name(),
            image: &image,
        })?;
        Ok(Texture {
            class: self,
            texture,
            width: image.width(),
            height: image.height(),
        })
    }
}

/// A texture resident on the device.
pub struct Texture<D: Device> {
    class: TextureClass,
    texture: D::Texture,
    width: u32,
    height: u32,
}

impl<D: Device> Clone for Texture<D> {
    fn clone(&self) -> Self {
        Texture {
            class: self.class,
            texture: self.texture.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<D: Device> Texture<D> {
    pub fn class(&self) -> TextureClass {
        self.class
    }
    pub fn handle(&self) -> &D::Texture {
        &self.texture
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds this texture for the next draw.
    pub fn activate(&self, ctx: &mut RenderContext<D>) {
        ctx.set_texture(&self.texture);
    }
}
