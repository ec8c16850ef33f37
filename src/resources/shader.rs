// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Shader programs.

Every program draws [crate::geometry::VertexTexCoord] vertices sampling one texture.  They
differ in which constants they read: a transform in the vertex stage, a paint colour in the
pixel stage, both, or neither.
*/

use crate::gpu::{ConstantBlock, ConstantStages, Device, ProgramDescriptor, RenderContext};
use crate::resources::{BuildContext, BuildError, Partition, ResourceClass, UnknownClassId, class_from_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderClass {
    /// Textured quads, alpha blended.
    AlphaTexture,
    /// [ShaderClass::AlphaTexture] with a vertex transform.
    AlphaTextureTransform,
    /// Font atlas coverage tinted with a paint colour.
    Font,
    /// [ShaderClass::Font] with a vertex transform.
    FontTransform,
}

impl ResourceClass for ShaderClass {
    const KIND: &'static str = "shader";
    const ALL: &'static [Self] = &[
        ShaderClass::AlphaTexture,
        ShaderClass::AlphaTextureTransform,
        ShaderClass::Font,
        ShaderClass::FontTransform,
    ];

    fn partition(self) -> Partition {
        Partition::SizeIndependent
    }

    fn name(self) -> &'static str {
        match self {
            ShaderClass::AlphaTexture => "AlphaTexture",
            ShaderClass::AlphaTextureTransform => "AlphaTextureTransform",
            ShaderClass::Font => "Font",
            ShaderClass::FontTransform => "FontTransform",
        }
    }
}

impl TryFrom<u32> for ShaderClass {
    type Error = UnknownClassId;
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        class_from_id(id)
    }
}

impl ShaderClass {
    pub fn constant_stages(self) -> ConstantStages {
        match self {
            ShaderClass::AlphaTexture => ConstantStages::None,
            ShaderClass::AlphaTextureTransform => ConstantStages::Vertex,
            ShaderClass::Font => ConstantStages::Fragment,
            ShaderClass::FontTransform => ConstantStages::Both,
        }
    }

    pub fn vertex_path(self) -> String {
        format!("Shaders/{}VertexShader.wgsl", self.name())
    }

    pub fn pixel_path(self) -> String {
        format!("Shaders/{}PixelShader.wgsl", self.name())
    }

    /// Loads both stages concurrently, then creates the program.
    pub async fn build<D: Device>(self, cx: BuildContext<D>) -> Result<Shader<D>, BuildError> {
        let (vertex_path, pixel_path) = (self.vertex_path(), self.pixel_path());
        let (vertex, pixel) = futures::future::try_join(cx.assets.read(&vertex_path), cx.assets.read(&pixel_path)).await?;
        let program = cx.device.create_program(&ProgramDescriptor {
            label: self.name(),
            vertex_source: &vertex,
            fragment_source: &pixel,
            constants: self.constant_stages(),
        })?;
        Ok(Shader { class: self, program })
    }
}

/// A built program.
pub struct Shader<D: Device> {
    class: ShaderClass,
    program: D::Program,
}

impl<D: Device> Clone for Shader<D> {
    fn clone(&self) -> Self {
        Shader {
            class: self.class,
            program: self.program.clone(),
        }
    }
}

impl<D: Device> Shader<D> {
    pub fn class(&self) -> ShaderClass {
        self.class
    }

    pub fn program(&self) -> &D::Program {
        &self.program
    }

    /**
    Binds the program for the next draw.

    Constants are only carried for programs that read them; the rest get the identity block.
    */
    pub fn activate(&self, ctx: &mut RenderContext<D>, constants: ConstantBlock) {
        let constants = match self.class.constant_stages() {
            ConstantStages::None => ConstantBlock::IDENTITY,
            _ => constants,
        };
        ctx.set_program(&self.program, constants);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_class_names() {
        assert_eq!(ShaderClass::FontTransform.vertex_path(), "Shaders/FontTransformVertexShader.wgsl");
        assert_eq!(ShaderClass::AlphaTexture.pixel_path(), "Shaders/AlphaTexturePixelShader.wgsl");
    }

    #[test]
    fn constant_stages_per_class() {
        assert!(!ShaderClass::AlphaTexture.constant_stages().vertex());
        assert!(ShaderClass::AlphaTextureTransform.constant_stages().vertex());
        assert!(ShaderClass::Font.constant_stages().fragment());
        assert!(!ShaderClass::Font.constant_stages().vertex());
        let both = ShaderClass::FontTransform.constant_stages();
        assert!(both.vertex() && both.fragment());
    }
}
