//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU texture resources, and
//! [`TextureSlot`], a shared handle whose content is swapped once an image finishes
//! loading. Until then a 1×1 placeholder stays bound.

use std::{cell::RefCell, rc::Rc};

use anyhow::*;
use image::{GenericImageView, imageops::FilterType};

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

/// Sampler settings for an image with `mip_levels` levels.
///
/// U always repeats: the sphere duplicates its seam vertices at `u + 1` and relies on
/// the wrap. Images without mips clamp V and skip mip filtering.
pub fn sampler_descriptor(mip_levels: u32) -> wgpu::SamplerDescriptor<'static> {
    let (address_mode_v, mipmap_filter) = if mip_levels > 1 {
        (wgpu::AddressMode::Repeat, wgpu::FilterMode::Linear)
    } else {
        (wgpu::AddressMode::ClampToEdge, wgpu::FilterMode::Nearest)
    };
    wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v,
        address_mode_w: address_mode_v,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter,
        ..Default::default()
    }
}

/// Colour shown while the real image is still in flight.
pub const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 255, 255];

pub fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Number of mip levels down to 1×1 for a power-of-two image, otherwise 1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    if is_power_of_two(width) && is_power_of_two(height) {
        32 - width.max(height).leading_zeros()
    } else {
        1
    }
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// A single opaque pixel, bound until the real image arrives.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba(PLACEHOLDER_PIXEL));
        Self::from_rgba(device, queue, &img, Some("placeholder texture"))
    }

    /// Load a texture from raw image file contents (PNG, JPEG, ...).
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("could not decode image {}", label))?;
        Ok(Self::from_image(device, queue, &img, Some(label)))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = img.dimensions();
        if !is_power_of_two(width) || !is_power_of_two(height) {
            log::debug!(
                "{:?} is {}x{}, not a power of two: no mipmaps, clamped to edge",
                label,
                width,
                height
            );
        }
        Self::from_rgba(device, queue, &img.to_rgba8(), label)
    }

    /// Uploads the image. Power-of-two images get a full mip chain built on the CPU,
    /// others a single level with V clamped to the edge.
    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &image::RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = rgba.dimensions();
        let mip_levels = mip_level_count(width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for level in 0..mip_levels {
            let level_width = (width >> level).max(1);
            let level_height = (height >> level).max(1);
            let scaled;
            let data = if level == 0 {
                rgba
            } else {
                scaled =
                    image::imageops::resize(rgba, level_width, level_height, FilterType::Triangle);
                &scaled
            };
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler_descriptor(mip_levels));

        Self {
            texture,
            view,
            sampler: Some(sampler),
        }
    }
}

struct SlotContent {
    texture: Texture,
    bind_group: Option<wgpu::BindGroup>,
}

/// Shared, swappable albedo texture.
///
/// Materials that want the same image share one slot. The bind group is built lazily
/// and dropped whenever the texture is replaced.
#[derive(Clone)]
pub struct TextureSlot {
    content: Rc<RefCell<SlotContent>>,
}

impl TextureSlot {
    pub fn new(texture: Texture) -> Self {
        Self {
            content: Rc::new(RefCell::new(SlotContent {
                texture,
                bind_group: None,
            })),
        }
    }

    pub fn replace(&self, texture: Texture) {
        let mut content = self.content.borrow_mut();
        content.texture = texture;
        content.bind_group = None;
    }

    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        let mut content = self.content.borrow_mut();
        if let Some(bind_group) = &content.bind_group {
            return bind_group.clone();
        }
        let sampler = match &content.texture.sampler {
            Some(sampler) => sampler.clone(),
            None => create_default_sampler(device),
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&content.texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("albedo_bind_group"),
        });
        content.bind_group = Some(bind_group.clone());
        bind_group
    }
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
