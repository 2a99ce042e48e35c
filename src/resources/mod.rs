use anyhow::Context as _;

use crate::data_structures::texture::{Texture, TextureSlot};

/**
 * This module contains all logic for loading images and other files from the assets
 * directory (native) or from the page's origin (web).
 */

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no global window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name)
}

/// Fetches `file_name` and swaps it into `slot` once decoded.
///
/// On failure the slot keeps whatever it holds (the placeholder at startup) and the
/// problem is only logged.
pub async fn load_texture_into(
    slot: &TextureSlot,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> bool {
    match load_texture(file_name, device, queue).await {
        Ok(texture) => {
            log::info!("loaded texture {}", file_name);
            slot.replace(texture);
            true
        }
        Err(e) => {
            log::warn!("keeping placeholder for {}: {:#}", file_name, e);
            false
        }
    }
}
