//! Picks globe textures from candidate URL lists.

use std::future::Future;

use crate::config::TextureConfig;

/// Checks whether an image URL can be loaded.
pub trait ImageProbe {
    fn probe(&self, url: &str) -> impl Future<Output = bool>;
}

/// First candidate the probe can load, else the last one. `None` only for an
/// empty list.
pub async fn resolve_texture<P: ImageProbe>(candidates: &[String], probe: &P) -> Option<String> {
    let (last, rest) = candidates.split_last()?;
    for url in rest {
        if probe.probe(url).await {
            return Some(url.clone());
        }
        tracing::debug!(url = %url, "texture candidate unavailable");
    }
    Some(last.clone())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTextures {
    pub globe: String,
    pub bump: String,
}

pub async fn resolve_textures<P: ImageProbe>(
    cfg: &TextureConfig,
    probe: &P,
) -> Option<ResolvedTextures> {
    let globe = resolve_texture(&cfg.globe, probe).await?;
    let bump = resolve_texture(&cfg.bump, probe).await?;
    Some(ResolvedTextures { globe, bump })
}
