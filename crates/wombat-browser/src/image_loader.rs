//! Image loading: fetch, decode, and the shared cache.
//!
//! Image fetches are the pipeline's only concurrency: each URL becomes a
//! task on a bounded worker pool whose completions publish into the
//! [`ImageCache`]. A generation counter makes cancellation best-effort —
//! navigating bumps the generation and any late completion is dropped.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use wombat_common::net;
use wombat_common::warning::warn_once;
use wombat_term::PixelBuffer;

/// Upper bound on concurrent image fetches.
const MAX_CONCURRENT_FETCHES: usize = 8;

/// Concurrent mapping from resolved image URL to decoded pixels.
///
/// Atomic `get`/`set`/`contains`/`clear`/`count`; readers see a
/// consistent snapshot per call and there is no cross-key invariant.
#[derive(Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, Arc<PixelBuffer>>>,
}

impl ImageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a decoded image.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Arc<PixelBuffer>> {
        self.entries.lock().unwrap().get(url).cloned()
    }

    /// Publish a decoded image.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub fn set(&self, url: &str, buffer: PixelBuffer) {
        let _ = self
            .entries
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::new(buffer));
    }

    /// Whether an entry exists.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().unwrap().contains_key(url)
    }

    /// Drop every entry (navigation).
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of cached images.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Fetch image bytes from a URL (http(s), `data:`, or a local path).
///
/// # Errors
///
/// Returns an error string when the fetch fails; the caller marks the
/// resource unavailable and layout proceeds with the `[alt]` placeholder.
pub fn fetch_image_bytes(resolved_url: &str) -> Result<Vec<u8>, String> {
    if resolved_url.starts_with("http://") || resolved_url.starts_with("https://") {
        let response = net::fetch(resolved_url, &net::FetchOptions::default())?;
        if response.status >= 400 {
            return Err(format!("HTTP {} for {resolved_url}", response.status));
        }
        Ok(response.body)
    } else if resolved_url.starts_with("data:") {
        Ok(net::fetch_data_url(resolved_url)?.body)
    } else {
        fs::read(resolved_url).map_err(|e| format!("failed to read '{resolved_url}': {e}"))
    }
}

/// Decode image bytes (PNG/JPEG/GIF/WebP via the `image` crate) into an
/// RGBA pixel buffer.
///
/// # Errors
///
/// Returns an error string for undecodable bytes.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|e| format!("could not decode image ({e})"))?;
    let rgba = dynamic.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut buffer = PixelBuffer::from_rgba8(w, h, rgba.as_raw())
        .ok_or_else(|| "decoded image has inconsistent dimensions".to_string())?;
    buffer.unpremultiply();
    Ok(buffer)
}

/// Bounded-concurrency image fetcher publishing into a shared cache.
pub struct ImageFetcher {
    cache: Arc<ImageCache>,
    generation: Arc<AtomicU64>,
}

impl ImageFetcher {
    /// Create a fetcher over the given cache.
    #[must_use]
    pub fn new(cache: Arc<ImageCache>) -> Self {
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Abandon outstanding fetches (best-effort): late completions from
    /// earlier generations are dropped instead of published.
    pub fn cancel(&self) {
        let _ = self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Fetch and decode every URL, blocking until all workers finish.
    /// Already-cached URLs are skipped; failures are warned once and the
    /// entry is simply absent.
    pub fn fetch_blocking(&self, urls: Vec<String>) {
        let queue: VecDeque<String> = urls
            .into_iter()
            .filter(|u| !u.is_empty() && !self.cache.contains(u))
            .collect();
        if queue.is_empty() {
            return;
        }
        let queue = Arc::new(Mutex::new(queue));
        let generation = self.generation.load(Ordering::SeqCst);

        let worker_count = MAX_CONCURRENT_FETCHES.min(queue.lock().unwrap().len());
        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let queue = queue.clone();
            let cache = self.cache.clone();
            let gen_counter = self.generation.clone();
            handles.push(thread::spawn(move || {
                loop {
                    let url = { queue.lock().unwrap().pop_front() };
                    let Some(url) = url else { break };
                    match fetch_image_bytes(&url).and_then(|bytes| decode_image(&bytes)) {
                        Ok(buffer) => {
                            // Drop late completions from a cancelled
                            // generation.
                            if gen_counter.load(Ordering::SeqCst) == generation {
                                cache.set(&url, buffer);
                            }
                        }
                        Err(message) => {
                            warn_once("image", &format!("{url}: {message}"));
                        }
                    }
                }
            }));
        }
        for handle in handles {
            let _ = handle.join();
        }
    }

    /// Fire-and-forget variant: workers run detached and publish as they
    /// complete; the shell re-renders when it sees the cache count move.
    pub fn fetch_background(&self, urls: Vec<String>) {
        let fetcher = Self {
            cache: self.cache.clone(),
            generation: self.generation.clone(),
        };
        let _ = thread::spawn(move || fetcher.fetch_blocking(urls));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wombat_term::Color;

    #[test]
    fn test_cache_operations() {
        let cache = ImageCache::new();
        assert_eq!(cache.count(), 0);
        assert!(!cache.contains("a"));

        cache.set("a", PixelBuffer::filled(2, 2, Color::WHITE));
        assert!(cache.contains("a"));
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.get("a").unwrap().width(), 2);

        cache.set("a", PixelBuffer::filled(3, 3, Color::BLACK));
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.get("a").unwrap().width(), 3);

        cache.clear();
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_fetch_blocking_with_data_urls() {
        // A 1×1 transparent PNG.
        let png = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";
        let cache = Arc::new(ImageCache::new());
        let fetcher = ImageFetcher::new(cache.clone());
        fetcher.fetch_blocking(vec![png.to_string()]);
        assert!(cache.contains(png));
        let buffer = cache.get(png).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (1, 1));
    }

    #[test]
    fn test_fetch_after_cancel_uses_fresh_generation() {
        let png = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";
        let cache = Arc::new(ImageCache::new());
        let fetcher = ImageFetcher::new(cache.clone());
        fetcher.cancel();
        // Each fetch_blocking snapshots the current generation, so work
        // started after a cancel still publishes.
        fetcher.fetch_blocking(vec![png.to_string()]);
        assert!(cache.contains(png));
    }
}
