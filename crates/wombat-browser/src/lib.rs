//! Document loading and rendering pipeline for the Wombat terminal
//! browser.
//!
//! # Scope
//!
//! This crate composes the engine crates into the one-shot transform
//! `bytes → tokens → DOM → styles → layout → canvas cells`:
//!
//! - **Document loading** — fetch (or accept) HTML, parse to a DOM
//! - **Scripts** — run `<script>` contents through the JS engine with the
//!   DOM bound; mutations trigger a re-style and re-layout
//! - **Style & layout** — UA + author stylesheets, cell-grid layout
//! - **Images** — bounded-concurrency fetching into a shared cache
//! - **Rendering** — the canvas renderer plus focus-ring bookkeeping
//!
//! The interactive shell (raw terminal, event loop, history) lives
//! outside; this crate is pure data in, canvas out.

/// Form submission URLs (GET serialization).
pub mod forms;
/// Image fetching, decoding, and the shared cache.
pub mod image_loader;
/// Box tree → canvas painting.
pub mod renderer;

pub use forms::form_submit_url;
pub use image_loader::{ImageCache, ImageFetcher};
pub use renderer::{render, RenderContext};

use std::sync::Arc;

use wombat_common::net::{self, FetchOptions};
use wombat_common::warning::{clear_warnings, warn_once};
use wombat_css::{
    extract_style_content, layout_document, parse_stylesheet_str, resolve_styles, ua_stylesheet,
    LayoutBox, StyleMap, Stylesheet,
};
use wombat_dom::{DomTree, NodeId, NodeType};
use wombat_js::{ConsoleLevel, DocumentState, JsRuntime};
use wombat_term::image::{BlitMode, Dithering};
use wombat_term::{Canvas, ColorSupport};

/// Error type for document loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The URL could not be fetched.
    #[error("Network error: {0}")]
    Network(String),
    /// The response had an error status and an empty body.
    #[error("HTTP error {0}")]
    HttpStatus(u16),
}

/// Presentation options for a page render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Terminal color capability.
    pub color_support: ColorSupport,
    /// Image blit mode.
    pub blit_mode: BlitMode,
    /// Image dithering.
    pub dithering: Dithering,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::TrueColor,
            blit_mode: BlitMode::HalfBlock,
            dithering: Dithering::None,
        }
    }
}

/// A fully loaded page: DOM (behind the script-visible document state),
/// stylesheets, computed styles, layout tree, and focus ring.
pub struct Page {
    /// The page URL (base for relative resolution).
    pub url: String,
    /// Original HTML source.
    pub html_source: String,
    /// Script-visible document state (owns the DOM).
    pub doc: wombat_js::DocHandle,
    /// UA + author stylesheets, in cascade order.
    pub stylesheets: Vec<Stylesheet>,
    /// Computed style per element.
    pub styles: StyleMap,
    /// The laid-out box tree.
    pub layout: LayoutBox,
    /// Document title, if any.
    pub title: Option<String>,
    /// Focusable elements (links and form controls) in document order.
    pub focusable: Vec<NodeId>,
    /// The JS runtime bound to this page (console sink included).
    pub runtime: JsRuntime,
    viewport_cols: i32,
}

impl Page {
    /// Fetch a URL and build the page.
    ///
    /// # Errors
    ///
    /// [`LoadError`] when the network fetch fails outright. Error status
    /// pages with bodies still render.
    pub fn load(url: &str, viewport_cols: i32) -> Result<Self, LoadError> {
        let response =
            net::fetch(url, &FetchOptions::default()).map_err(LoadError::Network)?;
        if response.status >= 400 && response.body.is_empty() {
            return Err(LoadError::HttpStatus(response.status));
        }
        Ok(Self::from_html(&response.text(), url, viewport_cols))
    }

    /// Build a page from HTML in hand.
    #[must_use]
    pub fn from_html(html: &str, url: &str, viewport_cols: i32) -> Self {
        clear_warnings();
        let tree = wombat_html::parse_document(html);
        let doc = DocumentState::new(tree, url);

        let mut runtime = JsRuntime::new();
        runtime.bind_document(&doc);
        run_scripts(&mut runtime, &doc);

        let mut page = Self {
            url: url.to_string(),
            html_source: html.to_string(),
            doc,
            stylesheets: Vec::new(),
            styles: StyleMap::new(),
            layout: LayoutBox::new(wombat_css::BoxType::Block),
            title: None,
            focusable: Vec::new(),
            runtime,
            viewport_cols,
        };
        page.restyle_and_layout();
        page
    }

    /// Re-resolve styles and layout from the current DOM (after script
    /// mutations or a viewport change).
    pub fn restyle_and_layout(&mut self) {
        let tree = self.doc.tree.borrow();
        let author = parse_stylesheet_str(&extract_style_content(&tree));
        self.stylesheets = vec![ua_stylesheet(), author];
        self.styles = resolve_styles(&tree, &self.stylesheets);
        self.layout = layout_document(&tree, &self.styles, self.viewport_cols);
        self.title = tree.title();
        self.focusable = collect_focusable(&tree);
    }

    /// Change the viewport width and re-layout.
    pub fn set_viewport_cols(&mut self, cols: i32) {
        self.viewport_cols = cols;
        self.restyle_and_layout();
    }

    /// Total document height in rows.
    #[must_use]
    pub fn document_height(&self) -> i32 {
        self.layout.dimensions.margin_box().height
    }

    /// The resolved URLs of every `<img>` in the document.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        let tree = self.doc.tree.borrow();
        let mut urls = Vec::new();
        for id in tree.iter_all() {
            if let Some(element) = tree.as_element(id) {
                if element.tag_name == "img" {
                    if let Some(src) = element.attr("src") {
                        urls.push(wombat_common::url::resolve(src, &self.url));
                    }
                }
            }
        }
        urls
    }

    /// Render one frame.
    #[must_use]
    pub fn render(
        &self,
        cols: usize,
        rows: usize,
        scroll_y: i32,
        cache: &ImageCache,
        focus: Option<NodeId>,
        opts: &RenderOptions,
    ) -> Canvas {
        let tree = self.doc.tree.borrow();
        let ctx = RenderContext {
            tree: &tree,
            cache,
            base_url: &self.url,
            focus,
            color_support: opts.color_support,
            blit_mode: opts.blit_mode,
            dithering: opts.dithering,
        };
        render(&self.layout, &ctx, cols, rows, scroll_y)
    }

    /// Fetch this page's images into the cache, blocking until done.
    pub fn fetch_images_blocking(&self, cache: &Arc<ImageCache>) {
        ImageFetcher::new(cache.clone()).fetch_blocking(self.image_urls());
    }
}

/// Execute every `<script>` in document order. Scripts with a `src`
/// attribute are fetched; failures and uncaught errors go to the console
/// sink and never halt the pipeline.
fn run_scripts(runtime: &mut JsRuntime, doc: &wombat_js::DocHandle) {
    let scripts: Vec<(Option<String>, String)> = {
        let tree = doc.tree.borrow();
        tree.iter_all()
            .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "script"))
            .map(|id| {
                let src = tree
                    .as_element(id)
                    .and_then(|e| e.attr("src"))
                    .map(String::from);
                (src, tree.text_content(id))
            })
            .collect()
    };

    let base_url = doc.url.clone();
    for (src, inline) in scripts {
        let source = match src {
            Some(src) => {
                let resolved = wombat_common::url::resolve(&src, &base_url);
                match net::fetch(&resolved, &FetchOptions::default()) {
                    Ok(response) if response.status < 400 => response.text(),
                    Ok(response) => {
                        warn_once("JS", &format!("script {resolved}: HTTP {}", response.status));
                        continue;
                    }
                    Err(message) => {
                        warn_once("JS", &format!("script {resolved}: {message}"));
                        continue;
                    }
                }
            }
            None => inline,
        };
        if source.trim().is_empty() {
            continue;
        }
        if let Err(error) = runtime.execute(&source) {
            // Uncaught errors print via the console sink; the pipeline
            // continues.
            runtime
                .console()
                .write(ConsoleLevel::Error, format!("Uncaught {error}"));
        }
    }
}

/// Collect focusable elements (links with `href` and enabled form
/// controls) in document order.
#[must_use]
pub fn collect_focusable(tree: &DomTree) -> Vec<NodeId> {
    tree.iter_all()
        .filter(|&id| {
            let Some(node) = tree.get(id) else { return false };
            let NodeType::Element(element) = &node.node_type else {
                return false;
            };
            match element.tag_name.as_str() {
                "a" => element.has_attr("href"),
                "input" | "button" | "select" | "textarea" => !element.has_attr("disabled"),
                _ => false,
            }
        })
        .collect()
}
