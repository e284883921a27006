//! Wombat Browser CLI
//!
//! Fetches (or reads) an HTML document, runs it through the full engine
//! pipeline, and prints one rendered frame as ANSI text. Dump flags
//! expose each pipeline stage for debugging.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use wombat_browser::{ImageCache, Page, RenderOptions};
use wombat_css::{BoxType, LayoutBox};
use wombat_dom::NodeId;
use wombat_html::{print_tree, HtmlTokenizer};
use wombat_term::image::{BlitMode, Dithering};
use wombat_term::ColorSupport;

/// Wombat Browser CLI - a terminal-mode browser engine
#[derive(Parser, Debug)]
#[command(name = "wombat-cli")]
#[command(author, version, about, long_about = None)]
#[command(group = clap::ArgGroup::new("input").required(true))]
#[command(after_help = r#"EXAMPLES:
    # Render a local file
    wombat-cli ./index.html

    # Fetch and render a URL at 100 columns
    wombat-cli --width 100 https://example.com

    # Render inline HTML
    wombat-cli --html '<h1>Hi</h1><p>terminal web</p>'

    # Braille images on a 256-color terminal
    wombat-cli --blit braille --color ansi256 https://example.com

    # Debug the pipeline
    wombat-cli --dump-dom --dump-layout ./page.html
"#)]
struct Cli {
    /// Path to an HTML file or URL to fetch and render
    #[arg(value_name = "FILE|URL", group = "input")]
    path: Option<String>,

    /// Render an inline HTML string instead of a file/URL
    #[arg(long, value_name = "HTML", group = "input")]
    html: Option<String>,

    /// Viewport width in columns
    #[arg(long, default_value = "80")]
    width: usize,

    /// Viewport height in rows (0 = whole document)
    #[arg(long, default_value = "0")]
    height: usize,

    /// Scroll offset in rows
    #[arg(long, default_value = "0")]
    scroll: i32,

    /// Terminal color capability
    #[arg(long, value_enum, default_value = "truecolor")]
    color: ColorArg,

    /// Image blit mode
    #[arg(long, value_enum, default_value = "half-block")]
    blit: BlitArg,

    /// Image dithering
    #[arg(long, value_enum, default_value = "none")]
    dither: DitherArg,

    /// Skip image fetching (placeholders only)
    #[arg(long)]
    no_images: bool,

    /// Print the HTML token stream
    #[arg(long)]
    dump_tokens: bool,

    /// Print the DOM tree
    #[arg(long)]
    dump_dom: bool,

    /// Print computed styles per element
    #[arg(long)]
    dump_styles: bool,

    /// Print the layout tree as JSON
    #[arg(long)]
    dump_layout: bool,

    /// Skip rendering (useful with the dump flags)
    #[arg(long)]
    no_render: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    None,
    Ansi16,
    Ansi256,
    Truecolor,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlitArg {
    Braille,
    HalfBlock,
    Quadrant,
    Ascii,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DitherArg {
    None,
    FloydSteinberg,
    Ordered,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cols = cli.width.max(1);
    let page = if let Some(html) = &cli.html {
        Page::from_html(html, "about:inline", cols as i32)
    } else if let Some(path) = &cli.path {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
        {
            Page::load(path, cols as i32).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            let html = std::fs::read_to_string(PathBuf::from(path))?;
            let url = format!("file://{path}");
            Page::from_html(&html, &url, cols as i32)
        }
    } else {
        // clap's input group prevents this.
        anyhow::bail!("either a file/URL or --html is required");
    };

    if cli.dump_tokens {
        let mut tokenizer = HtmlTokenizer::new(&page.html_source);
        tokenizer.run();
        println!("=== Tokens ===");
        for token in tokenizer.tokens() {
            println!("{token:?}");
        }
    }

    if cli.dump_dom {
        println!("=== DOM ===");
        let tree = page.doc.tree.borrow();
        print_tree(&tree, NodeId::ROOT, 0);
    }

    if cli.dump_styles {
        println!("=== Computed styles ===");
        let tree = page.doc.tree.borrow();
        let mut ids: Vec<NodeId> = page.styles.keys().copied().collect();
        ids.sort();
        for id in ids {
            if let (Some(element), Some(style)) = (tree.as_element(id), page.styles.get(&id)) {
                println!("<{}> {:?}", element.tag_name, style);
            }
        }
    }

    if cli.dump_layout {
        println!("=== Layout ===");
        println!("{}", serde_json::to_string_pretty(&layout_json(&page.layout))?);
    }

    if cli.no_render {
        return Ok(());
    }

    let opts = RenderOptions {
        color_support: match cli.color {
            ColorArg::None => ColorSupport::None,
            ColorArg::Ansi16 => ColorSupport::Ansi16,
            ColorArg::Ansi256 => ColorSupport::Ansi256,
            ColorArg::Truecolor => ColorSupport::TrueColor,
        },
        blit_mode: match cli.blit {
            BlitArg::Braille => BlitMode::Braille,
            BlitArg::HalfBlock => BlitMode::HalfBlock,
            BlitArg::Quadrant => BlitMode::Quadrant,
            BlitArg::Ascii => BlitMode::Ascii,
        },
        dithering: match cli.dither {
            DitherArg::None => Dithering::None,
            DitherArg::FloydSteinberg => Dithering::FloydSteinberg,
            DitherArg::Ordered => Dithering::Ordered(4),
        },
    };

    let cache = Arc::new(ImageCache::new());
    if !cli.no_images {
        page.fetch_images_blocking(&cache);
    }

    let rows = if cli.height == 0 {
        page.document_height().max(1) as usize
    } else {
        cli.height
    };

    if let Some(title) = &page.title {
        eprintln!("── {title} ──");
    }
    let canvas = page.render(cols, rows, cli.scroll, &cache, None, &opts);
    print!("{}", wombat_term::serialize(&canvas, opts.color_support));

    Ok(())
}

/// Snapshot the layout tree as JSON for `--dump-layout`.
fn layout_json(b: &LayoutBox) -> serde_json::Value {
    let rect = b.dimensions.content;
    let mut node = serde_json::json!({
        "type": match b.box_type {
            BoxType::Block => "block",
            BoxType::Inline => "inline",
            BoxType::InlineBlock => "inline-block",
            BoxType::Anonymous => "anonymous",
            BoxType::Text => "text",
        },
        "rect": { "x": rect.x, "y": rect.y, "w": rect.width, "h": rect.height },
    });
    if let Some(tag) = &b.tag {
        node["tag"] = serde_json::Value::String(tag.clone());
    }
    if let Some(text) = &b.text {
        node["text"] = serde_json::Value::String(text.clone());
    }
    if let Some(marker) = &b.list_marker {
        node["marker"] = serde_json::Value::String(marker.clone());
    }
    if !b.children.is_empty() {
        node["children"] = serde_json::Value::Array(b.children.iter().map(layout_json).collect());
    }
    node
}
