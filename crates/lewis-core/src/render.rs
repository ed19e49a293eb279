//! HTML rendering of palettes, canvases and the piece dump.

use crate::canvas::{CanvasConfig, Placement};
use crate::host::PieceStore;
use crate::palette::Palette;
use crate::piece::PieceKind;
use std::fmt::Write;

/// Element id of the embedded canvas configuration.
pub const CONFIG_ELEMENT_ID: &str = "lewis-config";

/// Element id of the canvas area.
pub const CANVAS_ELEMENT_ID: &str = "canvas";

/// Kinds shown in the left palette panel.
const LEFT_PANEL: [PieceKind; 2] = [PieceKind::Atom, PieceKind::Bond];
/// Kinds shown in the right palette panel.
const RIGHT_PANEL: [PieceKind; 1] = [PieceKind::LonePair];

const STYLE: &str = r#"
body { font-family: sans-serif; user-select: none; margin: 16px; }
nav.tabs { display: flex; gap: 8px; margin-bottom: 12px; }
nav.tabs a { padding: 6px 12px; border: 1px solid #ccc; border-radius: 4px; text-decoration: none; color: #333; }
nav.tabs a.current { background: #e8f0fe; border-color: #3b82f6; }
#container { display: flex; gap: 20px; }
.palette { width: 150px; border: 2px solid #ccc; padding: 10px; background: #fafafa; }
.palette-item { font-size: 32px; padding: 8px; margin: 6px 0; border: 1px solid #aaa; background: white; text-align: center; cursor: grab; }
.palette-item.compact { font-size: 24px; }
#canvas { border: 2px solid #ccc; position: relative; background: white; overflow: hidden; touch-action: none; }
.piece { position: absolute; font-size: 48px; cursor: grab; transition: box-shadow 0.15s ease, transform 0.15s ease; }
.piece.active { cursor: grabbing; }
.piece.compact { font-size: 24px; }
.piece.bond-v { line-height: 50px; }
.piece.double-v { line-height: 40px; }
.piece.triple-v { line-height: 30px; }
.piece.glow { box-shadow: 0 0 18px 4px rgba(0, 150, 255, 0.7); transform: scale(1.05); }
.delete-btn { position: absolute; top: -8px; right: -8px; font-size: 14px; line-height: 16px; width: 16px; height: 16px; text-align: center; border-radius: 8px; background: #ef4444; color: white; cursor: pointer; }
pre.dump { background: #f5f5f5; padding: 12px; border: 1px solid #ddd; }
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Glyph markup: escaped label with line breaks for stacked glyphs.
pub fn glyph_html(label: &str) -> String {
    escape_html(label).replace('\n', "<br>")
}

/// Palette markup split into the two side panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteMarkup {
    pub left: String,
    pub right: String,
}

/// Render the palette panels. Entries carry their palette index so a
/// press can be mapped back to the entry.
pub fn render_palette(palette: &Palette) -> PaletteMarkup {
    PaletteMarkup {
        left: render_panel(palette, &LEFT_PANEL),
        right: render_panel(palette, &RIGHT_PANEL),
    }
}

fn render_panel(palette: &Palette, kinds: &[PieceKind]) -> String {
    let mut html = String::new();
    for &kind in kinds {
        let _ = write!(html, "<h4>{}</h4>", kind.heading());
        for (index, entry) in palette.group(kind) {
            let mut class = String::from("palette-item");
            if let Some(extra) = entry.style.css_class() {
                class.push(' ');
                class.push_str(extra);
            }
            let title = entry
                .description
                .as_deref()
                .map(|d| format!(r#" title="{}""#, escape_html(d)))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<div class="{}" data-index="{}" data-label="{}" data-type="{}"{}>{}</div>"#,
                class,
                index,
                escape_html(&entry.label),
                kind,
                title,
                glyph_html(&entry.label),
            );
        }
    }
    html
}

/// Render one piece as an absolutely positioned element.
pub fn render_piece(placement: &Placement, deletable: bool) -> String {
    let mut class = String::from("piece");
    if let Some(extra) = placement.style.css_class() {
        class.push(' ');
        class.push_str(extra);
    }
    let delete = if deletable {
        r#"<div class="delete-btn">&times;</div>"#
    } else {
        ""
    };
    format!(
        r#"<div class="{}" data-piece-id="{}" data-type="{}" style="left:{}px; top:{}px;">{}{}</div>"#,
        class,
        escape_html(placement.id.as_str()),
        placement.kind,
        placement.position.x,
        placement.position.y,
        glyph_html(&placement.label),
        delete,
    )
}

/// Render every piece a canvas would show for `store`.
pub fn render_pieces(config: &CanvasConfig, store: &PieceStore) -> String {
    config
        .restored(store)
        .placements
        .iter()
        .map(|placement| render_piece(placement, config.delete_enabled))
        .collect()
}

/// A link to another canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab<'a> {
    pub name: &'a str,
    pub title: &'a str,
}

/// Everything needed to render a canvas page.
pub struct PageContext<'a> {
    pub config: &'a CanvasConfig,
    pub tabs: &'a [Tab<'a>],
    pub store: &'a PieceStore,
    pub session: &'a str,
    /// URL of the wasm-bindgen JavaScript module.
    pub script_url: &'a str,
}

/// Render the full page: tabs, palettes, canvas, embedded configuration
/// for the browser binding, and the piece dump.
pub fn render_canvas_page(ctx: &PageContext<'_>) -> String {
    let config = ctx.config;
    let palette = render_palette(&config.palette);
    let restored = config.restored(ctx.store);
    let embedded = restored
        .to_json()
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    let mut tabs = String::new();
    for tab in ctx.tabs {
        let class = if tab.name == config.name { r#" class="current""# } else { "" };
        let _ = write!(
            tabs,
            r#"<a href="/canvas/{}?session={}"{}>{}</a>"#,
            escape_html(tab.name),
            escape_html(ctx.session),
            class,
            escape_html(tab.title),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body data-session="{session}" data-canvas="{name}">
<h1>Molecule Builder</h1>
<nav class="tabs">{tabs}</nav>
<h2>{title}</h2>
<div id="container">
<div id="left-palette" class="palette">{left}</div>
<div id="{canvas_id}" style="width:{width}px; height:{height}px;">{pieces}</div>
<div id="right-palette" class="palette">{right}</div>
</div>
<h3>Current pieces on canvas:</h3>
<pre class="dump" id="dump">{dump}</pre>
<script type="application/json" id="{config_id}">{embedded}</script>
<script type="module">import init from "{script_url}"; init();</script>
</body>
</html>
"#,
        title = escape_html(&config.title),
        style = STYLE,
        session = escape_html(ctx.session),
        name = escape_html(&config.name),
        tabs = tabs,
        left = palette.left,
        canvas_id = CANVAS_ELEMENT_ID,
        width = config.size.width,
        height = config.size.height,
        pieces = render_pieces(config, ctx.store),
        right = palette.right,
        dump = escape_html(&ctx.store.dump_pretty()),
        config_id = CONFIG_ELEMENT_ID,
        embedded = embedded,
        script_url = escape_html(ctx.script_url),
    )
}
