//! Reader page markup.
//!
//! The page is assembled once per run: viewer settings are baked into the
//! markup, then the result is parsed into a [`ChunkTemplate`] whose only
//! per-chunk fields are the content, file name and chunk position.

use txt_chunks::{escape_text, ChunkTemplate, TemplateError};

use crate::viewer::{ColorOption, ViewerConfig};

/// Build the reader page template for `cfg`.
pub fn reader_template(cfg: &ViewerConfig) -> Result<ChunkTemplate, TemplateError> {
    ChunkTemplate::parse(&build_reader_html(cfg))
}

/// Reader page source with chunk placeholders still in place.
pub fn build_reader_html(cfg: &ViewerConfig) -> String {
    let cfg = cfg.clone().normalized();
    let viewer_json = viewer_json(&cfg);

    PAGE_TEMPLATE
        .replace("__VIEWER_CONFIG__", &viewer_json)
        .replace("__CENTER_MAX_WIDTH__", &cfg.center_max_width_px.to_string())
        .replace("__LEFT_BG__", &cfg.left_background)
        .replace("__CENTER_BG__", &cfg.center_background)
        .replace("__RIGHT_BG__", &cfg.right_background)
        .replace("__TEXT_COLOR__", &cfg.text_color)
        .replace("__FONT_SIZE__", &cfg.font_size_px.to_string())
        .replace("__LINE_HEIGHT__", &format!("{:.1}", cfg.line_height))
        .replace(
            "__TEXT_COLOR_OPTIONS__",
            &select_options(&cfg.text_colors, &cfg.text_color),
        )
        .replace(
            "__CENTER_BG_OPTIONS__",
            &select_options(&cfg.center_backgrounds, &cfg.center_background),
        )
        .replace(
            "__LEFT_BG_OPTIONS__",
            &select_options(&cfg.side_backgrounds, &cfg.left_background),
        )
        .replace(
            "__RIGHT_BG_OPTIONS__",
            &select_options(&cfg.side_backgrounds, &cfg.right_background),
        )
}

fn viewer_json(cfg: &ViewerConfig) -> String {
    // Serializing plain strings and numbers cannot fail; fall back to the
    // script's own defaults if it ever does.
    let json = serde_json::to_string(cfg).unwrap_or_else(|err| {
        log::warn!("viewer config did not serialize: {}", err);
        "{}".to_string()
    });
    // `{{` can only occur inside JSON strings, where `{` is equivalent.
    json.replace("</script>", "<\\/script>")
        .replace("{{", "{\\u007b")
}

fn select_options(options: &[ColorOption], selected: &str) -> String {
    let mut out = String::new();
    for option in options {
        let value = markup_text(&option.value);
        let label = markup_text(&option.label);
        let mark = if option.value.eq_ignore_ascii_case(selected) {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{} ({})</option>\n                ",
            value, mark, label, value
        ));
    }
    out.trim_end().to_string()
}

/// Escape configured text for markup, keeping template braces inert.
fn markup_text(text: &str) -> String {
    escape_text(text).replace('{', "&#123;").replace('}', "&#125;")
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{file_name}} - part {{current_chunk}}</title>
    <style>
        :root {
            --left-bg: __LEFT_BG__;
            --center-bg: __CENTER_BG__;
            --right-bg: __RIGHT_BG__;
            --center-max-width: __CENTER_MAX_WIDTH__px;
        }
        body {
            --g-left: calc(50% - var(--center-max-width) / 2);
            --g-right: calc(50% + var(--center-max-width) / 2);
            background: linear-gradient(to right,
                        var(--left-bg) 0px var(--g-left),
                        var(--center-bg) var(--g-left) var(--g-right),
                        var(--right-bg) var(--g-right) 100%);
            color: #333;
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            padding: 20px;
            margin: 0;
            font-size: 16px;
        }
        .controls {
            margin-bottom: 20px;
            padding: 15px;
            background-color: #f5f5f5;
            border-radius: 8px;
            display: flex;
            flex-wrap: wrap;
            gap: 15px;
            align-items: center;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .control-section { display: flex; flex-direction: column; gap: 8px; }
        .control-group { display: flex; gap: 10px; align-items: center; }
        button {
            background-color: #e0e0e0;
            color: #333;
            border: none;
            padding: 8px 16px;
            border-radius: 4px;
            cursor: pointer;
            transition: background-color 0.3s;
            font-size: 16px;
        }
        button:hover { background-color: #ccc; }
        .page-center {
            max-width: var(--center-max-width);
            margin: 0 auto;
            padding: 20px;
        }
        .content {
            white-space: pre-wrap;
            word-wrap: break-word;
            padding: 25px;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
            min-height: 300px;
            transition: background-color 0.3s, color 0.3s, line-height 0.3s;
            font-size: __FONT_SIZE__px;
            line-height: __LINE_HEIGHT__;
            color: __TEXT_COLOR__;
            background-color: var(--center-bg);
        }
        .chunk-info {
            color: #666;
            font-size: 0.9em;
            margin-top: 10px;
            width: 100%;
            text-align: right;
        }
        .color-preview {
            width: 20px;
            height: 20px;
            border-radius: 4px;
            border: 1px solid rgba(0,0,0,0.12);
            box-shadow: 0 1px 2px rgba(0,0,0,0.05);
            display: inline-block;
            vertical-align: middle;
            margin-left: 8px;
        }
        .display-value { min-width: 50px; text-align: center; }
    </style>
</head>
<body>
    <div class="controls">
        <div class="control-section">
            <span>Font size</span>
            <div class="control-group">
                <button type="button" data-font-step="-1">A-</button>
                <span id="fontSizeDisplay" class="display-value">__FONT_SIZE__px</span>
                <button type="button" data-font-step="1">A+</button>
            </div>
        </div>

        <div class="control-section">
            <span>Line height</span>
            <div class="control-group">
                <button type="button" data-line-step="-1">Line-</button>
                <span id="lineHeightDisplay" class="display-value">__LINE_HEIGHT__</span>
                <button type="button" data-line-step="1">Line+</button>
            </div>
        </div>

        <div class="control-section">
            <span>Text color</span>
            <div class="control-group">
                <select id="textColorSelect" aria-label="Text color">
                __TEXT_COLOR_OPTIONS__
                </select>
                <span id="textColorPreview" class="color-preview" style="background:__TEXT_COLOR__"></span>
            </div>
        </div>

        <div class="control-section">
            <span>Background colors</span>
            <div class="control-group">
                <span>Center</span>
                <select id="centerColorSelect" aria-label="Center background color">
                __CENTER_BG_OPTIONS__
                </select>
                <span id="centerColorPreview" class="color-preview" style="background:__CENTER_BG__"></span>
            </div>
            <div class="control-group">
                <span>Left</span>
                <select id="leftColorSelect" aria-label="Left background color">
                __LEFT_BG_OPTIONS__
                </select>
                <span id="leftColorPreview" class="color-preview" style="background:__LEFT_BG__"></span>
            </div>
            <div class="control-group">
                <span>Right</span>
                <select id="rightColorSelect" aria-label="Right background color">
                __RIGHT_BG_OPTIONS__
                </select>
                <span id="rightColorPreview" class="color-preview" style="background:__RIGHT_BG__"></span>
            </div>
        </div>

        <div class="chunk-info">
            Part <span id="chunkPosition">{{current_chunk}} / {{total_chunks}}</span>
        </div>
    </div>

    <div class="page-center">
        <div class="content" id="mainContent">{{content}}</div>
    </div>

    <script>
        document.addEventListener('DOMContentLoaded', function () {
            const VIEWER = __VIEWER_CONFIG__;
            const root = document.documentElement;
            const content = document.getElementById('mainContent');
            const fontDisplay = document.getElementById('fontSizeDisplay');
            const lineDisplay = document.getElementById('lineHeightDisplay');
            let fontSize = VIEWER.font_size_px;
            let lineHeight = VIEWER.line_height;

            function clamp(value, lo, hi) {
                return Math.min(hi, Math.max(lo, value));
            }

            function applyFontSize() {
                content.style.fontSize = fontSize + 'px';
                fontDisplay.textContent = fontSize + 'px';
            }

            function applyLineHeight() {
                content.style.lineHeight = lineHeight;
                lineDisplay.textContent = lineHeight.toFixed(1);
            }

            document.querySelectorAll('[data-font-step]').forEach(function (button) {
                button.addEventListener('click', function () {
                    const dir = Number(button.getAttribute('data-font-step'));
                    fontSize = clamp(fontSize + dir * VIEWER.font_size_step_px,
                        VIEWER.font_size_min_px, VIEWER.font_size_max_px);
                    applyFontSize();
                });
            });

            document.querySelectorAll('[data-line-step]').forEach(function (button) {
                button.addEventListener('click', function () {
                    const dir = Number(button.getAttribute('data-line-step'));
                    const next = Math.round((lineHeight + dir * VIEWER.line_height_step) * 10) / 10;
                    lineHeight = clamp(next, VIEWER.line_height_min, VIEWER.line_height_max);
                    applyLineHeight();
                });
            });

            function bindColor(selectId, previewId, apply) {
                const select = document.getElementById(selectId);
                const preview = document.getElementById(previewId);
                select.addEventListener('change', function () {
                    apply(select.value);
                    preview.style.background = select.value;
                });
            }

            bindColor('textColorSelect', 'textColorPreview', function (value) {
                content.style.color = value;
            });
            bindColor('centerColorSelect', 'centerColorPreview', function (value) {
                root.style.setProperty('--center-bg', value);
            });
            bindColor('leftColorSelect', 'leftColorPreview', function (value) {
                root.style.setProperty('--left-bg', value);
            });
            bindColor('rightColorSelect', 'rightColorPreview', function (value) {
                root.style.setProperty('--right-bg', value);
            });

            applyFontSize();
            applyLineHeight();
        });
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use txt_chunks::{ChunkMeta, ChunkPage, ChunkRenderer};

    fn page<'a>(content: &'a str, total: usize, current: usize) -> ChunkPage<'a> {
        ChunkPage {
            content,
            meta: ChunkMeta {
                file_name: "novel.txt",
                total_chunks: total,
                current_chunk: current,
            },
        }
    }

    #[test]
    fn default_page_parses_and_fills_every_marker() {
        let html = build_reader_html(&ViewerConfig::default());
        assert!(!html.contains("__"), "unreplaced marker left in page");
        let tpl = reader_template(&ViewerConfig::default()).expect("reader page parses");
        let out = tpl.render(&page("hello &amp; bye\n", 4, 2));
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>novel.txt - part 2</title>"));
        assert!(out.contains("<span id=\"chunkPosition\">2 / 4</span>"));
        assert!(out.contains("<div class=\"content\" id=\"mainContent\">hello &amp; bye\n</div>"));
    }

    #[test]
    fn controls_carry_the_configured_ranges() {
        let out = build_reader_html(&ViewerConfig::default());
        assert!(out.contains("\"font_size_min_px\":10"));
        assert!(out.contains("\"font_size_max_px\":36"));
        assert!(out.contains("\"line_height_step\":0.2"));
        assert!(out.contains("line-height: 1.6;"));
        assert_eq!(out.matches("<option value=").count(), 10 + 6 + 10 + 10);
        assert_eq!(out.matches(" selected>").count(), 4);
    }

    #[test]
    fn hostile_labels_cannot_break_the_template() {
        let mut cfg = ViewerConfig::default();
        cfg.text_colors[0].label = "{{content}} </select><script>x</script>".to_string();
        let tpl = reader_template(&cfg).expect("labels are escaped before parsing");
        let out = tpl.render(&page("BODY", 1, 1));
        assert_eq!(out.matches("BODY").count(), 1);
        assert!(!out.contains("<script>x</script>"));
    }

    #[test]
    fn overhead_grows_with_digit_width() {
        let tpl = reader_template(&ViewerConfig::default()).expect("reader page parses");
        let small = tpl.overhead(&page("", 9, 9).meta);
        let wide = tpl.overhead(&page("", 10, 10).meta);
        // current chunk appears twice, total once
        assert_eq!(wide, small + 3);
        assert_eq!(small, tpl.render(&page("", 9, 9)).len());
    }
}
