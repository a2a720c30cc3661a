//! Landing Page
//!
//! TigerStyle: The static HTML document that boots the prebuilt FastUI
//! client. Every route the JSON API does not claim serves this page; the
//! client then fetches the matching `/api/...` JSON for the current path.

use clap::ValueEnum;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default version of the prebuilt client bundle
pub const PREBUILT_VERSION_DEFAULT: &str = "0.0.26";

/// Default page title
pub const TITLE_DEFAULT: &str = "FastUI Demo";

/// CDN hosting the prebuilt client bundle
pub const PREBUILT_CDN_BASE: &str = "https://cdn.jsdelivr.net/npm/@pydantic/fastui-prebuilt";

// =============================================================================
// Types
// =============================================================================

/// How the client maps its route onto API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApiPathMode {
    /// `/user/1/` is fetched as `{root}/user/1/`
    Append,
    /// `/user/1/` is fetched as `{root}?path=/user/1/`
    Query,
}

impl ApiPathMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Query => "query",
        }
    }
}

/// Settings baked into the landing document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingConfig {
    pub title: String,
    pub prebuilt_version: String,
    pub api_root_url: Option<String>,
    pub api_path_mode: Option<ApiPathMode>,
    pub api_path_strip: Option<String>,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            title: TITLE_DEFAULT.to_string(),
            prebuilt_version: PREBUILT_VERSION_DEFAULT.to_string(),
            api_root_url: None,
            api_path_mode: None,
            api_path_strip: None,
        }
    }
}

impl LandingConfig {
    /// Render the landing document
    pub fn render(&self) -> String {
        let assets = format!(
            "{}@{}/dist/assets",
            PREBUILT_CDN_BASE,
            escape(&self.prebuilt_version)
        );

        let mut meta = Vec::new();
        if let Some(url) = &self.api_root_url {
            meta.push(meta_tag("fastui:APIRootUrl", url));
        }
        if let Some(mode) = self.api_path_mode {
            meta.push(meta_tag("fastui:APIPathMode", mode.as_str()));
        }
        if let Some(strip) = &self.api_path_strip {
            meta.push(meta_tag("fastui:APIPathStrip", strip));
        }

        format!(
            r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <script type="module" crossorigin src="{assets}/index.js"></script>
    <link rel="stylesheet" crossorigin href="{assets}/index.css">
    {meta}
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#,
            title = escape(&self.title),
            assets = assets,
            meta = meta.join("\n    "),
        )
    }
}

fn meta_tag(name: &str, content: &str) -> String {
    format!(r#"<meta name="{}" content="{}" />"#, name, escape(content))
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
