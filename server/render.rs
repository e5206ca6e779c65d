/// Home page renderer.
///
/// The page is a single HTML template (`server/assets/index.html`) with
/// placeholder tokens like `{{TOKEN}}`, loaded at compile time. Tokens the
/// caller does not fill are blanked so raw `{{TOKEN}}` never reaches the
/// browser.

const TEMPLATE: &str = include_str!("assets/index.html");

/// Client-side script served at `/static/script.js`.
pub const SCRIPT: &str = include_str!("assets/script.js");

/// Renders the home page with the server's limits substituted in.
pub fn render_home(max_upload_mb: u64, target_size: u32) -> String {
    let html = TEMPLATE
        .replace("{{MAX_UPLOAD_MB}}", &max_upload_mb.to_string())
        .replace("{{TARGET_SIZE}}", &target_size.to_string());
    blank_remaining(html)
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
