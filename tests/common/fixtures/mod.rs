//! Captured-style documents served by the mock image creator.

/// Poll body while the job is still running.
pub const IN_PROGRESS_BODY: &str = r#"{"errorMessage":"Pending","showContentPolicy":false}"#;

/// A completed results fragment linking to `/img/{name}` on `base` for every
/// name, each as both a thumbnail and a full-size link.
pub fn completed_results(base: &str, names: &[&str]) -> String {
    let mut html = String::from(r#"<div class="gir_mmimg"><ul class="imgpt">"#);
    for name in names {
        html.push_str(&format!(
            concat!(
                r#"<li><a class="iusc" href="/images/create/result?id={name}">"#,
                r#"<img class="mimg" src="{base}/img/{name}?w=270&amp;h=270&amp;c=6&amp;r=0&amp;o=5" alt="result"/>"#,
                r#"</a></li>"#,
                r#"<li class="hidden"><img class="mimg" src="{base}/img/{name}?w=540" alt="result"/></li>"#,
            ),
            base = base,
            name = name,
        ));
    }
    html.push_str("</ul></div>");
    html
}

/// Fake image payload identifying which image was downloaded.
pub fn jpeg_bytes(name: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(name.as_bytes());
    bytes
}
