use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::info;

use crate::error::{AppError, SitemapError};
use crate::fetcher::PageFetcher;

const SITEMAP_NS: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

/// Fetch the catalog sitemap and return every course URL in document order.
pub async fn fetch_course_urls<F: PageFetcher + ?Sized>(
    fetcher: &F,
    sitemap_url: &str,
) -> Result<Vec<String>, AppError> {
    info!("Fetching courses sitemap: {}", sitemap_url);
    let xml = fetcher
        .fetch(sitemap_url)
        .await
        .map_err(AppError::SitemapFetch)?;

    let urls = parse_urlset(&xml)?;
    info!("Total URLs in sitemap: {}", urls.len());
    Ok(urls)
}

/// Parse a sitemap document and return the text of all `<loc>` elements in
/// the sitemap namespace, at any depth.
pub fn parse_urlset(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = NsReader::from_str(xml);
    let mut urls = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut loc: Option<String> = None;

    let malformed = |position: u64, message: String| SitemapError::Malformed { position, message };

    loop {
        let pos = reader.buffer_position() as u64;
        let (in_ns, event) = match reader.read_resolved_event() {
            Ok((ns, event)) => (is_sitemap_ns(&ns), event),
            Err(e) => return Err(malformed(pos, e.to_string())),
        };

        match event {
            Event::Start(e) => {
                if depth == 0 && seen_root {
                    return Err(malformed(pos, "multiple root elements".into()));
                }
                depth += 1;
                seen_root = true;
                if in_ns && e.local_name().as_ref() == b"loc" {
                    loc = Some(String::new());
                }
            }
            Event::Empty(_) => {
                if depth == 0 && seen_root {
                    return Err(malformed(pos, "multiple root elements".into()));
                }
                seen_root = true;
            }
            Event::Text(e) => {
                if let Some(buf) = loc.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| malformed(pos, e.to_string()))?;
                    buf.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if in_ns && e.local_name().as_ref() == b"loc" {
                    if let Some(url) = loc.take() {
                        let url = url.trim();
                        if !url.is_empty() {
                            urls.push(url.to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed(reader.buffer_position() as u64, "no root element".into()));
    }
    if depth != 0 {
        return Err(malformed(
            reader.buffer_position() as u64,
            "unclosed element at end of document".into(),
        ));
    }
    Ok(urls)
}

fn is_sitemap_ns(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NS)
}
