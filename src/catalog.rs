// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scraping spectrum-file links off an ARAS catalog page.
//!
//! The only contract relied upon is that anchor `href` attributes may
//! contain the `.fit` substring. Relative hrefs are resolved by prefixing
//! the base URI; hrefs that already carry a scheme pass through unchanged.

use indexmap::IndexSet;
use lol_html::{element, HtmlRewriter, Settings};
use thiserror::Error;

use crate::constants::SPECTRUM_LINK_MARKER;

/// The spectrum links discovered on a catalog page, deduplicated, in
/// discovery order.
pub type LinkSet = IndexSet<String>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog page is the one thing the pipeline cannot proceed
    /// without.
    #[error("Couldn't reach catalog page {url}: {source}")]
    Unreachable {
        url: String,
        source: reqwest::Error,
    },

    #[error("Couldn't parse catalog page {url}: {source}")]
    Parse {
        url: String,
        source: lol_html::errors::RewritingError,
    },
}

/// The full URI of a catalog page.
pub fn catalog_url(base_uri: &str, page: &str) -> String {
    format!("{base_uri}{page}")
}

/// Fetch the catalog page and extract its spectrum links.
pub fn scrape_catalog(
    client: &reqwest::blocking::Client,
    base_uri: &str,
    page: &str,
) -> Result<LinkSet, CatalogError> {
    let url = catalog_url(base_uri, page);
    log::info!("Target site: {url}");
    let body = client
        .get(&url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|source| CatalogError::Unreachable {
            url: url.clone(),
            source,
        })?;
    let links = extract_spectrum_links(&body, base_uri)
        .map_err(|source| CatalogError::Parse { url, source })?;
    log::info!("Found {} {SPECTRUM_LINK_MARKER} files", links.len());
    Ok(links)
}

/// Pull every spectrum link out of an HTML document. Hrefs without the
/// `.fit` marker are ignored; relative hrefs get `base_uri` prefixed.
pub fn extract_spectrum_links(
    html: &[u8],
    base_uri: &str,
) -> Result<LinkSet, lol_html::errors::RewritingError> {
    let mut links = LinkSet::new();
    let handler = element!("a[href]", |el| {
        if let Some(href) = el.get_attribute("href") {
            if href.contains(SPECTRUM_LINK_MARKER) {
                // "Contains a scheme" is deliberately this loose; the
                // archive's hrefs don't warrant real URL parsing.
                let link = if href.contains("http") {
                    href
                } else {
                    format!("{base_uri}{href}")
                };
                links.insert(link);
            }
        }
        Ok(())
    });

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![handler],
            ..Settings::default()
        },
        |_: &[u8]| (),
    );
    rewriter.write(html)?;
    rewriter.end()?;

    Ok(links)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const BASE: &str = "http://www.astrosurf.com/aras/Aras_DataBase/Symbiotics/";

    #[test]
    fn extracts_relative_and_absolute_links() {
        let html = indoc! {r#"
            <html><body>
            <a href="FitFiles/asdb_agdra_20190706_181.fit">spectrum</a>
            <a href="http://elsewhere.example/asdb_agdra_20190707_902.fits">mirror</a>
            <a href="AGDra.htm">back</a>
            <a href="photometry.csv">not a spectrum</a>
            </body></html>
        "#};
        let links = extract_spectrum_links(html.as_bytes(), BASE).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.contains(&format!("{BASE}FitFiles/asdb_agdra_20190706_181.fit")));
        assert!(links.contains("http://elsewhere.example/asdb_agdra_20190707_902.fits"));
    }

    #[test]
    fn deduplicates_but_keeps_discovery_order() {
        let html = indoc! {r#"
            <a href="FitFiles/b.fit">b</a>
            <a href="FitFiles/a.fit">a</a>
            <a href="FitFiles/b.fit">b again</a>
        "#};
        let links = extract_spectrum_links(html.as_bytes(), BASE).unwrap();
        let links: Vec<_> = links.into_iter().collect();
        assert_eq!(
            links,
            vec![
                format!("{BASE}FitFiles/b.fit"),
                format!("{BASE}FitFiles/a.fit"),
            ]
        );
    }

    #[test]
    fn anchors_without_href_are_ignored() {
        let html = r#"<a name="top">anchor</a><a href="x.fit">ok</a>"#;
        let links = extract_spectrum_links(html.as_bytes(), BASE).unwrap();
        assert_eq!(links.len(), 1);
    }
}
