// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The acquisition pipeline: scrape, diff, fetch, filter, cache.
//!
//! Everything runs on one thread, one link at a time, in discovery order. A
//! failed link is logged, counted and skipped; only the catalog page and the
//! caches can abort a run.

use std::sync::atomic::Ordering;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{info, warn};
use thiserror::Error;

use crate::{
    cache::{self, CachePolicy},
    catalog::{scrape_catalog, CatalogError, LinkSet},
    fetch::SpectrumSource,
    filter::QualityFilter,
    settings::Settings,
    spectra::SpectrumCollection,
    PROGRESS_BARS,
};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cache(#[from] crate::cache::CacheError),
}

/// End-of-run accounting. `accepted + skipped <= discovered`; the difference
/// is spectra that fetched fine but failed the quality filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Links found on the catalog page (after deduplication).
    pub discovered: usize,

    /// Links that were retrieved and decoded.
    pub fetched: usize,

    /// Spectra that passed the quality filter into the collection.
    pub accepted: usize,

    /// Links skipped because retrieval or decoding failed.
    pub skipped: usize,

    /// Whether the collection came straight out of the cache, bypassing the
    /// fetch pipeline.
    pub loaded_from_cache: bool,
}

impl PipelineReport {
    fn log(&self) {
        if self.loaded_from_cache {
            info!("Loaded {} spectra from cache", self.accepted);
            return;
        }
        info!(
            "Discovered {}, fetched {}, accepted {}, skipped {}",
            self.discovered, self.fetched, self.accepted, self.skipped
        );
    }
}

/// Run the whole pipeline according to `settings`, returning the collection
/// for this run (either freshly built and cached, or loaded from the cache).
pub fn run(
    settings: &Settings,
    client: &reqwest::blocking::Client,
    source: &dyn SpectrumSource,
) -> Result<(SpectrumCollection, PipelineReport), PipelineError> {
    let filter = QualityFilter {
        min_resolution: settings.min_resolution,
        min_wavelength_range: settings.min_wavelength_range,
    };

    // The link-list-diff policy maintains its link list on every run, even
    // when the collection cache short-circuits the downloads below.
    let mut scraped: Option<LinkSet> = None;
    if settings.cache_policy == CachePolicy::LinkListDiff {
        let links = scrape_catalog(client, &settings.catalog_base_uri, &settings.catalog_page)?;
        cache::update_links(&settings.link_list_cache_path, &links)?;
        scraped = Some(links);
    }

    // Existence gate: a cache file means "trust it forever".
    if settings.collection_cache_path.is_file() {
        info!(
            "Cache file {} found",
            settings.collection_cache_path.display()
        );
        let collection = cache::load_collection(&settings.collection_cache_path)?;
        let report = PipelineReport {
            accepted: collection.len(),
            loaded_from_cache: true,
            ..PipelineReport::default()
        };
        report.log();
        return Ok((collection, report));
    }

    let links = match scraped {
        Some(links) => links,
        None => scrape_catalog(client, &settings.catalog_base_uri, &settings.catalog_page)?,
    };

    info!("No cache file found, downloading spectra...");
    let (collection, report) = fetch_collection(&links, source, &filter);
    cache::save_collection(&settings.collection_cache_path, &collection)?;
    info!(
        "Saved {} spectra to {}",
        collection.len(),
        settings.collection_cache_path.display()
    );
    report.log();
    Ok((collection, report))
}

/// Fetch every link in order, filter, and accumulate the accepted spectra.
/// One bad link never aborts the batch.
pub fn fetch_collection(
    links: &LinkSet,
    source: &dyn SpectrumSource,
    filter: &QualityFilter,
) -> (SpectrumCollection, PipelineReport) {
    let mut collection = SpectrumCollection::new();
    let mut report = PipelineReport {
        discovered: links.len(),
        ..PipelineReport::default()
    };
    let mut skipped_links = vec![];

    let pb = ProgressBar::with_draw_target(
        Some(links.len() as u64),
        if PROGRESS_BARS.load(Ordering::Relaxed) {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg}: [{wide_bar:.blue}] {pos:3}/{len:3}")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_message("Downloading spectra");

    for link in links {
        match source.fetch(link) {
            Ok(record) => {
                report.fetched += 1;
                if filter.accepts(&record.header) {
                    log::debug!("Saving {}", link.rsplit('/').next().unwrap_or(link));
                    report.accepted += 1;
                    collection.push(record);
                }
            }
            Err(e) => {
                warn!("{e}");
                report.skipped += 1;
                skipped_links.push(link.as_str());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !skipped_links.is_empty() {
        warn!(
            "Broken files/links? {}",
            skipped_links.iter().join(", ")
        );
    }

    (collection, report)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        fetch::{DecodeError, FetchError},
        spectra::{tests::test_record, SpectrumRecord},
    };

    /// A canned source: each link maps to a record or a failure.
    struct CannedSource {
        // Interior mutability because `fetch` takes &self.
        responses: RefCell<Vec<Result<SpectrumRecord, ()>>>,
        calls: RefCell<usize>,
    }

    impl CannedSource {
        fn new(responses: Vec<Result<SpectrumRecord, ()>>) -> CannedSource {
            CannedSource {
                responses: RefCell::new(responses),
                calls: RefCell::new(0),
            }
        }
    }

    impl SpectrumSource for CannedSource {
        fn fetch(&self, url: &str) -> Result<SpectrumRecord, FetchError> {
            *self.calls.borrow_mut() += 1;
            match self.responses.borrow_mut().remove(0) {
                Ok(record) => Ok(record),
                Err(()) => Err(FetchError::Decode {
                    url: url.to_string(),
                    source: DecodeError::FluxLength {
                        expected: 1,
                        found: 0,
                    },
                }),
            }
        }
    }

    fn links(n: usize) -> LinkSet {
        (0..n)
            .map(|i| format!("http://a.example/{i}.fit"))
            .collect()
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let source = CannedSource::new(vec![
            Ok(test_record(4000.0, 0.4, 6000)),
            Err(()),
            Ok(test_record(4000.0, 0.4, 6000)),
        ]);
        let (collection, report) =
            fetch_collection(&links(3), &source, &QualityFilter::default());

        assert_eq!(*source.calls.borrow(), 3);
        assert_eq!(collection.len(), 2);
        assert_eq!(report.discovered, 3);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.accepted + report.skipped <= report.discovered);
    }

    #[test]
    fn filtered_spectra_are_dropped_silently() {
        let source = CannedSource::new(vec![
            Ok(test_record(4000.0, 0.4, 6000)), // accepted
            Ok(test_record(4000.0, 1.0, 1500)), // resolution 4000: rejected
        ]);
        let (collection, report) =
            fetch_collection(&links(2), &source, &QualityFilter::default());

        assert_eq!(collection.len(), 1);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.accepted, 1);
        // Rejection is not an error and not a skip.
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn collection_preserves_discovery_order() {
        let a = test_record(4000.0, 0.4, 6000);
        let b = test_record(3800.0, 0.4, 6000);
        let source = CannedSource::new(vec![Ok(a.clone()), Ok(b.clone())]);
        let (collection, _) = fetch_collection(&links(2), &source, &QualityFilter::default());
        assert_eq!(collection[0], a);
        assert_eq!(collection[1], b);
    }
}
