//! Catalog-backed exposure selection workflows.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::config::SelectionSettings;
use crate::db::ExposureCatalog;
use crate::error::DagResult;
use crate::logging::OperationLog;
use crate::models::{ExposureRecord, ExposureTable, Pointing, SkyBox};
use crate::selection::Partition;

/// Query the exposures around `pointing`, apply the quality cuts and partition
/// them into search and template sets.
///
/// A degenerate batch (fewer than two nights) is still returned, with every
/// exposure flagged search; check `partition.outcome.is_degenerate()`.
pub async fn get_exposure_info(
    catalog: &dyn ExposureCatalog,
    pointing: Pointing,
    settings: &SelectionSettings,
    log: &OperationLog,
) -> DagResult<Partition> {
    let scope = log.begin("get_exposure_info");
    let sky_box = SkyBox::around(pointing, settings.box_margin_deg);

    let records = catalog.exposures_in_box(&sky_box).await?;
    let queried = records.len();
    let table = settings.cuts.apply(ExposureTable::new(records)?);

    info!(
        parent: scope.span(),
        ra = pointing.ra,
        dec = pointing.dec,
        queried,
        accepted = table.len(),
        "Queried exposures around pointing"
    );

    let partition = settings.partitioner().partition(table, scope.log());
    info!(
        parent: scope.span(),
        search = partition.table.search().count(),
        templates = partition.table.templates().count(),
        "Partitioned exposures"
    );

    scope.finish();
    Ok(partition)
}

/// Fetch full records for an explicit id list, ordered by exposure id.
///
/// Ids the catalog does not know are logged and skipped.
pub async fn fetch_exposure_details(
    catalog: &dyn ExposureCatalog,
    ids: &[i64],
    log: &OperationLog,
) -> DagResult<Vec<ExposureRecord>> {
    let scope = log.begin("fetch_exposure_details");

    let records = catalog.exposures_by_ids(ids).await?;
    let found: BTreeSet<i64> = records.iter().map(|r| r.exposure_id).collect();
    let missing: BTreeSet<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if !missing.is_empty() {
        warn!(parent: scope.span(), ?missing, "Exposures not found in catalog");
    }

    scope.finish();
    Ok(records)
}
