// src/invoice/review.rs
// Sequential anomaly-resolution workflow. After an automated correction
// pass the operator is walked through up to three ordered stages:
// missing barcodes -> duplicate names -> price anomalies. All logic here is
// plain Rust so the state machine tests in isolation from any rendering.

use bevy::prelude::*;
use std::collections::HashMap;

use super::definitions::{
    columns, DiffSet, DuplicateNameItem, MissingBarcodeItem, PriceAnomalyItem, Table,
};
use super::engine::CorrectionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewStage {
    #[default]
    Idle,
    AwaitingBarcodes,
    AwaitingNames,
    AwaitingPrices,
}

/// Snapshot of the working result captured whenever the workflow pauses for
/// operator input. Exactly one lives at a time, owned by the workflow, and
/// is replaced wholesale on each stage hand-off.
#[derive(Debug, Clone)]
pub struct PendingResult {
    pub table: Table,
    pub diff: DiffSet,
    pub export_text: String,
}

/// The table/diff/export triple that becomes the visible result once the
/// review completes.
#[derive(Debug, Clone)]
pub struct FinalResult {
    pub table: Table,
    pub diff: DiffSet,
    pub export_text: String,
}

#[derive(Debug)]
pub enum ReviewUpdate {
    /// No stage left; the supplied result is the visible result.
    Finished(FinalResult),
    /// The workflow paused at a stage and snapshotted a PendingResult.
    StageEntered(ReviewStage),
}

/// How the pre-stage catalog back-fill of missing barcodes went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFetchOutcome {
    NotAttempted,
    /// Every missing barcode was found in the catalog.
    AllResolved(usize),
    /// Some rows resolved; the rest continue into the manual stage.
    PartiallyResolved { resolved: usize, remaining: usize },
}

/// Result of one submit/skip transition.
#[derive(Debug)]
pub struct StageOutcome {
    pub applied: usize,
    /// Barcode entries actually written, for merging into the per-invoice
    /// barcode cache by the caller.
    pub applied_barcodes: Vec<(usize, String)>,
    pub update: ReviewUpdate,
}

#[derive(Resource, Debug, Default)]
pub struct ReviewWorkflow {
    stage: ReviewStage,
    missing_barcodes: Vec<MissingBarcodeItem>,
    duplicate_names: Vec<DuplicateNameItem>,
    price_anomalies: Vec<PriceAnomalyItem>,
    pending: Option<PendingResult>,
}

impl ReviewWorkflow {
    pub fn stage(&self) -> ReviewStage {
        self.stage
    }

    pub fn missing_barcodes(&self) -> &[MissingBarcodeItem] {
        &self.missing_barcodes
    }

    pub fn duplicate_names(&self) -> &[DuplicateNameItem] {
        &self.duplicate_names
    }

    pub fn price_anomalies(&self) -> &[PriceAnomalyItem] {
        &self.price_anomalies
    }

    /// Drops any in-progress review, e.g. when a new invoice is loaded.
    pub fn reset(&mut self) {
        self.stage = ReviewStage::Idle;
        self.missing_barcodes.clear();
        self.duplicate_names.clear();
        self.price_anomalies.clear();
        self.pending = None;
    }

    /// Accepts a fresh correction outcome and either finishes immediately
    /// (no exceptions) or enters the first non-empty stage in fixed order.
    /// When `auto_fetch` is set and a catalog is available, missing barcodes
    /// are back-filled from it before the operator is involved.
    pub fn begin_review(
        &mut self,
        outcome: CorrectionOutcome,
        auto_fetch: bool,
        catalog: Option<&Table>,
    ) -> (ReviewUpdate, AutoFetchOutcome) {
        let mut table = outcome.table;
        let mut diff = DiffSet::from_coordinates(&outcome.changed_cells);
        let export_text = outcome.export_str;

        self.missing_barcodes = outcome.missing_barcodes;
        self.duplicate_names = outcome.duplicate_names;
        self.price_anomalies = outcome.price_anomalies;

        let fetch_outcome = if auto_fetch && !self.missing_barcodes.is_empty() {
            if let Some(catalog) = catalog {
                let before = self.missing_barcodes.len();
                let mut still_missing = Vec::new();
                for item in self.missing_barcodes.drain(..) {
                    let barcode = catalog
                        .lookup(columns::CATALOG_CODE, &item.code, columns::CATALOG_BARCODE)
                        .filter(|b| !b.trim().is_empty());
                    match barcode {
                        Some(barcode) => {
                            table.set_cell(item.row, columns::BARCODE, barcode.to_string());
                            diff.insert(item.row, columns::BARCODE);
                        }
                        None => still_missing.push(item),
                    }
                }
                let remaining = still_missing.len();
                self.missing_barcodes = still_missing;
                if remaining == 0 {
                    AutoFetchOutcome::AllResolved(before)
                } else {
                    AutoFetchOutcome::PartiallyResolved {
                        resolved: before - remaining,
                        remaining,
                    }
                }
            } else {
                AutoFetchOutcome::NotAttempted
            }
        } else {
            AutoFetchOutcome::NotAttempted
        };

        (self.advance(table, diff, export_text), fetch_outcome)
    }

    /// Applies operator input for the current stage, then advances to the
    /// next non-empty stage. Blank values mean "leave unresolved" and are
    /// silently ignored; price entries must parse to a positive number.
    pub fn submit_stage(&mut self, inputs: &HashMap<usize, String>) -> Option<StageOutcome> {
        let stage = self.stage;
        let Some(pending) = self.pending.take() else {
            // Nothing is pending while Idle.
            error!("submit_stage called while review is Idle; ignoring");
            return None;
        };
        let PendingResult {
            mut table,
            mut diff,
            export_text,
        } = pending;

        let mut applied = 0usize;
        let mut applied_barcodes = Vec::new();

        let stage_rows: Vec<usize> = match stage {
            ReviewStage::AwaitingBarcodes => {
                self.missing_barcodes.iter().map(|i| i.row).collect()
            }
            ReviewStage::AwaitingNames => self.duplicate_names.iter().map(|i| i.row).collect(),
            ReviewStage::AwaitingPrices => self.price_anomalies.iter().map(|i| i.row).collect(),
            ReviewStage::Idle => unreachable!("pending snapshot exists only while a stage is active"),
        };

        for &row in &stage_rows {
            let Some(value) = inputs.get(&row) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match stage {
                ReviewStage::AwaitingBarcodes => {
                    table.set_cell(row, columns::BARCODE, value.to_string());
                    diff.insert(row, columns::BARCODE);
                    applied_barcodes.push((row, value.to_string()));
                    applied += 1;
                }
                ReviewStage::AwaitingNames => {
                    table.set_cell(row, columns::ITEM_NAME, value.to_string());
                    diff.insert(row, columns::ITEM_NAME);
                    applied += 1;
                }
                ReviewStage::AwaitingPrices => {
                    match value.parse::<f64>() {
                        Ok(price) if price > 0.0 => {
                            table.set_cell(row, columns::RETAIL_PRICE, format!("{:.2}", price));
                            diff.insert(row, columns::RETAIL_PRICE);
                            applied += 1;
                        }
                        // Non-numeric or non-positive entries leave the
                        // row untouched, without surfacing an error.
                        _ => {}
                    }
                }
                ReviewStage::Idle => unreachable!(),
            }
        }

        self.clear_current_stage_list();
        let update = self.advance(table, diff, export_text);
        Some(StageOutcome {
            applied,
            applied_barcodes,
            update,
        })
    }

    /// Advances past the current stage without applying anything; the
    /// pending snapshot captured on stage entry is carried forward as-is.
    pub fn skip_stage(&mut self) -> Option<ReviewUpdate> {
        let Some(pending) = self.pending.take() else {
            error!("skip_stage called while review is Idle; ignoring");
            return None;
        };
        self.clear_current_stage_list();
        Some(self.advance(pending.table, pending.diff, pending.export_text))
    }

    /// Resolves the barcode stage from previously cached entries. Only
    /// valid while awaiting barcodes.
    pub fn use_cached_barcodes(
        &mut self,
        cached: &HashMap<usize, String>,
    ) -> Option<StageOutcome> {
        if self.stage != ReviewStage::AwaitingBarcodes {
            error!("use_cached_barcodes called outside the barcode stage; ignoring");
            return None;
        }
        self.submit_stage(cached)
    }

    fn clear_current_stage_list(&mut self) {
        match self.stage {
            ReviewStage::AwaitingBarcodes => self.missing_barcodes.clear(),
            ReviewStage::AwaitingNames => self.duplicate_names.clear(),
            ReviewStage::AwaitingPrices => self.price_anomalies.clear(),
            ReviewStage::Idle => {}
        }
    }

    /// Enters the first stage in fixed order whose list is non-empty,
    /// snapshotting the carried result; finishes the review otherwise.
    fn advance(&mut self, table: Table, diff: DiffSet, export_text: String) -> ReviewUpdate {
        let next = if !self.missing_barcodes.is_empty() {
            ReviewStage::AwaitingBarcodes
        } else if !self.duplicate_names.is_empty() {
            ReviewStage::AwaitingNames
        } else if !self.price_anomalies.is_empty() {
            ReviewStage::AwaitingPrices
        } else {
            ReviewStage::Idle
        };

        self.stage = next;
        if next == ReviewStage::Idle {
            self.pending = None;
            ReviewUpdate::Finished(FinalResult {
                table,
                diff,
                export_text,
            })
        } else {
            self.pending = Some(PendingResult {
                table,
                diff,
                export_text,
            });
            ReviewUpdate::StageEntered(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::definitions::CellCoordinate;

    fn invoice_table() -> Table {
        let headers: Vec<String> = [
            columns::ITEM_CODE,
            columns::ITEM_NAME,
            columns::BARCODE,
            columns::TOTAL_PRICE,
            columns::RETAIL_PRICE,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let mut table = Table::new(headers);
        for (code, name, barcode) in [
            ("100", "Mleko 1l", "8600001"),
            ("200", "Hleb beli", ""),
            ("300", "Jogurt 0.5", "8600003"),
        ] {
            let mut row = std::collections::HashMap::new();
            row.insert(columns::ITEM_CODE.to_string(), code.to_string());
            row.insert(columns::ITEM_NAME.to_string(), name.to_string());
            row.insert(columns::BARCODE.to_string(), barcode.to_string());
            row.insert(columns::TOTAL_PRICE.to_string(), "80.0000".to_string());
            row.insert(columns::RETAIL_PRICE.to_string(), "100.00".to_string());
            table.rows.push(row);
        }
        table
    }

    fn catalog_with(code: &str, barcode: &str) -> Table {
        let mut table = Table::new(vec![
            columns::CATALOG_CODE.into(),
            columns::CATALOG_NAME.into(),
            columns::CATALOG_BARCODE.into(),
        ]);
        let mut row = std::collections::HashMap::new();
        row.insert(columns::CATALOG_CODE.to_string(), code.to_string());
        row.insert(columns::CATALOG_NAME.to_string(), "Hleb beli 500g".to_string());
        row.insert(columns::CATALOG_BARCODE.to_string(), barcode.to_string());
        table.rows.push(row);
        table
    }

    fn outcome_with(
        table: Table,
        missing: Vec<MissingBarcodeItem>,
        duplicates: Vec<DuplicateNameItem>,
        prices: Vec<PriceAnomalyItem>,
    ) -> CorrectionOutcome {
        CorrectionOutcome {
            table,
            changed_cells: vec![CellCoordinate {
                row: 0,
                col: columns::ITEM_NAME.to_string(),
            }],
            missing_barcodes: missing,
            duplicate_names: duplicates,
            price_anomalies: prices,
            export_str: "EXPORT".to_string(),
            applied_cell_count: 1,
        }
    }

    fn missing_item(row: usize) -> MissingBarcodeItem {
        MissingBarcodeItem {
            row,
            code: "200".into(),
            name: "Hleb beli".into(),
        }
    }

    fn duplicate_item(row: usize) -> DuplicateNameItem {
        DuplicateNameItem {
            row,
            code: "100".into(),
            name: "Mleko 1l".into(),
            catalog_code: "101".into(),
        }
    }

    fn price_item(row: usize) -> PriceAnomalyItem {
        PriceAnomalyItem {
            row,
            code: "300".into(),
            name: "Jogurt 0.5".into(),
            total_price: 80.0,
            retail_price: 100.0,
            percentage: 80.0,
        }
    }

    fn inputs(entries: &[(usize, &str)]) -> HashMap<usize, String> {
        entries
            .iter()
            .map(|(r, v)| (*r, v.to_string()))
            .collect()
    }

    #[test]
    fn empty_exception_lists_finish_immediately() {
        let mut wf = ReviewWorkflow::default();
        let (update, fetch) =
            wf.begin_review(outcome_with(invoice_table(), vec![], vec![], vec![]), true, None);
        assert_eq!(wf.stage(), ReviewStage::Idle);
        assert_eq!(fetch, AutoFetchOutcome::NotAttempted);
        match update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.export_text, "EXPORT");
                assert!(result.diff.contains(0, columns::ITEM_NAME));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn auto_fetch_resolves_all_from_catalog() {
        let mut wf = ReviewWorkflow::default();
        let catalog = catalog_with("200", "123");
        let (update, fetch) = wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            true,
            Some(&catalog),
        );
        assert_eq!(fetch, AutoFetchOutcome::AllResolved(1));
        assert_eq!(wf.stage(), ReviewStage::Idle);
        match update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.table.cell(1, columns::BARCODE), "123");
                assert!(result.diff.contains(1, columns::BARCODE));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn auto_fetch_skips_blank_catalog_barcodes() {
        let mut wf = ReviewWorkflow::default();
        let catalog = catalog_with("200", "  ");
        let (update, fetch) = wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            true,
            Some(&catalog),
        );
        assert_eq!(
            fetch,
            AutoFetchOutcome::PartiallyResolved {
                resolved: 0,
                remaining: 1
            }
        );
        assert_eq!(wf.stage(), ReviewStage::AwaitingBarcodes);
        assert!(matches!(
            update,
            ReviewUpdate::StageEntered(ReviewStage::AwaitingBarcodes)
        ));
    }

    #[test]
    fn auto_fetch_disabled_enters_barcode_stage() {
        let mut wf = ReviewWorkflow::default();
        let catalog = catalog_with("200", "123");
        let (update, fetch) = wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            false,
            Some(&catalog),
        );
        assert_eq!(fetch, AutoFetchOutcome::NotAttempted);
        assert_eq!(wf.stage(), ReviewStage::AwaitingBarcodes);
        assert_eq!(wf.missing_barcodes().len(), 1);
        assert!(matches!(
            update,
            ReviewUpdate::StageEntered(ReviewStage::AwaitingBarcodes)
        ));

        // Skipping leaves the barcode untouched and, with no other
        // exceptions, finishes the review.
        match wf.skip_stage() {
            Some(ReviewUpdate::Finished(result)) => {
                assert_eq!(result.table.cell(1, columns::BARCODE), "");
            }
            other => panic!("expected Finished, got {:?}", other),
        }
        assert_eq!(wf.stage(), ReviewStage::Idle);
    }

    #[test]
    fn barcode_stage_precedes_name_stage_regardless_of_sizes() {
        let mut wf = ReviewWorkflow::default();
        let (update, _) = wf.begin_review(
            outcome_with(
                invoice_table(),
                vec![missing_item(1)],
                vec![duplicate_item(0), duplicate_item(2)],
                vec![],
            ),
            false,
            None,
        );
        assert!(matches!(
            update,
            ReviewUpdate::StageEntered(ReviewStage::AwaitingBarcodes)
        ));

        let outcome = wf.submit_stage(&inputs(&[(1, "555")])).unwrap();
        assert_eq!(outcome.applied, 1);
        assert!(matches!(
            outcome.update,
            ReviewUpdate::StageEntered(ReviewStage::AwaitingNames)
        ));
        assert_eq!(wf.stage(), ReviewStage::AwaitingNames);
    }

    #[test]
    fn blank_submission_leaves_cell_and_diff_untouched() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            false,
            None,
        );
        let outcome = wf.submit_stage(&inputs(&[(1, "   ")])).unwrap();
        assert_eq!(outcome.applied, 0);
        match outcome.update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.table.cell(1, columns::BARCODE), "");
                assert!(!result.diff.contains(1, columns::BARCODE));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn later_stage_sees_earlier_stage_mutations() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(
                invoice_table(),
                vec![missing_item(1)],
                vec![duplicate_item(0)],
                vec![],
            ),
            false,
            None,
        );
        wf.submit_stage(&inputs(&[(1, "777")])).unwrap();
        // Name stage: the pending snapshot must carry the barcode applied
        // in the previous stage of the same review.
        let outcome = wf.submit_stage(&inputs(&[(0, "Mleko sveže 1l")])).unwrap();
        match outcome.update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.table.cell(1, columns::BARCODE), "777");
                assert_eq!(result.table.cell(0, columns::ITEM_NAME), "Mleko sveže 1l");
                assert!(result.diff.contains(1, columns::BARCODE));
                assert!(result.diff.contains(0, columns::ITEM_NAME));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn invalid_price_entries_are_ignored() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![], vec![], vec![price_item(2)]),
            false,
            None,
        );
        assert_eq!(wf.stage(), ReviewStage::AwaitingPrices);
        let outcome = wf.submit_stage(&inputs(&[(2, "abc")])).unwrap();
        assert_eq!(outcome.applied, 0);
        match outcome.update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.table.cell(2, columns::RETAIL_PRICE), "100.00");
                assert!(!result.diff.contains(2, columns::RETAIL_PRICE));
            }
            other => panic!("expected Finished, got {:?}", other),
        }

        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![], vec![], vec![price_item(2)]),
            false,
            None,
        );
        let outcome = wf.submit_stage(&inputs(&[(2, "-5")])).unwrap();
        assert_eq!(outcome.applied, 0);
    }

    #[test]
    fn valid_price_entry_is_written_two_decimal() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![], vec![], vec![price_item(2)]),
            false,
            None,
        );
        let outcome = wf.submit_stage(&inputs(&[(2, "90")])).unwrap();
        assert_eq!(outcome.applied, 1);
        match outcome.update {
            ReviewUpdate::Finished(result) => {
                assert_eq!(result.table.cell(2, columns::RETAIL_PRICE), "90.00");
                assert!(result.diff.contains(2, columns::RETAIL_PRICE));
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn stage_ops_while_idle_are_noops() {
        let mut wf = ReviewWorkflow::default();
        assert!(wf.submit_stage(&inputs(&[(0, "x")])).is_none());
        assert!(wf.skip_stage().is_none());
        assert!(wf.use_cached_barcodes(&inputs(&[(0, "x")])).is_none());
        assert_eq!(wf.stage(), ReviewStage::Idle);
    }

    #[test]
    fn use_cached_barcodes_only_valid_in_barcode_stage() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![], vec![duplicate_item(0)], vec![]),
            false,
            None,
        );
        assert_eq!(wf.stage(), ReviewStage::AwaitingNames);
        assert!(wf.use_cached_barcodes(&inputs(&[(1, "555")])).is_none());
    }

    #[test]
    fn submitted_barcodes_are_reported_for_caching() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            false,
            None,
        );
        let outcome = wf
            .submit_stage(&inputs(&[(1, " 999 "), (0, "")]))
            .unwrap();
        assert_eq!(outcome.applied_barcodes, vec![(1, "999".to_string())]);
    }

    #[test]
    fn inputs_for_rows_outside_stage_list_are_ignored() {
        let mut wf = ReviewWorkflow::default();
        wf.begin_review(
            outcome_with(invoice_table(), vec![missing_item(1)], vec![], vec![]),
            false,
            None,
        );
        let outcome = wf.submit_stage(&inputs(&[(0, "111"), (1, "222")])).unwrap();
        assert_eq!(outcome.applied, 1);
        match outcome.update {
            ReviewUpdate::Finished(result) => {
                // Row 0 was not flagged, so its barcode keeps its value.
                assert_eq!(result.table.cell(0, columns::BARCODE), "8600001");
                assert_eq!(result.table.cell(1, columns::BARCODE), "222");
            }
            other => panic!("expected Finished, got {:?}", other),
        }
    }
}
