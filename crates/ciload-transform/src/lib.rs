//! Invoice-line consolidation.
//!
//! Upstream feeds split one declarable line across several records (set
//! components, assortments, freight add-ons) linked by a parent line number.
//! Consolidation merges each child into its parent before emission: additive
//! monetary amounts are summed, tariff classifications are concatenated in
//! source-document order, and the child disappears from the output.
//!
//! XVV lines are bill-of-materials expansion groups and pass through
//! unmerged regardless of parent/child linkage. Only one parent/child hop is
//! supported; a deeper chain aborts compilation rather than guessing.

use std::collections::HashMap;

use ciload_model::{
    CiLoadEntry, CiLoadError, CiLoadInvoice, CiLoadInvoiceLine, Result, normalize_line_number,
};
use tracing::debug;

/// Consolidate the lines of every invoice on an entry.
pub fn consolidate_entry(mut entry: CiLoadEntry) -> Result<CiLoadEntry> {
    let invoices = std::mem::take(&mut entry.invoices);
    entry.invoices = invoices
        .into_iter()
        .map(consolidate_invoice)
        .collect::<Result<Vec<CiLoadInvoice>>>()?;
    Ok(entry)
}

/// Consolidate one invoice's lines.
pub fn consolidate_invoice(mut invoice: CiLoadInvoice) -> Result<CiLoadInvoice> {
    let lines = std::mem::take(&mut invoice.lines);
    invoice.lines = consolidate_lines(lines)?;
    Ok(invoice)
}

/// Merge child lines into their parents, preserving source-document order.
///
/// A child is a non-XVV line whose `parent_line_number` names another line
/// of the invoice. The merged line keeps the parent's identity; children
/// contribute their tariff lines (in the order the lines occur in the
/// document, which is not necessarily numeric order) and their additive
/// amounts. A parent reference to a line that is itself consolidated away is
/// a [`CiLoadError::ConsolidationDepth`] error.
pub fn consolidate_lines(lines: Vec<CiLoadInvoiceLine>) -> Result<Vec<CiLoadInvoiceLine>> {
    // Normalized line number per source position.
    let mut numbers = Vec::with_capacity(lines.len());
    for line in &lines {
        let number = normalize_line_number(&line.line_number).ok_or_else(|| {
            CiLoadError::invalid_value(
                "lineNo",
                format!("'{}' is not a numeric line number", line.line_number),
            )
        })?;
        numbers.push(number);
    }
    let by_number: HashMap<&str, usize> = numbers
        .iter()
        .enumerate()
        .map(|(idx, number)| (number.as_str(), idx))
        .collect();

    // Group key per source position: the parent's normalized number for
    // mergeable children, the line's own number otherwise.
    let mut keys: Vec<String> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let key = merge_target(line, &numbers[idx], &by_number, &lines)
            .unwrap_or_else(|| numbers[idx].clone());
        keys.push(key);
    }

    // A child pointing at a line that is itself merged away would need a
    // second hop; flag it instead of guessing.
    for (idx, key) in keys.iter().enumerate() {
        if *key == numbers[idx] {
            continue;
        }
        let parent_idx = by_number[key.as_str()];
        if keys[parent_idx] != numbers[parent_idx] {
            return Err(CiLoadError::consolidation_depth(&lines[idx].line_number));
        }
    }

    let mut output: Vec<CiLoadInvoiceLine> = Vec::new();
    let mut slot_by_key: HashMap<String, usize> = HashMap::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let key = &keys[idx];
        let is_parent = *key == numbers[idx];
        match slot_by_key.get(key) {
            None => {
                let slot = output.len();
                slot_by_key.insert(key.clone(), slot);
                let mut merged = line;
                merged.line_number = key.clone();
                if !is_parent {
                    debug!(
                        child = %numbers[idx],
                        parent = %key,
                        "child precedes parent, holding slot"
                    );
                }
                output.push(merged);
            }
            Some(&slot) => {
                debug!(child = %numbers[idx], parent = %key, "consolidating line");
                let target = &mut output[slot];
                if is_parent {
                    // Parent occurred after one of its children: adopt the
                    // parent's identity, keep the accumulated detail first.
                    let mut merged = line;
                    merge_additive(&mut merged, target);
                    let mut tariffs = std::mem::take(&mut target.tariff_lines);
                    tariffs.extend(std::mem::take(&mut merged.tariff_lines));
                    merged.tariff_lines = tariffs;
                    merged.line_number = key.clone();
                    *target = merged;
                } else {
                    merge_additive(target, &line);
                    target.tariff_lines.extend(line.tariff_lines);
                }
            }
        }
    }
    Ok(output)
}

/// The parent number a line merges into, when it is a mergeable child.
fn merge_target(
    line: &CiLoadInvoiceLine,
    own_number: &str,
    by_number: &HashMap<&str, usize>,
    lines: &[CiLoadInvoiceLine],
) -> Option<String> {
    if line.xvv {
        return None;
    }
    let parent = normalize_line_number(line.parent_line_number.as_deref()?)?;
    if parent == own_number {
        return None;
    }
    let parent_idx = *by_number.get(parent.as_str())?;
    // XVV groups pass through unmerged even when linkage points at them.
    if lines[parent_idx].xvv {
        return None;
    }
    Some(parent)
}

/// Sum the additive monetary fields of `other` into `target`.
fn merge_additive(target: &mut CiLoadInvoiceLine, other: &CiLoadInvoiceLine) {
    add_option(&mut target.non_dutiable_amount, other.non_dutiable_amount);
    add_option(&mut target.add_to_make_amount, other.add_to_make_amount);
    add_option(&mut target.other_amount, other.other_amount);
    add_option(
        &mut target.miscellaneous_discount,
        other.miscellaneous_discount,
    );
    add_option(&mut target.freight_amount, other.freight_amount);
}

fn add_option(acc: &mut Option<f64>, value: Option<f64>) {
    if let Some(amount) = value {
        *acc = Some(acc.unwrap_or(0.0) + amount);
    }
}
