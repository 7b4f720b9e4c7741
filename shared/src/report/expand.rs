//! Row expansion: one order record becomes zero, one or two line views

use crate::models::{LinePresence, LineType, OrderLine, OrderRecord};

/// One order line together with the record it belongs to
#[derive(Debug, Clone, Copy)]
pub struct ExpandedLine<'a> {
    pub line_type: LineType,
    pub record: &'a OrderRecord,
    pub line: &'a OrderLine,
}

/// Result of expanding a batch of records
#[derive(Debug, Default)]
pub struct Expansion<'a> {
    pub lines: Vec<ExpandedLine<'a>>,
    /// Records that yielded no line under the presence rule
    pub skipped: usize,
}

fn named(line: Option<&OrderLine>) -> Option<&OrderLine> {
    line.filter(|l| l.display_name().is_some())
}

/// Expand one record; the product line always precedes the lens line
///
/// Under `Any` each line with a display name yields a row. Under `Both` the
/// record must carry both a product and a lens line, named or not, and both
/// yield a row.
pub fn expand_record(record: &OrderRecord, presence: LinePresence) -> Vec<ExpandedLine<'_>> {
    let (product, lens) = match presence {
        LinePresence::Any => (
            named(record.product.as_ref()),
            named(record.lens.as_ref()),
        ),
        LinePresence::Both => match (record.product.as_ref(), record.lens.as_ref()) {
            (Some(product), Some(lens)) => (Some(product), Some(lens)),
            _ => return Vec::new(),
        },
    };

    let mut lines = Vec::with_capacity(2);
    if let Some(line) = product {
        lines.push(ExpandedLine {
            line_type: LineType::Product,
            record,
            line,
        });
    }
    if let Some(line) = lens {
        lines.push(ExpandedLine {
            line_type: LineType::Lens,
            record,
            line,
        });
    }
    lines
}

/// Expand a batch of records in input order
pub fn expand_records(records: &[OrderRecord], presence: LinePresence) -> Expansion<'_> {
    records
        .iter()
        .fold(Expansion::default(), |mut acc, record| {
            let lines = expand_record(record, presence);
            if lines.is_empty() {
                acc.skipped += 1;
            }
            acc.lines.extend(lines);
            acc
        })
}
