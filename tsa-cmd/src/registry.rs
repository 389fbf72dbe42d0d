//! Static catalogue of the public analysis operations.

use serde::Serialize;

/// Name and one-line summary of an operation, grouped by module.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct OperationDescriptor {
    pub module: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

const fn op(
    module: &'static str,
    name: &'static str,
    summary: &'static str,
) -> OperationDescriptor {
    OperationDescriptor {
        module,
        name,
        summary,
    }
}

pub static OPERATIONS: &[OperationDescriptor] = &[
    op("dates", "date_time_to_number", "D/M/Y[,H:M] string to day number"),
    op("dates", "number_to_string", "minute-unit day number to D/M/Y[, HH:MM]"),
    op("dates", "date_number_to_string", "day number in either unit to a date string"),
    op("series", "range", "samples with start <= time < end"),
    op("series", "range_by_dates", "range with date string bounds"),
    op("series", "from_delimited_str", "parse a delimited day-number table"),
    op("series", "from_untimed_str", "parse a table without times onto an even time axis"),
    op("series", "with_uniform_times", "pair values with evenly spaced times"),
    op("segments", "select_segments", "choose NS and NFFT for N samples"),
    op("spectrum", "power_spectrum", "one-sided FFT power spectral density"),
    op("confidence", "student_confidence_interval", "Student-t interval for a mean"),
    op("confidence", "psd_confidence_interval", "chi-squared factors for a PSD band"),
    op("random", "uniform_random", "uniform draw from [a, b)"),
];

/// Operations in `module`, or all of them.
pub fn operations_in(module: Option<&str>) -> Vec<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .filter(|op| module.map_or(true, |m| op.module == m))
        .collect()
}

/// Distinct module names in catalogue order.
pub fn modules() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for op in OPERATIONS {
        if !names.contains(&op.module) {
            names.push(op.module);
        }
    }
    names
}

/// Numbered listing, one `module::name` per line.
pub fn listing(operations: &[&OperationDescriptor]) -> String {
    let mut out = String::from("List of available functions:");
    for (i, op) in operations.iter().enumerate() {
        out.push_str(&format!(
            "\n   {}: {}::{} - {}",
            i + 1,
            op.module,
            op.name,
            op.summary
        ));
    }
    out
}
