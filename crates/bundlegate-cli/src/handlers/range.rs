//! Range-contains command handler

use crate::cli::{OutputFormat, RangeContainsArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use bundlegate_core::range_contains_version;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct RangeReport<'a> {
    range: &'a str,
    version: &'a str,
    tolerant: bool,
    contains: bool,
}

/// Handle the range-contains command
#[instrument(skip(output), fields(range = %args.range, version = %args.version))]
pub fn handle_range_contains(args: RangeContainsArgs, output: &mut OutputWriter) -> Result<()> {
    let contains = range_contains_version(&args.range, &args.version, args.tolerant)
        .map_err(bundlegate_core::Error::from)?;
    debug!(contains, "Range evaluated");

    if output.format() == OutputFormat::Human {
        return output.writeln(&contains.to_string());
    }

    output.data(&RangeReport {
        range: &args.range,
        version: &args.version,
        tolerant: args.tolerant,
        contains,
    })
}
