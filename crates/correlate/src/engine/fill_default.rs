use super::{accumulator::ContainerAccumulator, promise::Promise};
use correlate_core::stmt::ValueRecord;

/// Gives every promise that received no result, and every row the grouper
/// skipped, the attribute's default value.
///
/// Runs once, after all queries of a resolution call.
pub(crate) fn fill_defaults(
    promises: &mut [Promise],
    skipped: &[usize],
    rows: &mut [ValueRecord],
    slot: usize,
    accumulator: &ContainerAccumulator,
) -> usize {
    let copier = accumulator.copier();
    let mut filled = 0;

    for promise in promises.iter_mut().filter(|promise| !promise.is_resolved()) {
        promise.on_result(accumulator.default_value(), rows, slot, copier);
        filled += 1;
    }

    for &row in skipped {
        rows[row][slot] = accumulator.default_value();
    }

    filled
}
