//! Submission Builder
//!
//! Pure aggregation of customer scalars and finalized item records into
//! the immutable root value. The one structural validation gate lives
//! here: a submission with no customer data and no items is rejected;
//! every other kind of missing data is tolerated upstream.

use tradein_core::{AppError, ItemRecord, ScalarFields, Submission};

/// True when there is nothing to submit. The pipeline checks this before
/// dispatching any storage or transport call.
pub fn is_structurally_empty(scalar: &ScalarFields, items: &[ItemRecord]) -> bool {
    scalar.is_empty() && items.is_empty()
}

/// Combine scalars and items into a `Submission`, rejecting the all-empty
/// case.
pub fn build_submission(
    scalar: ScalarFields,
    items: Vec<ItemRecord>,
) -> Result<Submission, AppError> {
    if is_structurally_empty(&scalar, &items) {
        return Err(AppError::EmptySubmission(
            "Nothing to submit: no contact details and no items".to_string(),
        ));
    }
    Ok(Submission {
        customer: scalar,
        items,
    })
}
