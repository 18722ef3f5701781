use pw_core::ChangeStatus;

/// Flag a parcel when vegetation dropped by more than `threshold`.
///
/// Gains never flag: only `ndvi_difference < -threshold` is a possible
/// illegal clearing.
pub fn classify(ndvi_difference: f64, threshold: f64) -> ChangeStatus {
    if ndvi_difference < -threshold.abs() {
        ChangeStatus::PossibleIllegal
    } else {
        ChangeStatus::NoChange
    }
}
