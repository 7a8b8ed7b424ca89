/// Contract violations of the dimension-overlay API.
///
/// These are programmer errors, not runtime conditions: no caller that
/// follows the slot lifecycle and axis-aligned extrusion rules will ever
/// see one.
#[derive(Debug, thiserror::Error)]
pub enum DimensionError {
    /// The extrusion vector mixes positive and negative components.
    ///
    /// The corner-collapse geometry is only defined when all components
    /// share a sign (or are zero); rather than guess, we refuse.
    #[error("extrude vector {extrude} mixes positive and negative components")]
    MixedSignExtrude { extrude: glam::Vec3 },

    /// `create` was called on a slot that is still attached.
    #[error("dimension overlay is already attached; detach() it first")]
    AlreadyAttached,
}
