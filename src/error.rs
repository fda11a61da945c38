use thiserror::Error;

/// Error type for binarization and intensity remapping operations
///
/// Degenerate image content (uniform images, windows larger than the image,
/// zero-sized images) is never reported through this type. Those cases
/// resolve to a well-defined output image instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No input image was supplied to the transform boundary
    ///
    /// Returned by [`crate::transform_image`] before any computation starts.
    #[error("Missing input image")]
    MissingInput,

    /// Invalid parameter provided to the operation
    ///
    /// This error is returned when a floating-point parameter is not finite
    /// (NaN or infinite), which would make every comparison meaningless.
    #[error("Invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Failed to create ImageBuffer from processed pixels
    ///
    /// This error indicates that the creation of a new image buffer
    /// failed after processing the pixel data.
    #[error("Failed to create ImageBuffer from processed pixels")]
    ImageBufferCreationFailed,

    /// A transform name could not be resolved
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),
}
