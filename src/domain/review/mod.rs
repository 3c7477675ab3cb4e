//! Review domain - course reviews, star ratings and review likes.

mod rating;
#[allow(clippy::module_inception)]
mod review;

pub use rating::ReviewRating;
pub use review::{Review, ReviewLike};
