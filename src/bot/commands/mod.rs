//! Discord command implementations organized by category.

/// Balance and daily-claim commands
pub mod economy;

/// General utility commands
pub mod general;

// Export commands
pub use economy::*;
pub use general::*;
