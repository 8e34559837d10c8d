mod actions;
mod categories;
mod evaluation;
mod history;
mod locator;
mod messages;

pub use actions::*;
pub use categories::*;
pub use evaluation::*;
pub use history::*;
pub use locator::*;
pub use messages::*;
