#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

#[macro_use]
extern crate warden_result;

mod case;
mod dispatcher;
mod platform;
mod policy;
mod report;
mod scoring;

pub mod prompts;

pub use case::*;
pub use dispatcher::*;
pub use platform::*;
pub use policy::*;
pub use report::*;
pub use scoring::*;
