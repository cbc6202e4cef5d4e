mod money;
mod operation;
mod time;
mod version;

pub use self::{money::*, operation::*, time::*, version::*};
