pub mod analyze;
pub mod fundamentals;
pub mod macros;
pub mod news;
pub mod price;
pub mod profile;

pub mod util;
