pub mod add_image;
pub mod init;
pub mod parse;
pub mod sanitize;

pub use add_image::{add_image, AddImageArgs};
pub use init::{init, InitArgs};
pub use parse::{parse, ParseArgs};
pub use sanitize::{sanitize, SanitizeArgs};
