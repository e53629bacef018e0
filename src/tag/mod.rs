// Tag Records
//
// Read-only descriptions of discovered symbols and their rendering into the
// debug trace stream.

pub mod fields;
pub mod formatter;
pub mod record;

pub use fields::ExtensionFields;
pub use formatter::format_tag_entry;
pub use record::{KindName, TagRecord};
