//! Document domain module.
//!
//! - `model`: the repository document and the payload to create one
//! - `row`: observable listing row with its thumbnail

mod model;
mod row;

pub use model::{DOMAIN_TYPE, Document, FOLDER_TYPE, FOLDERISH_FACET, NewDocument};
pub use row::{DocumentRow, PlaceholderIcon, Thumbnail};
