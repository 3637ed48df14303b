//! Domain model: posts, edit drafts and cell values.

mod draft;
mod post;
mod value;

pub use draft::PostDraft;
pub use draft::PostUpdate;
pub use post::Post;
pub use post::PostId;
pub use post::PostStatus;
pub use post::UnknownStatus;
pub use value::CellValue;
