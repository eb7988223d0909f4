// Tue Jan 13 2026 - Alex

pub mod comment;
pub mod paging;
pub mod post;
pub mod todo;
pub mod user;

pub use comment::{CommentDto, CommentResponse};
pub use paging::{Page, PageRequest};
pub use post::{PostDto, PostResponse};
pub use todo::{TodoDto, TodoResponse};
pub use user::{UserDto, UserResponse};
