pub mod frontmatter;

pub use frontmatter::{decode, encode, FrontmatterError};
